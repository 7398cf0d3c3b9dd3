#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use step_replay::app::ReplayApp;
    use step_replay::engine::StepEngine;
    use step_replay::keybindings::KeyBindings;
    use step_replay::script::Script;
    use step_replay::window::{WindowId, WindowManager};

    fn screen_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut out = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn render(app: &mut ReplayApp, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        screen_text(terminal.backend().buffer())
    }

    #[test]
    fn renders_every_window_and_status() {
        let mut engine = StepEngine::with_focus(Script::demo().unwrap(), WindowManager::new());
        let last = engine.timeline().last_index().unwrap() as isize;
        engine.goto(last);
        let title = engine.script().title.clone();
        let mut app = ReplayApp::from_engine(engine, KeyBindings::default());

        let text = render(&mut app, 160, 50);
        for id in WindowId::ALL {
            // Design and Browser share a slot; only one of them is on top.
            if matches!(id, WindowId::Design | WindowId::Browser) {
                continue;
            }
            assert!(text.contains(id.title()), "missing {id} window");
        }
        let status = text.lines().last().unwrap();
        assert!(status.contains(&title));
        assert!(status.contains("Phase"));
        assert!(status.contains("PAUSED"));
    }

    #[test]
    fn tiny_terminals_do_not_panic() {
        let mut app = ReplayApp::from_engine(
            StepEngine::with_focus(Script::demo().unwrap(), WindowManager::new()),
            KeyBindings::default(),
        );
        for (w, h) in [(1, 1), (2, 2), (10, 3), (40, 8)] {
            render(&mut app, w, h);
        }
    }
}
