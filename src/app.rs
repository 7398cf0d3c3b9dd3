use std::time::Instant;

use crossterm::event::{Event, KeyEvent, MouseEvent};
use ratatui::Frame;

use crate::actions::Action;
use crate::config::ReplayConfig;
use crate::constants::MIN_VISIBLE_MARGIN_CELLS;
use crate::engine::StepEngine;
use crate::keybindings::KeyBindings;
use crate::layout::Viewport;
use crate::script::Script;
use crate::ui;
use crate::window::WindowManager;

/// The interactive replay: a step engine driving a window manager, plus the
/// key bindings that steer it.
pub struct ReplayApp {
    engine: StepEngine<WindowManager>,
    bindings: KeyBindings,
    hints: String,
    quit: bool,
    redraw: bool,
}

impl ReplayApp {
    pub fn new(script: Script, config: &ReplayConfig) -> Self {
        let windows = WindowManager::new().with_visible_margin(MIN_VISIBLE_MARGIN_CELLS);
        let mut engine =
            StepEngine::with_focus(script, windows).with_highlight_delay(config.highlight_delay);
        if !config.start_paused {
            engine.resume();
        }
        if let Some(index) = config.goto {
            engine.goto(isize::try_from(index).unwrap_or(isize::MAX));
        }
        Self::from_engine(engine, KeyBindings::default())
    }

    pub fn from_engine(engine: StepEngine<WindowManager>, bindings: KeyBindings) -> Self {
        let hints = bindings.hint_line();
        Self {
            engine,
            bindings,
            hints,
            quit: false,
            redraw: true,
        }
    }

    pub fn engine(&self) -> &StepEngine<WindowManager> {
        &self.engine
    }

    pub fn windows(&self) -> &WindowManager {
        self.engine.focus()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(..) => self.redraw = true,
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) {
        match self.bindings.action_for_key(key) {
            Some(Action::Quit) => {
                tracing::info!("quit requested");
                self.quit = true;
            }
            Some(action) => self.engine.handle_action(action),
            None => {
                self.engine.resume();
            }
        }
    }

    pub fn handle_mouse(&mut self, mouse: &MouseEvent) {
        if self.engine.focus_mut().handle_mouse_event(mouse) {
            self.redraw = true;
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.engine.tick(now);
    }

    /// When the loop must wake up even without input.
    pub fn wake_deadline(&self) -> Option<Instant> {
        self.engine.highlight_deadline()
    }

    /// Returns `true` once after anything visible changed.
    pub fn take_redraw(&mut self) -> bool {
        let changed = self.engine.take_changed();
        std::mem::take(&mut self.redraw) || changed
    }

    pub fn draw(&mut self, frame: &mut Frame<'_>) {
        let (desktop, _) = ui::split_screen(frame.area());
        self.engine
            .focus_mut()
            .set_viewport(Viewport::new(desktop.width as f64, desktop.height as f64));
        ui::draw(frame, &self.engine, &self.hints);
    }
}
