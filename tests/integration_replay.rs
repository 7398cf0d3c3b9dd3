#[cfg(test)]
mod tests {
    use std::fs;

    use indoc::indoc;
    use step_replay::engine::StepEngine;
    use step_replay::script::{Script, ScriptError};
    use step_replay::state::{AccumulatedState, BrowserTab};
    use step_replay::window::{WindowId, WindowManager};

    /// Everything reversal promises to restore; the highlight is excluded.
    fn channels(state: &AccumulatedState) -> serde_json::Value {
        let mut value = serde_json::to_value(state).unwrap();
        value.as_object_mut().unwrap().remove("activeWindow");
        value
    }

    fn inline(text: &str) -> Script {
        Script::from_json(text, "inline").unwrap()
    }

    #[test]
    fn forward_then_back_restores_every_prefix() {
        let script = Script::demo().unwrap();
        let total = script.step_count();
        let mut engine = StepEngine::new(script);
        let initial = channels(engine.state());

        for i in 1..=total {
            engine.goto(i as isize - 1);
            assert_eq!(engine.undo_depth(), i);
            for _ in 0..i {
                engine.prev();
            }
            assert_eq!(engine.cursor(), -1);
            assert_eq!(engine.undo_depth(), 0);
            assert_eq!(channels(engine.state()), initial, "prefix of {i} steps");
        }
    }

    #[test]
    fn stack_depth_tracks_cursor() {
        let mut engine = StepEngine::new(Script::demo().unwrap());
        let moves = [1, 1, 1, -1, 1, -1, -1, -1, -1, 1, 1];
        for delta in moves {
            if delta > 0 {
                engine.next();
            } else {
                engine.prev();
            }
            assert_eq!(engine.undo_depth() as isize, engine.cursor() + 1);
        }
    }

    #[test]
    fn boundaries_are_idempotent() {
        let mut engine = StepEngine::new(Script::demo().unwrap());
        engine.prev();
        assert_eq!(engine.cursor(), -1);
        let start = engine.state().clone();
        engine.prev();
        assert_eq!(engine.state(), &start);

        let last = engine.timeline().last_index().unwrap() as isize;
        engine.goto(last);
        let end = engine.state().clone();
        let depth = engine.undo_depth();
        engine.next();
        engine.next();
        assert_eq!(engine.cursor(), last);
        assert_eq!(engine.undo_depth(), depth);
        assert_eq!(engine.state(), &end);
    }

    #[test]
    fn same_path_file_replaces_in_place() {
        let script = inline(indoc! {r#"
            { "title": "files", "phases": [{ "id": 1, "name": "p", "steps": [
              { "id": "1", "files": { "entries": [
                  { "path": "a/b.txt", "type": "file" },
                  { "path": "c.txt", "type": "file" } ] } },
              { "id": "2", "files": { "entries": [
                  { "path": "a/b.txt", "type": "file", "modified": true } ] } }
            ] }] }
        "#});
        let mut engine = StepEngine::new(script);
        engine.goto(1);
        let files = engine.state().files();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, "a/b.txt");
        assert!(files[0].modified);
        assert_eq!(engine.state().active_window(), Some(WindowId::Editor));
    }

    #[test]
    fn endpoints_are_unique_by_route() {
        let script = inline(indoc! {r#"
            { "title": "api", "phases": [{ "id": 1, "name": "p", "steps": [
              { "id": "1", "browser": { "tab": "endpoints", "endpoints": [
                  { "method": "GET", "path": "/cams", "summary": "list" } ] } },
              { "id": "2", "browser": { "tab": "endpoints", "endpoints": [
                  { "method": "GET", "path": "/cams", "summary": "dup" },
                  { "method": "POST", "path": "/cams", "summary": "create" } ] } },
              { "id": "3", "browser": { "tab": "workspace", "state": "final" } }
            ] }] }
        "#});
        let mut engine = StepEngine::new(script);
        engine.goto(2);
        let browser = engine.state().browser();
        assert_eq!(browser.tab, BrowserTab::Workspace);
        assert_eq!(browser.endpoints.len(), 2);
        assert_eq!(browser.endpoints[0].summary, "list");
        assert_eq!(engine.state().markers().len(), 5);

        engine.prev();
        assert_eq!(engine.state().browser().tab, BrowserTab::Endpoints);
        assert!(engine.state().markers().is_empty());
        engine.prev();
        assert_eq!(engine.state().browser().endpoints.len(), 1);
    }

    #[test]
    fn attached_window_manager_raises_touched_windows() {
        let mut engine = StepEngine::with_focus(Script::demo().unwrap(), WindowManager::new());
        let start = engine.focus().stack_counter();
        let mut raised = 0;
        while !engine.is_at_end() {
            engine.next();
            if let Some(id) = engine.state().active_window() {
                raised += 1;
                assert_eq!(engine.focus().topmost(), Some(id));
            }
        }
        assert_eq!(engine.focus().stack_counter(), start + raised);
    }

    #[test]
    fn scripts_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.json");
        fs::write(
            &path,
            r#"{ "title": "disk", "phases": [{ "id": 7, "name": "only",
                "steps": [{ "id": "a" }, { "id": "b" }] }] }"#,
        )
        .unwrap();
        let script = Script::load(&path).unwrap();
        assert_eq!(script.title, "disk");
        assert_eq!(script.step_count(), 2);
    }

    #[test]
    fn load_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = Script::load(&missing).unwrap_err();
        assert!(matches!(err, ScriptError::Io { .. }));
        assert!(err.to_string().contains("missing.json"));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ \"title\": ").unwrap();
        let err = Script::load(&broken).unwrap_err();
        assert!(matches!(err, ScriptError::Parse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
