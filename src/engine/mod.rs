//! Forward and backward replay of a script against the accumulated state.

pub mod highlight;

use std::time::{Duration, Instant};

use crate::actions::Action;
use crate::script::{Phase, Script, Step};
use crate::state::{AccumulatedState, UndoSnapshot};
use crate::timeline::{Timeline, TimelineEntry};
use crate::window::{WindowFocus, WindowId};

pub use highlight::HighlightTimer;

/// The window a step draws attention to: the first channel present in the
/// order design, editor, browser, files, terminal, chat.
pub fn window_for_step(step: &Step) -> Option<WindowId> {
    [
        (step.design.is_some(), WindowId::Design),
        (step.editor.is_some(), WindowId::Editor),
        (step.browser.is_some(), WindowId::Browser),
        // the file listing lives in the editor's sidebar
        (step.files.is_some(), WindowId::Editor),
        (step.terminal.is_some(), WindowId::Terminal),
        (step.chat.is_some(), WindowId::Chat),
    ]
    .into_iter()
    .find_map(|(present, id)| present.then_some(id))
}

#[derive(Debug)]
pub struct StepEngine<F: WindowFocus = ()> {
    script: Script,
    timeline: Timeline,
    state: AccumulatedState,
    undo: Vec<UndoSnapshot>,
    highlight: HighlightTimer,
    focus: F,
    paused: bool,
    changed: bool,
}

impl StepEngine<()> {
    /// An engine with nobody to notify about window focus.
    pub fn new(script: Script) -> Self {
        Self::with_focus(script, ())
    }
}

impl<F: WindowFocus> StepEngine<F> {
    pub fn with_focus(script: Script, focus: F) -> Self {
        let timeline = Timeline::build(&script);
        let first_phase = (!script.phases.is_empty()).then_some(0);
        let state = AccumulatedState::new(first_phase, timeline.len());
        Self {
            script,
            timeline,
            state,
            undo: Vec::new(),
            highlight: HighlightTimer::default(),
            focus,
            paused: true,
            changed: true,
        }
    }

    pub fn with_highlight_delay(mut self, delay: Duration) -> Self {
        self.highlight = HighlightTimer::new(delay);
        self
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn state(&self) -> &AccumulatedState {
        &self.state
    }

    pub fn focus(&self) -> &F {
        &self.focus
    }

    pub fn focus_mut(&mut self) -> &mut F {
        &mut self.focus
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Global index of the last applied step; -1 before the first.
    pub fn cursor(&self) -> isize {
        self.state.nav().step_index
    }

    pub fn is_at_start(&self) -> bool {
        self.cursor() < 0
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor() >= self.timeline.len() as isize - 1
    }

    pub fn next(&mut self) {
        self.next_at(Instant::now());
    }

    /// Same as [`StepEngine::next`], arming the highlight timer from `now`.
    pub fn next_at(&mut self, now: Instant) {
        if self.is_at_end() {
            return;
        }
        let cursor = self.cursor() + 1;
        self.state.set_step_index(cursor);
        if let Some(entry) = self.timeline.get(cursor as usize) {
            self.apply_step(entry, now);
        }
        self.changed = true;
    }

    pub fn prev(&mut self) {
        if self.is_at_start() {
            return;
        }
        self.reverse_step();
        self.state.set_step_index(self.cursor() - 1);
        self.changed = true;
    }

    /// Step forward or backward until the cursor sits on `index`.
    pub fn goto(&mut self, index: isize) {
        let last = self.timeline.len() as isize - 1;
        let target = index.clamp(-1, last.max(-1));
        while self.cursor() < target {
            self.next();
        }
        while self.cursor() > target {
            self.prev();
        }
    }

    fn apply_step(&mut self, entry: TimelineEntry, now: Instant) {
        let Some(step) = self.timeline.step(&self.script, entry) else {
            return;
        };
        self.undo.push(UndoSnapshot::capture(&self.state));
        self.state.set_phase(Some(entry.phase_index));

        if let Some(chat) = &step.chat {
            self.state.push_chat(&step.id, chat);
        }
        if let Some(terminal) = &step.terminal {
            self.state.push_terminal(&step.id, terminal);
        }
        if let Some(files) = &step.files {
            self.state.merge_files(files);
        }
        if let Some(browser) = &step.browser {
            self.state.apply_browser(browser);
        }
        if let Some(editor) = &step.editor {
            self.state.apply_editor(editor);
        }
        if let Some(design) = &step.design {
            self.state.apply_design(design);
        }

        let window = window_for_step(step);
        self.state.set_active_window(window);
        if let Some(id) = window {
            self.focus.bring_to_front(id);
        }
        self.highlight.arm(now);

        tracing::debug!(
            step = %step.id,
            index = entry.global_index,
            window = ?window,
            "applied step"
        );
    }

    fn reverse_step(&mut self) {
        let Some(snapshot) = self.undo.pop() else {
            return;
        };
        snapshot.restore(&mut self.state);

        // The cursor still points at the step being undone here.
        let phase = usize::try_from(self.cursor())
            .ok()
            .and_then(|index| self.timeline.get(index))
            .map(|entry| entry.phase_index)
            .or_else(|| (!self.script.phases.is_empty()).then_some(0));
        self.state.set_phase(phase);

        tracing::debug!(index = self.cursor(), "reversed step");
    }

    /// Clear the highlight once its deadline has passed. Returns `true` when
    /// it cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.highlight.fire_if_due(now) {
            return false;
        }
        self.state.set_active_window(None);
        self.changed = true;
        true
    }

    pub fn highlight_deadline(&self) -> Option<Instant> {
        self.highlight.deadline()
    }

    /// Returns `true` once after any observable change.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Leave the paused state; returns `true` if the engine was paused.
    pub fn resume(&mut self) -> bool {
        if !self.paused {
            return false;
        }
        self.paused = false;
        self.changed = true;
        tracing::debug!("replay resumed");
        true
    }

    /// Route a navigation action. While paused the first action only
    /// resumes playback.
    pub fn handle_action(&mut self, action: Action) {
        if self.resume() {
            return;
        }
        match action {
            Action::Advance => self.next(),
            Action::Retreat => self.prev(),
            Action::Quit => {}
        }
    }

    /// The step most recently applied, `None` before the first one.
    pub fn current_step(&self) -> Option<&Step> {
        let index = usize::try_from(self.cursor()).ok()?;
        self.timeline
            .get(index)
            .and_then(|entry| self.timeline.step(&self.script, entry))
    }

    pub fn current_phase(&self) -> Option<&Phase> {
        self.state
            .nav()
            .phase
            .and_then(|index| self.script.phases.get(index))
    }

    pub fn current_phase_index(&self) -> usize {
        self.state.nav().phase.unwrap_or(0)
    }

    /// 1-based position of the cursor inside the current phase, 0 before the
    /// first step.
    pub fn step_in_phase(&self) -> usize {
        let nav = self.state.nav();
        let Some(phase) = nav.phase else {
            return 0;
        };
        if nav.step_index < 0 {
            return 0;
        }
        let Some(phase_start) = self.timeline.phase_start(phase) else {
            return 0;
        };
        (nav.step_index + 1 - phase_start as isize).max(0) as usize
    }

    pub fn total_steps_in_phase(&self) -> usize {
        self.current_phase().map_or(0, |phase| phase.steps.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{
        BrowserEffect, ChatEffect, DesignEffect, EditorEffect, EntryKind, FileEntry, FilesEffect,
        Member, Role, TerminalEffect, WorkspaceState,
    };

    fn chat(text: &str) -> ChatEffect {
        ChatEffect {
            from: Member {
                role: Role::Agent,
                name: "Agent".into(),
            },
            text: text.into(),
            is_approval: false,
        }
    }

    fn script(phases: Vec<Vec<Step>>) -> Script {
        Script {
            title: "test".into(),
            phases: phases
                .into_iter()
                .enumerate()
                .map(|(i, steps)| Phase {
                    id: i as u32 + 1,
                    name: format!("phase {}", i + 1),
                    steps,
                })
                .collect(),
        }
    }

    fn chat_step(id: &str) -> Step {
        Step {
            chat: Some(chat(id)),
            ..Step::new(id)
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<WindowId>);

    impl WindowFocus for Recorder {
        fn bring_to_front(&mut self, id: WindowId) {
            self.0.push(id);
        }
    }

    #[test]
    fn starts_before_first_step() {
        let engine = StepEngine::new(script(vec![vec![chat_step("a")]]));
        assert_eq!(engine.cursor(), -1);
        assert_eq!(engine.state().nav().phase, Some(0));
        assert_eq!(engine.state().nav().total_steps, 1);
        assert!(engine.paused());
        assert_eq!(engine.step_in_phase(), 0);
        assert_eq!(engine.total_steps_in_phase(), 1);
    }

    #[test]
    fn empty_script_has_no_phase() {
        let mut engine = StepEngine::new(script(vec![]));
        assert_eq!(engine.state().nav().phase, None);
        assert_eq!(engine.current_phase_index(), 0);
        assert_eq!(engine.total_steps_in_phase(), 0);
        engine.next();
        engine.prev();
        assert_eq!(engine.cursor(), -1);
        assert_eq!(engine.undo_depth(), 0);
    }

    #[test]
    fn phase_metrics_follow_cursor() {
        let mut engine = StepEngine::new(script(vec![
            vec![chat_step("1a"), chat_step("1b")],
            vec![chat_step("2a"), chat_step("2b"), chat_step("2c")],
        ]));
        engine.goto(3);
        assert_eq!(engine.current_phase_index(), 1);
        assert_eq!(engine.step_in_phase(), 2);
        assert_eq!(engine.total_steps_in_phase(), 3);
        assert_eq!(engine.current_phase().map(|p| p.id), Some(2));
    }

    #[test]
    fn current_step_tracks_cursor() {
        let mut engine = StepEngine::new(script(vec![
            vec![chat_step("1a")],
            vec![Step {
                description: Some("second".into()),
                ..chat_step("2a")
            }],
        ]));
        assert!(engine.current_step().is_none());
        engine.goto(1);
        let step = engine.current_step().expect("step");
        assert_eq!(step.id, "2a");
        assert_eq!(step.description.as_deref(), Some("second"));
        engine.prev();
        assert_eq!(engine.current_step().map(|s| s.id.as_str()), Some("1a"));
    }

    #[test]
    fn reversing_takes_phase_from_undone_step() {
        let mut engine = StepEngine::new(script(vec![
            vec![chat_step("1a")],
            vec![chat_step("2a")],
        ]));
        engine.goto(1);
        engine.prev();
        assert_eq!(engine.cursor(), 0);
        assert_eq!(engine.state().nav().phase, Some(1));
        assert_eq!(engine.step_in_phase(), 0);
        engine.prev();
        assert_eq!(engine.state().nav().phase, Some(0));
    }

    #[test]
    fn active_window_priority() {
        let mut step = Step::new("x");
        assert_eq!(window_for_step(&step), None);
        step.chat = Some(chat("hi"));
        assert_eq!(window_for_step(&step), Some(WindowId::Chat));
        step.terminal = Some(TerminalEffect::Command { text: "ls".into() });
        assert_eq!(window_for_step(&step), Some(WindowId::Terminal));
        step.files = Some(FilesEffect {
            entries: vec![FileEntry {
                path: "a".into(),
                kind: EntryKind::File,
                modified: false,
            }],
        });
        assert_eq!(window_for_step(&step), Some(WindowId::Editor));
        step.browser = Some(BrowserEffect::Workspace {
            state: WorkspaceState::Skeleton,
        });
        assert_eq!(window_for_step(&step), Some(WindowId::Browser));
        step.editor = Some(EditorEffect::CloseFile);
        assert_eq!(window_for_step(&step), Some(WindowId::Editor));
        step.design = Some(DesignEffect::ShowDesign {
            file: "d.pen".into(),
            screens: vec![],
        });
        assert_eq!(window_for_step(&step), Some(WindowId::Design));
    }

    #[test]
    fn focus_collaborator_is_notified() {
        let mut terminal = Step::new("t");
        terminal.terminal = Some(TerminalEffect::Command { text: "ls".into() });
        let mut engine = StepEngine::with_focus(
            script(vec![vec![chat_step("c"), Step::new("empty"), terminal]]),
            Recorder::default(),
        );
        engine.goto(2);
        assert_eq!(engine.focus().0, [WindowId::Chat, WindowId::Terminal]);
        assert_eq!(engine.state().active_window(), Some(WindowId::Terminal));
    }

    #[test]
    fn empty_step_clears_indicator_and_still_arms() {
        let mut engine = StepEngine::new(script(vec![vec![chat_step("c"), Step::new("e")]]));
        engine.next();
        assert_eq!(engine.state().active_window(), Some(WindowId::Chat));
        engine.next();
        assert_eq!(engine.state().active_window(), None);
        assert!(engine.highlight_deadline().is_some());
    }

    #[test]
    fn highlight_clears_after_delay() {
        let delay = Duration::from_millis(800);
        let mut engine = StepEngine::new(script(vec![vec![chat_step("a"), chat_step("b")]]))
            .with_highlight_delay(delay);
        let t0 = Instant::now();
        engine.next_at(t0);
        engine.take_changed();
        assert!(!engine.tick(t0 + Duration::from_millis(799)));
        assert_eq!(engine.state().active_window(), Some(WindowId::Chat));

        // a second step re-arms from its own start
        engine.next_at(t0 + Duration::from_millis(500));
        assert!(!engine.tick(t0 + Duration::from_millis(900)));
        assert!(engine.tick(t0 + Duration::from_millis(1300)));
        assert_eq!(engine.state().active_window(), None);
        assert!(engine.take_changed());
        assert!(!engine.take_changed());
    }

    #[test]
    fn reversal_leaves_highlight_alone() {
        let mut engine = StepEngine::new(script(vec![vec![chat_step("a"), chat_step("b")]]));
        let t0 = Instant::now();
        engine.next_at(t0);
        engine.next_at(t0);
        engine.prev();
        assert_eq!(engine.state().active_window(), Some(WindowId::Chat));
        assert!(engine.highlight_deadline().is_some());
    }

    #[test]
    fn first_action_while_paused_only_resumes() {
        let mut engine = StepEngine::new(script(vec![vec![chat_step("a")]]));
        engine.handle_action(Action::Advance);
        assert!(!engine.paused());
        assert_eq!(engine.cursor(), -1);
        engine.handle_action(Action::Advance);
        assert_eq!(engine.cursor(), 0);
        engine.handle_action(Action::Retreat);
        assert_eq!(engine.cursor(), -1);
    }

    #[test]
    fn goto_clamps_to_bounds() {
        let mut engine = StepEngine::new(script(vec![vec![chat_step("a"), chat_step("b")]]));
        engine.goto(99);
        assert_eq!(engine.cursor(), 1);
        assert_eq!(engine.undo_depth(), 2);
        engine.goto(-7);
        assert_eq!(engine.cursor(), -1);
        assert_eq!(engine.undo_depth(), 0);
    }
}
