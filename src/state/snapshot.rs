use crate::script::FileEntry;

use super::{AccumulatedState, BrowserView, DesignDoc, Marker, OpenFile};

/// Pre-step capture that restores every channel a step can touch.
///
/// The append-only logs only need their lengths; everything a step can
/// replace or merge into is copied whole.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoSnapshot {
    chat_len: usize,
    terminal_len: usize,
    files: Vec<FileEntry>,
    browser: BrowserView,
    markers: Vec<Marker>,
    editor: Option<OpenFile>,
    design: Option<DesignDoc>,
}

impl UndoSnapshot {
    pub fn capture(state: &AccumulatedState) -> Self {
        Self {
            chat_len: state.chat.len(),
            terminal_len: state.terminal.len(),
            files: state.files.clone(),
            browser: state.browser.clone(),
            markers: state.markers.clone(),
            editor: state.editor.clone(),
            design: state.design.clone(),
        }
    }

    /// Roll `state` back to the moment this snapshot was taken.
    ///
    /// Navigation and the active-window highlight are left to the caller.
    pub fn restore(self, state: &mut AccumulatedState) {
        state.chat.truncate(self.chat_len);
        state.terminal.truncate(self.terminal_len);
        state.files = self.files;
        state.browser = self.browser;
        state.markers = self.markers;
        state.editor = self.editor;
        state.design = self.design;
    }
}
