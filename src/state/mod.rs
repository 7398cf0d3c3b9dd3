//! The accumulated state every window renders from.
//!
//! Only the step engine mutates this aggregate; everything else reads it
//! through the accessors below.

pub mod snapshot;

use serde::Serialize;

use crate::script::{
    BrowserEffect, ChatEffect, DesignEffect, DesignScreen, EditorEffect, Endpoint, FileEntry,
    FilesEffect, LineColor, Member, TerminalEffect, WorkspaceState,
};
use crate::window::WindowId;

pub use snapshot::UndoSnapshot;

/// Language assigned to opened files that do not declare one.
pub const DEFAULT_LANGUAGE: &str = "markdown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub from: Member,
    pub text: String,
    pub is_approval: bool,
    pub step_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Command,
    Output,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalLine {
    pub kind: LineKind,
    pub text: String,
    pub color: Option<LineColor>,
    pub step_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenFile {
    pub path: String,
    pub content: String,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesignDoc {
    pub file: String,
    pub screens: Vec<DesignScreen>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserTab {
    #[default]
    Workspace,
    Endpoints,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BrowserView {
    pub tab: BrowserTab,
    pub workspace: WorkspaceState,
    pub endpoints: Vec<Endpoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: &'static str,
    pub name: &'static str,
    pub x: f64,
    pub y: f64,
    pub angle: f64,
}

/// Overlay placed whenever the workspace enters a marker-bearing state.
pub fn default_markers() -> Vec<Marker> {
    const fn marker(id: &'static str, name: &'static str, x: f64, y: f64, angle: f64) -> Marker {
        Marker {
            id,
            name,
            x,
            y,
            angle,
        }
    }
    vec![
        marker("cam-1", "Lobby", 0.2, 0.3, 45.0),
        marker("cam-2", "Hallway A", 0.5, 0.2, 180.0),
        marker("cam-3", "Server Room", 0.8, 0.5, 270.0),
        marker("cam-4", "Exit B", 0.3, 0.8, 90.0),
        marker("cam-5", "Parking", 0.7, 0.85, 135.0),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigation {
    pub phase: Option<usize>,
    /// Global index of the last applied step; -1 before the first step.
    pub step_index: isize,
    pub total_steps: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccumulatedState {
    chat: Vec<ChatMessage>,
    terminal: Vec<TerminalLine>,
    files: Vec<FileEntry>,
    editor: Option<OpenFile>,
    design: Option<DesignDoc>,
    browser: BrowserView,
    markers: Vec<Marker>,
    nav: Navigation,
    active_window: Option<WindowId>,
}

impl AccumulatedState {
    pub fn new(first_phase: Option<usize>, total_steps: usize) -> Self {
        Self {
            chat: Vec::new(),
            terminal: Vec::new(),
            files: Vec::new(),
            editor: None,
            design: None,
            browser: BrowserView::default(),
            markers: Vec::new(),
            nav: Navigation {
                phase: first_phase,
                step_index: -1,
                total_steps,
            },
            active_window: None,
        }
    }

    pub fn chat(&self) -> &[ChatMessage] {
        &self.chat
    }

    pub fn terminal(&self) -> &[TerminalLine] {
        &self.terminal
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    pub fn editor(&self) -> Option<&OpenFile> {
        self.editor.as_ref()
    }

    pub fn design(&self) -> Option<&DesignDoc> {
        self.design.as_ref()
    }

    pub fn browser(&self) -> &BrowserView {
        &self.browser
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn nav(&self) -> Navigation {
        self.nav
    }

    pub fn active_window(&self) -> Option<WindowId> {
        self.active_window
    }

    pub(crate) fn set_phase(&mut self, phase: Option<usize>) {
        self.nav.phase = phase;
    }

    pub(crate) fn set_step_index(&mut self, index: isize) {
        self.nav.step_index = index;
    }

    pub(crate) fn set_active_window(&mut self, window: Option<WindowId>) {
        self.active_window = window;
    }

    pub(crate) fn push_chat(&mut self, step_id: &str, effect: &ChatEffect) {
        self.chat.push(ChatMessage {
            from: effect.from.clone(),
            text: effect.text.clone(),
            is_approval: effect.is_approval,
            step_id: step_id.to_string(),
        });
    }

    pub(crate) fn push_terminal(&mut self, step_id: &str, effect: &TerminalEffect) {
        match effect {
            TerminalEffect::Command { text } => self.terminal.push(TerminalLine {
                kind: LineKind::Command,
                text: text.clone(),
                color: None,
                step_id: step_id.to_string(),
            }),
            TerminalEffect::Output { lines } => {
                self.terminal.extend(lines.iter().map(|line| TerminalLine {
                    kind: LineKind::Output,
                    text: line.text.clone(),
                    color: line.color,
                    step_id: step_id.to_string(),
                }));
            }
        }
    }

    pub(crate) fn merge_files(&mut self, effect: &FilesEffect) {
        for entry in &effect.entries {
            match self.files.iter_mut().find(|e| e.path == entry.path) {
                Some(existing) => *existing = entry.clone(),
                None => self.files.push(entry.clone()),
            }
        }
    }

    pub(crate) fn apply_browser(&mut self, effect: &BrowserEffect) {
        match effect {
            BrowserEffect::Workspace { state } => {
                self.browser.tab = BrowserTab::Workspace;
                self.browser.workspace = *state;
                if state.shows_markers() {
                    self.markers = default_markers();
                }
            }
            BrowserEffect::Endpoints { endpoints } => {
                self.browser.tab = BrowserTab::Endpoints;
                for endpoint in endpoints {
                    if !self.browser.endpoints.iter().any(|e| e.same_route(endpoint)) {
                        self.browser.endpoints.push(endpoint.clone());
                    }
                }
            }
        }
    }

    pub(crate) fn apply_editor(&mut self, effect: &EditorEffect) {
        match effect {
            EditorEffect::OpenFile {
                path,
                content,
                language,
            } => {
                self.editor = Some(OpenFile {
                    path: path.clone(),
                    content: content.clone(),
                    language: language
                        .clone()
                        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
                });
            }
            EditorEffect::UpdateContent { content } => {
                if let Some(file) = self.editor.as_mut() {
                    file.content = content.clone();
                }
            }
            EditorEffect::CloseFile => self.editor = None,
        }
    }

    pub(crate) fn apply_design(&mut self, effect: &DesignEffect) {
        match effect {
            DesignEffect::ShowDesign { file, screens } => {
                self.design = Some(DesignDoc {
                    file: file.clone(),
                    screens: screens.clone(),
                });
            }
        }
    }
}
