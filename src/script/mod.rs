//! Authored replay scripts.
//!
//! A script is an ordered list of phases, each holding an ordered list of
//! steps. Steps carry at most one effect per channel; the engine treats the
//! whole structure as read-only input.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEMO_SCRIPT: &str = include_str!("../../assets/demo_script.json");

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse script {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub title: String,
    #[serde(default)]
    pub phases: Vec<Phase>,
}

impl Script {
    /// Load a script from a JSON file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, &path.display().to_string())
    }

    pub fn from_json(text: &str, origin: &str) -> Result<Self, ScriptError> {
        let script: Script = serde_json::from_str(text).map_err(|source| ScriptError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        tracing::info!(
            origin,
            phases = script.phases.len(),
            steps = script.step_count(),
            "loaded script"
        );
        Ok(script)
    }

    /// The script bundled with the binary.
    pub fn demo() -> Result<Self, ScriptError> {
        Self::from_json(DEMO_SCRIPT, "<embedded demo>")
    }

    pub fn step_count(&self) -> usize {
        self.phases.iter().map(|phase| phase.steps.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat: Option<ChatEffect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<TerminalEffect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<FilesEffect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<BrowserEffect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<EditorEffect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design: Option<DesignEffect>,
}

impl Step {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ADM")]
    Admin,
    #[serde(rename = "PM")]
    Product,
    #[serde(rename = "RD")]
    Engineering,
    #[serde(rename = "UX")]
    Design,
    Agent,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "ADM",
            Role::Product => "PM",
            Role::Engineering => "RD",
            Role::Design => "UX",
            Role::Agent => "Agent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub role: Role,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEffect {
    pub from: Member,
    pub text: String,
    #[serde(default)]
    pub is_approval: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineColor {
    Green,
    Yellow,
    Cyan,
    Red,
    White,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLine {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<LineColor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum TerminalEffect {
    Command { text: String },
    Output { lines: Vec<OutputLine> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Folder,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub modified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesEffect {
    pub entries: Vec<FileEntry>,
}

/// States of the marker workspace tab, in authoring order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceState {
    #[default]
    Empty,
    Skeleton,
    Markers,
    Interactive,
    Final,
}

impl WorkspaceState {
    /// Whether entering this state places the default marker overlay.
    pub fn shows_markers(self) -> bool {
        matches!(
            self,
            WorkspaceState::Markers | WorkspaceState::Interactive | WorkspaceState::Final
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: String,
    pub summary: String,
}

impl Endpoint {
    pub fn same_route(&self, other: &Endpoint) -> bool {
        self.method == other.method && self.path == other.path
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tab", rename_all = "lowercase")]
pub enum BrowserEffect {
    Workspace { state: WorkspaceState },
    Endpoints { endpoints: Vec<Endpoint> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum EditorEffect {
    OpenFile {
        path: String,
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    UpdateContent {
        content: String,
    },
    CloseFile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignElement {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignScreen {
    pub name: String,
    #[serde(default)]
    pub elements: Vec<DesignElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum DesignEffect {
    ShowDesign {
        file: String,
        screens: Vec<DesignScreen>,
    },
}
