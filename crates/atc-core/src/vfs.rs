//! Virtual-filesystem contract: the payload of `filesystem-operation` events
//! and the snapshot derived by replaying them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const TOOL_WRITE_FILE: &str = "write-file";
pub const TOOL_EDIT_FILE: &str = "edit-file";
pub const TOOL_CREATE_DIRECTORY: &str = "create-directory";
pub const TOOL_DELETE_FILE: &str = "delete-file";
pub const TOOL_READ_FILE: &str = "read-file";
pub const TOOL_LIST_DIRECTORY: &str = "list-directory";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileNodeKind {
    File,
    Directory,
}

impl FileNodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileNodeKind::File => "file",
            FileNodeKind::Directory => "directory",
        }
    }
}

impl std::fmt::Display for FileNodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file or directory the execution is currently believed to have on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FilesystemNode {
    pub path: String,
    pub kind: FileNodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    pub updated_at: DateTime<Utc>,
}

/// Mapping from path to node, rebuilt from scratch on every trace change.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilesystemSnapshot {
    pub nodes: BTreeMap<String, FilesystemNode>,
}

impl FilesystemSnapshot {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&FilesystemNode> {
        self.nodes.get(path)
    }
}

/// Typed view of a `filesystem-operation` event's `content`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilesystemOpContent {
    #[serde(default)]
    pub tool: String,
    #[serde(default)]
    pub input: FilesystemOpInput,
    #[serde(default)]
    pub output: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilesystemOpInput {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl FilesystemOpContent {
    /// Extract the operation payload from an event's open content. Malformed
    /// shapes degrade to an empty tool name, which no dispatcher acts on.
    pub fn from_event_content(content: &Value) -> Self {
        serde_json::from_value(content.clone()).unwrap_or_default()
    }
}
