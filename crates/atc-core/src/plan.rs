//! Todo-plan contract: the payload carried by `plan-update` events and the
//! snapshot derived from them.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// One entry in an execution's todo plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoItem {
    /// Some backends emit numeric ids, some strings; normalize to String.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TodoStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    Pending,
    InProgress,
    Completed,
    Blocked,
}

impl Default for TodoStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl TodoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::Pending => "pending",
            TodoStatus::InProgress => "in_progress",
            TodoStatus::Completed => "completed",
            TodoStatus::Blocked => "blocked",
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, TodoStatus::Completed)
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TodoStatus {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_lowercase();
        match normalized.as_str() {
            "pending" => Ok(TodoStatus::Pending),
            "in_progress" | "in-progress" | "inprogress" => Ok(TodoStatus::InProgress),
            "completed" => Ok(TodoStatus::Completed),
            "blocked" => Ok(TodoStatus::Blocked),
            other => Err(format!("Unknown todo status: {other}")),
        }
    }
}

/// Typed view of a `plan-update` event's `content`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PlanUpdateContent {
    #[serde(default)]
    pub todos: Vec<TodoItem>,
}

impl PlanUpdateContent {
    /// Extract the plan payload from an event's open content. Malformed or
    /// missing `todos` degrades to an empty list rather than failing.
    pub fn from_event_content(content: &Value) -> Self {
        serde_json::from_value(content.clone()).unwrap_or_default()
    }
}

/// The most current todo plan recovered from a reconciled trace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanSnapshot {
    pub todos: Vec<TodoItem>,
    /// Count of plan-update events observed so far. A revision counter,
    /// not the sequence number of the latest update.
    pub version: usize,
}

/// Deserialize an id that can be either a string or a number into a String.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let val: Value = Value::deserialize(deserializer)?;
    match val {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(serde::de::Error::custom("expected string or number for id")),
    }
}
