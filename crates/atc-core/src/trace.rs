//! Wire contract for execution trace events.
//!
//! Field names and tag values are what the Event Store emits; they must not
//! drift, or every consumer of the executions API breaks. `sequence_number`
//! is the sole identity and ordering key — `timestamp` is display-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A single observed occurrence during an execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TraceEvent {
    /// Identifier of the owning execution.
    pub execution_id: String,
    /// Unique and monotonically assigned per execution by the Event Store.
    pub sequence_number: u64,
    pub event_type: EventType,
    /// Open payload; shape depends on `event_type`.
    #[serde(default)]
    pub content: Value,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    ModelCall,
    ModelResponse,
    ToolCall,
    ToolResult,
    Error,
    PlanUpdate,
    FilesystemOperation,
    Completion,
    ExecutionStart,
    ExecutionEnd,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::ModelCall => "model-call",
            EventType::ModelResponse => "model-response",
            EventType::ToolCall => "tool-call",
            EventType::ToolResult => "tool-result",
            EventType::Error => "error",
            EventType::PlanUpdate => "plan-update",
            EventType::FilesystemOperation => "filesystem-operation",
            EventType::Completion => "completion",
            EventType::ExecutionStart => "execution-start",
            EventType::ExecutionEnd => "execution-end",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_lowercase();
        match normalized.as_str() {
            "model-call" => Ok(EventType::ModelCall),
            "model-response" => Ok(EventType::ModelResponse),
            "tool-call" => Ok(EventType::ToolCall),
            "tool-result" => Ok(EventType::ToolResult),
            "error" => Ok(EventType::Error),
            "plan-update" => Ok(EventType::PlanUpdate),
            "filesystem-operation" => Ok(EventType::FilesystemOperation),
            "completion" => Ok(EventType::Completion),
            "execution-start" => Ok(EventType::ExecutionStart),
            "execution-end" => Ok(EventType::ExecutionEnd),
            other => Err(format!("Unknown event type: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 10, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn serializes_with_event_store_field_names() {
        let event = TraceEvent {
            execution_id: "exec-1".to_string(),
            sequence_number: 7,
            event_type: EventType::PlanUpdate,
            content: json!({"todos": []}),
            timestamp: ts(),
        };
        let value = serde_json::to_value(&event).expect("serialize");
        let object = value.as_object().expect("object");
        assert!(object.contains_key("executionId"));
        assert!(object.contains_key("sequenceNumber"));
        assert_eq!(object["eventType"], json!("plan-update"));
        assert!(object.contains_key("timestamp"));
    }

    #[test]
    fn deserializes_wire_frame() {
        let frame = r#"{
            "executionId": "exec-1",
            "sequenceNumber": 3,
            "eventType": "filesystem-operation",
            "content": {"tool": "write-file", "input": {"path": "/a.txt", "content": "x"}},
            "timestamp": "2026-08-01T10:00:00Z"
        }"#;
        let event: TraceEvent = serde_json::from_str(frame).expect("deserialize");
        assert_eq!(event.sequence_number, 3);
        assert_eq!(event.event_type, EventType::FilesystemOperation);
    }

    #[test]
    fn event_type_round_trips_through_strings() {
        for tag in [
            "model-call",
            "model-response",
            "tool-call",
            "tool-result",
            "error",
            "plan-update",
            "filesystem-operation",
            "completion",
            "execution-start",
            "execution-end",
        ] {
            let parsed: EventType = tag.parse().expect("known tag");
            assert_eq!(parsed.as_str(), tag);
        }
        assert!("unknown-tag".parse::<EventType>().is_err());
    }
}
