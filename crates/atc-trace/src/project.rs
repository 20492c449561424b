//! Projections over a reconciled trace log.
//!
//! Both projectors are iterative left-folds over the ascending event
//! sequence. They are re-run from scratch whenever the reconciled log
//! changes; given the same input they produce the same output.

use atc_core::vfs::{
    TOOL_CREATE_DIRECTORY, TOOL_DELETE_FILE, TOOL_EDIT_FILE, TOOL_WRITE_FILE,
};
use atc_core::{
    EventType, FileNodeKind, FilesystemNode, FilesystemOpContent, FilesystemSnapshot,
    PlanSnapshot, PlanUpdateContent, TraceEvent,
};

/// Recover the most current todo plan, or `None` if the execution has never
/// published one. `version` counts plan-update events, the todos come from
/// the last one in the sequence.
pub fn project_plan(reconciled: &[TraceEvent]) -> Option<PlanSnapshot> {
    let mut version = 0usize;
    let mut latest: Option<&TraceEvent> = None;
    for event in reconciled {
        if event.event_type == EventType::PlanUpdate {
            version += 1;
            latest = Some(event);
        }
    }
    latest.map(|event| PlanSnapshot {
        todos: PlanUpdateContent::from_event_content(&event.content).todos,
        version,
    })
}

/// Replay filesystem-operation events into the current believed state of the
/// execution's virtual filesystem. Reads, unknown tools, and operations with
/// no path mutate nothing.
pub fn project_filesystem(reconciled: &[TraceEvent]) -> FilesystemSnapshot {
    let mut snapshot = FilesystemSnapshot::default();
    for event in reconciled {
        if event.event_type != EventType::FilesystemOperation {
            continue;
        }
        let op = FilesystemOpContent::from_event_content(&event.content);
        if op.input.path.is_empty() {
            continue;
        }
        match op.tool.as_str() {
            TOOL_WRITE_FILE | TOOL_EDIT_FILE => {
                let content = op.input.content.unwrap_or_default();
                snapshot.nodes.insert(
                    op.input.path.clone(),
                    FilesystemNode {
                        path: op.input.path,
                        kind: FileNodeKind::File,
                        size_bytes: Some(content.len() as u64),
                        content: Some(content),
                        updated_at: event.timestamp,
                    },
                );
            }
            TOOL_CREATE_DIRECTORY => {
                snapshot.nodes.insert(
                    op.input.path.clone(),
                    FilesystemNode {
                        path: op.input.path,
                        kind: FileNodeKind::Directory,
                        content: None,
                        size_bytes: None,
                        updated_at: event.timestamp,
                    },
                );
            }
            TOOL_DELETE_FILE => {
                // Deleting an absent path is a no-op, not an error.
                snapshot.nodes.remove(&op.input.path);
            }
            // read-file, list-directory, and anything unrecognized.
            _ => {}
        }
    }
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::{json, Value};

    fn ts(sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 10, 0, sec)
            .single()
            .expect("valid timestamp")
    }

    fn event(seq: u64, event_type: EventType, content: Value) -> TraceEvent {
        TraceEvent {
            execution_id: "exec-1".to_string(),
            sequence_number: seq,
            event_type,
            content,
            timestamp: ts(seq as u32),
        }
    }

    fn plan_update(seq: u64, status: &str) -> TraceEvent {
        event(
            seq,
            EventType::PlanUpdate,
            json!({"todos": [{"id": 1, "description": "Research", "status": status}]}),
        )
    }

    fn fs_op(seq: u64, tool: &str, path: &str, content: Option<&str>) -> TraceEvent {
        let mut input = json!({"path": path});
        if let Some(content) = content {
            input["content"] = json!(content);
        }
        event(
            seq,
            EventType::FilesystemOperation,
            json!({"tool": tool, "input": input}),
        )
    }

    #[test]
    fn plan_is_latest_wins_and_version_counts_updates() {
        let reconciled = vec![
            plan_update(1, "pending"),
            plan_update(2, "in_progress"),
            plan_update(3, "completed"),
        ];
        let plan = project_plan(&reconciled).expect("plan present");
        assert_eq!(plan.version, 3);
        assert_eq!(plan.todos.len(), 1);
        assert_eq!(plan.todos[0].status.as_str(), "completed");
    }

    #[test]
    fn no_plan_updates_yield_none() {
        let reconciled = vec![event(0, EventType::ExecutionStart, json!({}))];
        assert!(project_plan(&reconciled).is_none());
    }

    #[test]
    fn malformed_plan_content_yields_empty_todos() {
        let reconciled = vec![event(1, EventType::PlanUpdate, json!({"todos": 42}))];
        let plan = project_plan(&reconciled).expect("plan present");
        assert!(plan.todos.is_empty());
        assert_eq!(plan.version, 1);
    }

    #[test]
    fn write_then_delete_leaves_no_node() {
        let reconciled = vec![
            fs_op(1, "write-file", "/a.txt", Some("x")),
            fs_op(2, "write-file", "/a.txt", Some("y")),
            fs_op(3, "delete-file", "/a.txt", None),
        ];
        let snapshot = project_filesystem(&reconciled);
        assert!(snapshot.get("/a.txt").is_none());
        assert!(snapshot.is_empty());
    }

    #[test]
    fn edit_updates_content_and_size() {
        let reconciled = vec![
            fs_op(1, "write-file", "/a.txt", Some("x")),
            fs_op(2, "edit-file", "/a.txt", Some("yz")),
        ];
        let snapshot = project_filesystem(&reconciled);
        let node = snapshot.get("/a.txt").expect("node present");
        assert_eq!(node.content.as_deref(), Some("yz"));
        assert_eq!(node.size_bytes, Some(2));
        assert_eq!(node.updated_at, ts(2));
    }

    #[test]
    fn directories_and_files_coexist() {
        let reconciled = vec![
            fs_op(1, "create-directory", "/src", None),
            fs_op(2, "write-file", "/src/main.rs", Some("fn main() {}")),
        ];
        let snapshot = project_filesystem(&reconciled);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(
            snapshot.get("/src").expect("dir").kind,
            FileNodeKind::Directory
        );
        assert_eq!(
            snapshot.get("/src/main.rs").expect("file").kind,
            FileNodeKind::File
        );
    }

    #[test]
    fn reads_unknown_tools_and_missing_paths_are_no_ops() {
        let reconciled = vec![
            fs_op(1, "write-file", "/a.txt", Some("x")),
            fs_op(2, "read-file", "/a.txt", None),
            fs_op(3, "list-directory", "/", None),
            fs_op(4, "chmod-file", "/a.txt", None),
            event(5, EventType::FilesystemOperation, json!({"tool": "write-file"})),
        ];
        let snapshot = project_filesystem(&reconciled);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(
            snapshot.get("/a.txt").expect("node").content.as_deref(),
            Some("x")
        );
    }

    #[test]
    fn replay_is_deterministic() {
        let reconciled = vec![
            fs_op(1, "write-file", "/a.txt", Some("x")),
            fs_op(2, "create-directory", "/docs", None),
            fs_op(3, "edit-file", "/a.txt", Some("y")),
            fs_op(4, "delete-file", "/missing.txt", None),
        ];
        assert_eq!(
            project_filesystem(&reconciled),
            project_filesystem(&reconciled)
        );
    }
}
