pub mod plan;
pub mod trace;
pub mod vfs;

pub use plan::{PlanSnapshot, PlanUpdateContent, TodoItem, TodoStatus};
pub use trace::{EventType, TraceEvent};
pub use vfs::{
    FileNodeKind, FilesystemNode, FilesystemOpContent, FilesystemOpInput, FilesystemSnapshot,
};
