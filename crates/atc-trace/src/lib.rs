//! Execution-trace derivation: reconcile the historical batch with the live
//! stream, then project the plan and virtual-filesystem snapshots from the
//! reconciled log.
//!
//! Everything here is a pure recomputation over caller-owned inputs; no
//! state survives between calls except the buffers a [`TraceSession`] holds.

pub mod project;
pub mod reconcile;
pub mod session;

pub use project::{project_filesystem, project_plan};
pub use reconcile::reconcile;
pub use session::TraceSession;
