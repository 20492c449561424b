use atc_core::{FilesystemSnapshot, PlanSnapshot, TraceEvent};

use crate::project::{project_filesystem, project_plan};
use crate::reconcile::reconcile;

/// View-session owner of one execution's trace.
///
/// Holds the latest historical batch and the accumulated live buffer, and
/// recomputes the reconciled log plus both derived snapshots from scratch on
/// every mutation. Event counts are bounded by one execution, so the O(n)
/// recompute is cheaper than carrying incremental state that can go stale.
#[derive(Debug, Clone)]
pub struct TraceSession {
    execution_id: String,
    historical: Vec<TraceEvent>,
    live: Vec<TraceEvent>,
    reconciled: Vec<TraceEvent>,
    plan: Option<PlanSnapshot>,
    filesystem: FilesystemSnapshot,
    discarded_foreign: usize,
}

impl TraceSession {
    pub fn new(execution_id: impl Into<String>) -> Self {
        Self {
            execution_id: execution_id.into(),
            historical: Vec::new(),
            live: Vec::new(),
            reconciled: Vec::new(),
            plan: None,
            filesystem: FilesystemSnapshot::default(),
            discarded_foreign: 0,
        }
    }

    /// Replace the historical batch with a fresh fetch. The new batch is the
    /// whole truth for the historical side: sequence numbers that only
    /// existed in the previous batch survive only if the live buffer also
    /// carries them. Events from other executions are discarded and counted.
    pub fn replace_historical(&mut self, batch: Vec<TraceEvent>) {
        self.historical = self.retain_own(batch);
        self.recompute();
    }

    /// Append one live event. Returns false if the event belonged to a
    /// different execution and was discarded.
    pub fn push_live(&mut self, event: TraceEvent) -> bool {
        if event.execution_id != self.execution_id {
            self.discarded_foreign += 1;
            return false;
        }
        self.live.push(event);
        self.recompute();
        true
    }

    /// Append a batch of live events, then recompute once.
    pub fn extend_live(&mut self, events: impl IntoIterator<Item = TraceEvent>) {
        let own = self.retain_own(events.into_iter().collect());
        self.live.extend(own);
        self.recompute();
    }

    pub fn execution_id(&self) -> &str {
        &self.execution_id
    }

    /// The deduplicated union of both sources, historical first.
    pub fn reconciled(&self) -> &[TraceEvent] {
        &self.reconciled
    }

    pub fn plan(&self) -> Option<&PlanSnapshot> {
        self.plan.as_ref()
    }

    pub fn filesystem(&self) -> &FilesystemSnapshot {
        &self.filesystem
    }

    /// Events dropped because their execution id did not match the session's.
    pub fn discarded_foreign(&self) -> usize {
        self.discarded_foreign
    }

    fn retain_own(&mut self, events: Vec<TraceEvent>) -> Vec<TraceEvent> {
        let mut own = Vec::with_capacity(events.len());
        for event in events {
            if event.execution_id == self.execution_id {
                own.push(event);
            } else {
                self.discarded_foreign += 1;
            }
        }
        own
    }

    fn recompute(&mut self) {
        self.reconciled = reconcile(&self.historical, &self.live);
        self.plan = project_plan(&self.reconciled);
        self.filesystem = project_filesystem(&self.reconciled);
    }
}
