use atc_core::TraceEvent;
use std::collections::HashSet;

/// Merge the latest historical batch with the accumulated live buffer into
/// one duplicate-free trace log.
///
/// Concatenates historical then live and keeps the first occurrence of each
/// `sequence_number`, so the historical copy wins any shared key. This is a
/// stable filter, not a sort: each source is expected to already be ascending
/// by sequence number, and out-of-order input is passed through unchanged.
pub fn reconcile(historical: &[TraceEvent], live: &[TraceEvent]) -> Vec<TraceEvent> {
    let mut seen: HashSet<u64> = HashSet::with_capacity(historical.len() + live.len());
    let mut reconciled = Vec::with_capacity(historical.len() + live.len());
    for event in historical.iter().chain(live.iter()) {
        if seen.insert(event.sequence_number) {
            reconciled.push(event.clone());
        }
    }
    reconciled
}
