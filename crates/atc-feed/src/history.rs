use atc_core::TraceEvent;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::FeedError;

/// Result of loading a historical batch from disk.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TraceFileLoad {
    pub events: Vec<TraceEvent>,
    pub skipped_corrupt_lines: usize,
}

/// Parse one wire frame into a trace event. Shared by the file loader and
/// the live feed.
pub fn decode_event_frame(frame: &str) -> Result<TraceEvent, FeedError> {
    Ok(serde_json::from_str(frame)?)
}

/// Load a JSONL trace file (one event per line, Event Store wire format).
/// Corrupt lines are skipped and counted, never fatal; blank lines are
/// ignored.
pub fn load_trace_file(path: impl AsRef<Path>) -> Result<TraceFileLoad, FeedError> {
    let raw = fs::read_to_string(path.as_ref())?;
    let mut load = TraceFileLoad::default();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match decode_event_frame(line) {
            Ok(event) => load.events.push(event),
            Err(err) => {
                warn!("skipping corrupt trace line: {err}");
                load.skipped_corrupt_lines += 1;
            }
        }
    }
    Ok(load)
}
