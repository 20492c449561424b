//! Event Store client: historical-batch loading and the live WebSocket feed.
//!
//! The trace core is pure; this crate owns every suspension point — file
//! reads for the historical side, the socket and its reconnect loop for the
//! live side.

use thiserror::Error;

pub mod history;
pub mod live;

pub use history::{decode_event_frame, load_trace_file, TraceFileLoad};
pub use live::{LiveFeed, LiveFeedConfig, LiveFeedHandle, RECONNECT_DELAY_SECS};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
