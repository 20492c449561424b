use atc_core::TraceEvent;
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};
use url::Url;

use crate::history::decode_event_frame;

/// Fixed delay between reconnect attempts once the stream drops.
pub const RECONNECT_DELAY_SECS: u64 = 3;
const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct LiveFeedConfig {
    /// Event Store stream endpoint, e.g. `ws://host/api/executions/stream`.
    pub url: Url,
    pub execution_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubscribeFrame<'a> {
    #[serde(rename = "type")]
    frame_type: &'a str,
    execution_id: &'a str,
}

fn subscribe_frame(execution_id: &str) -> String {
    serde_json::to_string(&SubscribeFrame {
        frame_type: "subscribe",
        execution_id,
    })
    .unwrap_or_default()
}

/// Handle to a running feed task. Dropping the receiver also stops the task;
/// this gives the owner an explicit teardown for when the view closes.
pub struct LiveFeedHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl LiveFeedHandle {
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        let _ = self.task.await;
    }
}

pub struct LiveFeed;

impl LiveFeed {
    /// Spawn the feed task: connect, subscribe to the execution, forward
    /// each decoded event to the returned channel, and reconnect after a
    /// fixed delay whenever the connection drops.
    pub fn spawn(config: LiveFeedConfig) -> (mpsc::Receiver<TraceEvent>, LiveFeedHandle) {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(feed_loop(config, tx, shutdown_rx));
        (
            rx,
            LiveFeedHandle {
                shutdown: shutdown_tx,
                task,
            },
        )
    }
}

async fn feed_loop(
    config: LiveFeedConfig,
    tx: mpsc::Sender<TraceEvent>,
    mut shutdown: oneshot::Receiver<()>,
) {
    loop {
        let connect = tokio::select! {
            result = connect_async(config.url.clone()) => result,
            _ = &mut shutdown => return,
        };
        let (mut ws, _) = match connect {
            Ok(value) => value,
            Err(err) => {
                warn!("event store connect error: {err}");
                if pause_or_shutdown(&mut shutdown).await {
                    return;
                }
                continue;
            }
        };

        let frame = subscribe_frame(&config.execution_id);
        if ws.send(Message::Text(frame)).await.is_err() {
            warn!("event store subscribe error");
            let _ = ws.close(None).await;
            if pause_or_shutdown(&mut shutdown).await {
                return;
            }
            continue;
        }
        debug!("subscribed to execution {}", config.execution_id);

        loop {
            tokio::select! {
                msg = ws.next() => match msg {
                    Some(Ok(Message::Text(text))) => match decode_event_frame(&text) {
                        Ok(event) => {
                            if event.execution_id != config.execution_id {
                                debug!(
                                    "dropping frame for foreign execution {}",
                                    event.execution_id
                                );
                                continue;
                            }
                            if tx.send(event).await.is_err() {
                                // Consumer is gone; the view closed.
                                let _ = ws.close(None).await;
                                return;
                            }
                        }
                        Err(err) => warn!("undecodable event frame: {err}"),
                    },
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!("event store stream error: {err}");
                        break;
                    }
                    None => break,
                },
                _ = &mut shutdown => {
                    let _ = ws.close(None).await;
                    return;
                }
            }
        }

        let _ = ws.close(None).await;
        if pause_or_shutdown(&mut shutdown).await {
            return;
        }
    }
}

/// Wait out the reconnect delay. Returns true if shutdown fired first.
async fn pause_or_shutdown(shutdown: &mut oneshot::Receiver<()>) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(RECONNECT_DELAY_SECS)) => false,
        _ = &mut *shutdown => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn subscribe_frame_uses_wire_field_names() {
        let frame = subscribe_frame("exec-9");
        let value: Value = serde_json::from_str(&frame).expect("valid json");
        assert_eq!(value["type"], "subscribe");
        assert_eq!(value["executionId"], "exec-9");
    }
}
