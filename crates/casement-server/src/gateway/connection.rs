//! Per-connection handler: snapshot, then forward events out and
//! commands in until the peer goes away.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use casement_common::SyncEvent;
use casement_sync::Synchronizer;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use crate::protocol;

type WsSink = futures_util::stream::SplitSink<WebSocketStream<TcpStream>, Message>;

pub async fn handle_connection(
    ws: WebSocketStream<TcpStream>,
    addr: SocketAddr,
    sync: Arc<Synchronizer>,
    idle_timeout: Option<Duration>,
) {
    let (mut sink, mut stream) = ws.split();

    // Subscribe before the snapshot so nothing falls between the two.
    let mut events = sync.subscribe();
    tracing::info!(peer = %addr, clients = sync.subscriber_count(), "Client connected");

    for window in sync.snapshot().await {
        if window.logical_type.is_empty() {
            continue;
        }
        let event = SyncEvent::Upsert {
            window_type: window.logical_type,
            rect: window.rect,
        };
        if send_event(&mut sink, &event).await.is_err() {
            tracing::debug!(peer = %addr, "Client went away during snapshot");
            return;
        }
    }

    // Listen-only clients never send anything on their own. They get a
    // Ping every half idle timeout, and their Pong counts as activity.
    let mut deadline = idle_timeout.map(|t| Instant::now() + t);
    let mut keepalive = idle_timeout.map(|t| {
        let period = (t / 2).max(Duration::from_millis(1));
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    });

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    if send_event(&mut sink, &event).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(peer = %addr, skipped, "Client lagging, events dropped");
                }
                Err(RecvError::Closed) => break,
            },

            frame = stream.next() => {
                deadline = idle_timeout.map(|t| Instant::now() + t);
                match frame {
                    Some(Ok(Message::Text(text))) => match protocol::decode(&text) {
                        Ok(command) => {
                            tracing::debug!(peer = %addr, ?command, "Command received");
                            sync.handle(command).await;
                        }
                        Err(e) => {
                            tracing::warn!(peer = %addr, error = %e, "Dropping bad message");
                        }
                    },
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(peer = %addr, error = %e, "WS error");
                        break;
                    }
                    _ => {}
                }
            }

            _ = keepalive_tick(&mut keepalive) => {
                if sink.send(Message::Ping(Default::default())).await.is_err() {
                    break;
                }
            }

            _ = idle(deadline) => {
                tracing::info!(peer = %addr, "Idle timeout");
                break;
            }
        }
    }

    let _ = sink.close().await;
    tracing::info!(peer = %addr, "Client disconnected");
}

async fn idle(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

async fn keepalive_tick(keepalive: &mut Option<Interval>) {
    match keepalive {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn send_event(
    sink: &mut WsSink,
    event: &SyncEvent,
) -> Result<(), tokio_tungstenite::tungstenite::Error> {
    match protocol::encode(event) {
        Ok(json) => sink.send(Message::Text(json.into())).await,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to encode event");
            Ok(())
        }
    }
}
