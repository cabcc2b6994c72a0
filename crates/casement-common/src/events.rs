use tokio::sync::broadcast;

use crate::types::Rect;

/// A confirmed change to one tracked window, keyed by its logical type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    Upsert { window_type: String, rect: Rect },
    Closed { window_type: String },
}

/// Fan-out of `SyncEvent`s to every connected client. Each subscriber
/// owns its own queue; a slow subscriber lags without blocking others.
pub struct EventBus {
    sender: broadcast::Sender<SyncEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of subscribers the event was queued for.
    pub fn publish(&self, event: SyncEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
