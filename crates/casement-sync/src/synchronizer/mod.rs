//! Window State Synchronizer.
//!
//! Owns the tracked-window map and keeps it converged with the native
//! window directory (poll loop), the position store (saves on every
//! confirmed change) and connected clients (events on the bus). All map
//! access goes through one async mutex, held only for map updates and
//! synchronous native calls; process spawn and close waits run without it.

mod commands;
mod poll;

#[cfg(test)]
mod fakes;

pub use poll::TickReport;

use std::sync::Arc;
use std::time::Duration;

use casement_common::{EventBus, Rect, SyncEvent};
use casement_config::CasementConfig;
use casement_platform::{ProcessLifecycle, WindowDirectory};
use tokio::sync::{broadcast, Mutex};

use crate::command::Command;
use crate::store::PositionStore;
use crate::tracked::{TrackedWindow, TrackedWindows};

#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub executable: String,
    pub class_filter: String,
    pub title_prefix: String,
    pub max_instances: usize,
    pub default_slots: Vec<Rect>,
    pub poll_interval: Duration,
    pub event_capacity: usize,
}

impl SyncSettings {
    pub fn from_config(config: &CasementConfig) -> Self {
        Self {
            executable: config.app.executable.clone(),
            class_filter: config.app.class_filter.clone(),
            title_prefix: config.app.title_prefix.clone(),
            max_instances: config.app.max_instances as usize,
            default_slots: config.app.default_slots.clone(),
            poll_interval: Duration::from_millis(config.sync.poll_interval_ms),
            event_capacity: config.sync.event_capacity,
        }
    }

    pub fn slot_title(&self, slot: usize) -> String {
        format!("{} {}", self.title_prefix, slot + 1)
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self::from_config(&CasementConfig::default())
    }
}

pub struct Synchronizer {
    directory: Arc<dyn WindowDirectory>,
    lifecycle: ProcessLifecycle,
    store: Arc<dyn PositionStore>,
    tracked: Mutex<TrackedWindows>,
    /// Serializes open requests so two clients cannot claim the same slot.
    open_gate: Mutex<()>,
    bus: EventBus,
    settings: SyncSettings,
}

impl Synchronizer {
    pub fn new(
        directory: Arc<dyn WindowDirectory>,
        lifecycle: ProcessLifecycle,
        store: Arc<dyn PositionStore>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            directory,
            lifecycle,
            store,
            tracked: Mutex::new(TrackedWindows::new()),
            open_gate: Mutex::new(()),
            bus: EventBus::new(settings.event_capacity),
            settings,
        }
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.bus.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.bus.subscriber_count()
    }

    /// Current tracked state, ordered by logical type.
    pub async fn snapshot(&self) -> Vec<TrackedWindow> {
        self.tracked.lock().await.snapshot()
    }

    /// Apply one decoded client command.
    pub async fn handle(&self, command: Command) {
        match command {
            Command::Open => {
                self.open_instances().await;
            }
            Command::Move { window_type, rect } => {
                self.move_window(&window_type, rect).await;
            }
            Command::Close { window_type } => {
                self.close_window(&window_type).await;
            }
        }
    }

    async fn persist(&self, window_type: &str, rect: Rect) {
        if window_type.is_empty() {
            return;
        }
        if let Err(e) = self.store.save(window_type, rect).await {
            tracing::warn!(window_type, error = %e, "Failed to persist position");
        }
    }

    fn publish_upsert(&self, window: &TrackedWindow) {
        if window.logical_type.is_empty() {
            tracing::debug!(handle = %window.handle, "Not broadcasting untitled window");
            return;
        }
        self.bus.publish(SyncEvent::Upsert {
            window_type: window.logical_type.clone(),
            rect: window.rect,
        });
    }

    fn publish_closed(&self, window: &TrackedWindow) {
        if window.logical_type.is_empty() {
            return;
        }
        self.bus.publish(SyncEvent::Closed {
            window_type: window.logical_type.clone(),
        });
    }

    /// Re-send every tracked window as an upsert.
    fn publish_state(&self, tracked: &TrackedWindows) {
        for window in tracked.snapshot() {
            self.publish_upsert(&window);
        }
    }
}
