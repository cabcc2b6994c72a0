use casement_common::Rect;
use serde::{Deserialize, Serialize};

/// The managed application and how many instances of it may run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagedAppConfig {
    /// Executable started for each new instance.
    pub executable: String,
    /// Substring matched against native window class names.
    pub class_filter: String,
    /// Slot windows are titled `"<title_prefix> <slot + 1>"`.
    pub title_prefix: String,
    pub max_instances: u32,
    /// Upper bound on waiting for a spawned process to show its window.
    pub spawn_timeout_ms: u64,
    /// How long a graceful close may take before the process is terminated.
    pub close_grace_ms: u64,
    /// Fallback rectangle per slot when nothing has been persisted.
    pub default_slots: Vec<Rect>,
}

impl Default for ManagedAppConfig {
    fn default() -> Self {
        Self {
            executable: "notepad.exe".into(),
            class_filter: "Notepad".into(),
            title_prefix: "Untitled".into(),
            max_instances: 2,
            spawn_timeout_ms: 10_000,
            close_grace_ms: 5_000,
            default_slots: vec![Rect::new(100, 100, 500, 400), Rect::new(620, 100, 1120, 400)],
        }
    }
}

/// Poll loop and outbound event settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub poll_interval_ms: u64,
    /// Events buffered per connected client before it starts lagging.
    pub event_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1_000,
            event_capacity: 256,
        }
    }
}
