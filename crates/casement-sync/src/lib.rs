//! Window state synchronization engine.
//!
//! Keeps three views of the managed windows converged: what the OS window
//! manager reports, what the position store remembers, and what connected
//! clients have been told.

pub mod command;
pub mod store;
pub mod synchronizer;
pub mod tracked;

pub use command::Command;
pub use store::{create_store, JsonFileStore, MemoryStore, PersistedPosition, PositionStore};
pub use synchronizer::{SyncSettings, Synchronizer, TickReport};
pub use tracked::{Change, TrackedWindow, TrackedWindows};
