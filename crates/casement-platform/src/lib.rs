//! Native window and process control for casement.
//!
//! `WindowDirectory` is the query/command surface over top-level OS
//! windows, `ProcessControl` the raw process primitives, and
//! `ProcessLifecycle` the policy layered on top of them (bounded waits,
//! graceful close before forced termination).

pub mod backend;
pub mod directory;
pub mod process;

pub use backend::{create_process_control, create_window_directory};
pub use directory::{NativeWindow, WindowDirectory, WindowSnapshot};
pub use process::{CloseOutcome, LifecycleSettings, ProcessControl, ProcessLifecycle};

pub type Result<T> = std::result::Result<T, casement_common::PlatformError>;
