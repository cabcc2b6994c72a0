//! Process control: raw OS primitives plus the lifecycle policy on top.

mod lifecycle;

pub use lifecycle::{CloseOutcome, LifecycleSettings, ProcessLifecycle};

use casement_common::{ProcessId, WindowHandle};

use crate::Result;

/// Raw, non-blocking process primitives. Waiting and fallback ordering
/// live in `ProcessLifecycle`, not here.
pub trait ProcessControl: Send + Sync {
    /// Start one instance of `executable`.
    fn spawn(&self, executable: &str) -> Result<ProcessId>;

    /// The visible top-level window owned by `pid`, if it has one yet.
    fn main_window(&self, pid: ProcessId) -> Result<Option<WindowHandle>>;

    /// The process that owns `window`.
    fn owner_of(&self, window: WindowHandle) -> Result<ProcessId>;

    /// Post a close request to the window. Returns once the request is
    /// queued, not when the process exits.
    fn request_close(&self, window: WindowHandle) -> Result<()>;

    fn is_running(&self, pid: ProcessId) -> Result<bool>;

    /// Forceful termination. Unsaved state in the process is lost.
    fn terminate(&self, pid: ProcessId) -> Result<()>;
}
