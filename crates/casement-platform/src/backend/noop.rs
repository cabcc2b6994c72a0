//! No-op backend.
//!
//! Used on platforms without native window management. No window ever
//! exists, so every window-targeted call reports `WindowNotFound`.

use casement_common::{PlatformError, ProcessId, Rect, WindowHandle};

use crate::directory::{WindowDirectory, WindowSnapshot};
use crate::process::ProcessControl;
use crate::Result;

pub struct NoopDesktop;

impl WindowDirectory for NoopDesktop {
    fn enumerate(&self, _class_filter: &str) -> Result<WindowSnapshot> {
        Ok(WindowSnapshot::empty())
    }

    fn is_visible(&self, _handle: WindowHandle) -> bool {
        false
    }

    fn move_resize(&self, handle: WindowHandle, _rect: Rect) -> Result<()> {
        Err(PlatformError::WindowNotFound(handle))
    }

    fn set_title(&self, handle: WindowHandle, _title: &str) -> Result<()> {
        Err(PlatformError::WindowNotFound(handle))
    }
}

impl ProcessControl for NoopDesktop {
    fn spawn(&self, executable: &str) -> Result<ProcessId> {
        Err(PlatformError::NotSupported(format!(
            "spawning {executable} on this platform"
        )))
    }

    fn main_window(&self, _pid: ProcessId) -> Result<Option<WindowHandle>> {
        Ok(None)
    }

    fn owner_of(&self, window: WindowHandle) -> Result<ProcessId> {
        Err(PlatformError::WindowNotFound(window))
    }

    fn request_close(&self, window: WindowHandle) -> Result<()> {
        Err(PlatformError::WindowNotFound(window))
    }

    fn is_running(&self, _pid: ProcessId) -> Result<bool> {
        Ok(false)
    }

    fn terminate(&self, pid: ProcessId) -> Result<()> {
        Err(PlatformError::NotSupported(format!("terminating {pid}")))
    }
}
