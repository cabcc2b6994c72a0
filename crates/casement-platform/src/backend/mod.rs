//! Platform backends for `WindowDirectory` and `ProcessControl`.

use std::sync::Arc;

use crate::directory::WindowDirectory;
use crate::process::ProcessControl;

pub mod noop;
#[cfg(windows)]
pub mod windows;

/// Create the platform-appropriate window directory.
///
/// On Windows: a Win32 implementation. Elsewhere: a no-op directory that
/// never sees any window.
pub fn create_window_directory() -> Arc<dyn WindowDirectory> {
    #[cfg(windows)]
    {
        Arc::new(windows::Win32Desktop)
    }
    #[cfg(not(windows))]
    {
        Arc::new(noop::NoopDesktop)
    }
}

/// Create the platform-appropriate process control.
pub fn create_process_control() -> Arc<dyn ProcessControl> {
    #[cfg(windows)]
    {
        Arc::new(windows::Win32Desktop)
    }
    #[cfg(not(windows))]
    {
        Arc::new(noop::NoopDesktop)
    }
}
