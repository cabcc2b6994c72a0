//! Spawn, await, and close managed application instances.

use std::sync::Arc;
use std::time::Duration;

use casement_common::{PlatformError, ProcessId, WindowHandle};
use tokio::time::Instant;

use super::ProcessControl;
use crate::Result;

const INITIAL_BACKOFF: Duration = Duration::from_millis(10);
const MAX_BACKOFF: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy)]
pub struct LifecycleSettings {
    pub spawn_timeout: Duration,
    pub close_grace: Duration,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self {
            spawn_timeout: Duration::from_secs(10),
            close_grace: Duration::from_secs(5),
        }
    }
}

/// How a close request was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Graceful,
    Forced,
}

pub struct ProcessLifecycle {
    control: Arc<dyn ProcessControl>,
    settings: LifecycleSettings,
}

impl ProcessLifecycle {
    pub fn new(control: Arc<dyn ProcessControl>, settings: LifecycleSettings) -> Self {
        Self { control, settings }
    }

    pub fn spawn(&self, executable: &str) -> Result<ProcessId> {
        let pid = self.control.spawn(executable)?;
        tracing::debug!(%pid, executable, "Spawned managed process");
        Ok(pid)
    }

    /// Poll until `pid` exposes a visible top-level window, backing off
    /// between attempts, for at most `spawn_timeout`.
    pub async fn await_main_window(&self, pid: ProcessId) -> Result<WindowHandle> {
        let deadline = Instant::now() + self.settings.spawn_timeout;
        let mut backoff = INITIAL_BACKOFF;

        loop {
            if let Some(handle) = self.control.main_window(pid)? {
                tracing::debug!(%pid, %handle, "Main window materialized");
                return Ok(handle);
            }
            if !self.control.is_running(pid)? {
                return Err(PlatformError::SpawnFailed(format!(
                    "{pid} exited before showing a window"
                )));
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(PlatformError::Timeout(format!("main window of {pid}")));
            }
            tokio::time::sleep(backoff.min(deadline - now)).await;
            backoff = (backoff * 2).min(MAX_BACKOFF);
        }
    }

    /// Forceful termination, for instances that never became usable.
    pub fn terminate(&self, pid: ProcessId) -> Result<()> {
        self.control.terminate(pid)
    }

    /// Wait up to `timeout` for `pid` to exit. Returns whether it did.
    pub async fn wait_for_exit(&self, pid: ProcessId, timeout: Duration) -> Result<bool> {
        let deadline = Instant::now() + timeout;
        let mut backoff = INITIAL_BACKOFF;

        loop {
            if !self.control.is_running(pid)? {
                return Ok(true);
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(backoff.min(deadline - now)).await;
            backoff = (backoff * 2).min(MAX_BACKOFF);
        }
    }

    /// Close the process owning `window`.
    ///
    /// A close request is posted first and the process is given
    /// `close_grace` to exit. Only if that path fails (request denied,
    /// wait failed, or grace period elapsed) is the process terminated,
    /// and termination is attempted exactly once.
    pub async fn close(&self, window: WindowHandle) -> Result<CloseOutcome> {
        let pid = self.control.owner_of(window)?;

        match self.close_gracefully(window, pid).await {
            Ok(()) => {
                tracing::info!(%window, %pid, "Process exited after close request");
                Ok(CloseOutcome::Graceful)
            }
            Err(e) => {
                tracing::warn!(%window, %pid, error = %e, "Graceful close failed, terminating");
                self.control.terminate(pid)?;
                tracing::info!(%window, %pid, "Process terminated");
                Ok(CloseOutcome::Forced)
            }
        }
    }

    async fn close_gracefully(&self, window: WindowHandle, pid: ProcessId) -> Result<()> {
        self.control.request_close(window)?;
        if self.wait_for_exit(pid, self.settings.close_grace).await? {
            Ok(())
        } else {
            Err(PlatformError::Timeout(format!(
                "{pid} still running after close request"
            )))
        }
    }
}
