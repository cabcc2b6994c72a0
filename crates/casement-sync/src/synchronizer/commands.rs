//! Client-initiated operations: open, move/resize, close.

use casement_common::{PlatformError, ProcessId, Rect};
use casement_platform::CloseOutcome;

use super::Synchronizer;
use crate::tracked::TrackedWindow;

impl Synchronizer {
    /// Bring the number of managed instances up to `max_instances`.
    ///
    /// Already at the maximum: nothing is spawned and the current state is
    /// re-broadcast. Otherwise each free slot gets one new instance, titled
    /// and placed for that slot. Returns how many instances were opened.
    ///
    /// The tracked map is not locked while instances start up, so polling
    /// and other clients carry on meanwhile.
    pub async fn open_instances(&self) -> usize {
        let _gate = self.open_gate.lock().await;
        let max = self.settings.max_instances;

        let open = match self
            .directory
            .find_by_title_substring(&self.settings.class_filter, &self.settings.title_prefix)
        {
            Ok(open) => open,
            Err(e) => {
                tracing::warn!(error = %e, "Could not count open instances");
                return 0;
            }
        };

        if open.len() >= max {
            tracing::info!(open = open.len(), max, "Instance limit reached, re-broadcasting state");
            self.publish_state(&*self.tracked.lock().await);
            return 0;
        }

        let free: Vec<usize> = (0..max)
            .filter(|&slot| {
                let title = self.settings.slot_title(slot);
                !open.iter().any(|(_, t)| *t == title)
            })
            .take(max - open.len())
            .collect();

        let persisted = match self.store.load_all().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "Could not load persisted positions, using defaults");
                Vec::new()
            }
        };

        let mut spawned = Vec::new();
        for slot in free {
            let rect = persisted
                .get(slot)
                .map(|p| p.rect)
                .or_else(|| self.settings.default_slots.get(slot).copied())
                .unwrap_or_default();

            match self.spawn_slot(slot, rect).await {
                Ok(window) => {
                    tracing::info!(slot, handle = %window.handle, %rect, "Opened managed instance");
                    spawned.push(window);
                }
                Err(e) => tracing::warn!(slot, error = %e, "Failed to open managed instance"),
            }
        }

        let opened = spawned.len();
        let mut tracked = self.tracked.lock().await;
        for window in spawned {
            tracked.insert(window);
        }
        self.publish_state(&tracked);
        opened
    }

    /// Start one instance and make it the window for `slot`. Any instance
    /// that cannot be fully set up is terminated.
    async fn spawn_slot(&self, slot: usize, rect: Rect) -> Result<TrackedWindow, PlatformError> {
        let pid = self.lifecycle.spawn(&self.settings.executable)?;

        let handle = match self.lifecycle.await_main_window(pid).await {
            Ok(handle) => handle,
            Err(e) => {
                self.discard(pid);
                return Err(e);
            }
        };

        let title = self.settings.slot_title(slot);
        if let Err(e) = self.directory.set_title(handle, &title) {
            tracing::warn!(%handle, error = %e, "Could not retitle new instance");
        }

        if !self.directory.is_visible(handle) {
            self.discard(pid);
            return Err(PlatformError::WindowManagerError(format!(
                "window {handle} of {pid} is not visible"
            )));
        }

        if let Err(e) = self.directory.move_resize(handle, rect) {
            self.discard(pid);
            return Err(e);
        }

        Ok(TrackedWindow {
            handle,
            rect,
            logical_type: title,
        })
    }

    fn discard(&self, pid: ProcessId) {
        if let Err(e) = self.lifecycle.terminate(pid) {
            tracing::warn!(%pid, error = %e, "Could not terminate unusable instance");
        }
    }

    /// Move/resize the tracked window with this logical type. Unknown
    /// types are ignored. Returns whether the native window was moved.
    pub async fn move_window(&self, window_type: &str, rect: Rect) -> bool {
        let mut tracked = self.tracked.lock().await;
        let Some(handle) = tracked.find_by_type(window_type).map(|w| w.handle) else {
            tracing::warn!(window_type, "Move for untracked window ignored");
            return false;
        };

        if let Err(e) = self.directory.move_resize(handle, rect) {
            tracing::warn!(window_type, %handle, error = %e, "Move/resize failed");
            return false;
        }

        tracked.set_rect(handle, rect);
        self.persist(window_type, rect).await;
        if let Some(window) = tracked.get(handle) {
            self.publish_upsert(window);
        }
        tracing::debug!(window_type, %handle, %rect, "Window moved");
        true
    }

    /// Close the tracked window with this logical type and its process.
    ///
    /// The window stays tracked if neither the graceful nor the forced
    /// path succeeds; the next poll tick settles it. If a poll tick
    /// already removed the window while it was closing, no second closed
    /// event is sent.
    pub async fn close_window(&self, window_type: &str) -> bool {
        let handle = {
            let tracked = self.tracked.lock().await;
            match tracked.find_by_type(window_type) {
                Some(window) => window.handle,
                None => {
                    tracing::warn!(window_type, "Close for untracked window ignored");
                    return false;
                }
            }
        };

        match self.lifecycle.close(handle).await {
            Ok(outcome) => {
                if outcome == CloseOutcome::Forced {
                    tracing::info!(window_type, %handle, "Window closed by termination");
                }
                if let Some(window) = self.tracked.lock().await.remove(handle) {
                    self.publish_closed(&window);
                }
                true
            }
            Err(e) => {
                tracing::warn!(window_type, %handle, error = %e, "Close failed, window still tracked");
                false
            }
        }
    }
}
