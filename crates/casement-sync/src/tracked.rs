//! The engine's record of managed windows, keyed by native handle.

use std::collections::{HashMap, HashSet};

use casement_common::{Rect, WindowHandle};
use casement_platform::NativeWindow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedWindow {
    pub handle: WindowHandle,
    pub rect: Rect,
    /// Title-derived identity shared with clients and the position store.
    pub logical_type: String,
}

/// Outcome of reconciling one window against native state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Upserted(TrackedWindow),
    Closed(TrackedWindow),
}

#[derive(Debug, Default)]
pub struct TrackedWindows {
    windows: HashMap<WindowHandle, TrackedWindow>,
}

impl TrackedWindows {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn get(&self, handle: WindowHandle) -> Option<&TrackedWindow> {
        self.windows.get(&handle)
    }

    pub fn insert(&mut self, window: TrackedWindow) -> Option<TrackedWindow> {
        self.windows.insert(window.handle, window)
    }

    pub fn remove(&mut self, handle: WindowHandle) -> Option<TrackedWindow> {
        self.windows.remove(&handle)
    }

    pub fn set_rect(&mut self, handle: WindowHandle, rect: Rect) -> bool {
        match self.windows.get_mut(&handle) {
            Some(window) => {
                window.rect = rect;
                true
            }
            None => false,
        }
    }

    /// First tracked window whose logical type equals `logical_type`,
    /// lowest handle first when several share a title.
    pub fn find_by_type(&self, logical_type: &str) -> Option<&TrackedWindow> {
        self.windows
            .values()
            .filter(|w| w.logical_type == logical_type)
            .min_by_key(|w| w.handle)
    }

    /// All tracked windows ordered by logical type, then handle.
    pub fn snapshot(&self) -> Vec<TrackedWindow> {
        let mut all: Vec<_> = self.windows.values().cloned().collect();
        all.sort_by(|a, b| {
            a.logical_type
                .cmp(&b.logical_type)
                .then(a.handle.cmp(&b.handle))
        });
        all
    }

    /// Diff one poll pass of visible windows against the map and apply it.
    ///
    /// New or moved windows yield `Upserted`; a window whose title changed
    /// yields `Closed` for the old identity then `Upserted` for the new
    /// one; tracked windows absent from `visible` are removed and yield
    /// `Closed`. Unchanged windows yield nothing.
    pub fn reconcile(&mut self, visible: impl IntoIterator<Item = NativeWindow>) -> Vec<Change> {
        let mut changes = Vec::new();
        let mut seen = HashSet::new();

        for native in visible {
            seen.insert(native.handle);
            match self.windows.get_mut(&native.handle) {
                Some(tracked) => {
                    let retitled =
                        !native.title.is_empty() && native.title != tracked.logical_type;
                    if retitled {
                        changes.push(Change::Closed(tracked.clone()));
                        tracked.logical_type = native.title;
                        tracked.rect = native.rect;
                        changes.push(Change::Upserted(tracked.clone()));
                    } else if tracked.rect != native.rect {
                        tracked.rect = native.rect;
                        changes.push(Change::Upserted(tracked.clone()));
                    }
                }
                None => {
                    let window = TrackedWindow {
                        handle: native.handle,
                        rect: native.rect,
                        logical_type: native.title,
                    };
                    self.windows.insert(window.handle, window.clone());
                    changes.push(Change::Upserted(window));
                }
            }
        }

        let gone: Vec<WindowHandle> = self
            .windows
            .keys()
            .filter(|h| !seen.contains(h))
            .copied()
            .collect();
        for handle in gone {
            if let Some(window) = self.windows.remove(&handle) {
                changes.push(Change::Closed(window));
            }
        }

        changes
    }
}
