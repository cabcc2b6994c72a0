use casement_common::{Rect, WindowHandle};

use crate::Result;

/// One top-level window as seen during an enumeration pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeWindow {
    pub handle: WindowHandle,
    pub rect: Rect,
    pub title: String,
}

/// A point-in-time list of windows, consumed once.
///
/// Built eagerly by the backend during `enumerate`, so iterating it never
/// calls back into the OS.
#[derive(Debug)]
pub struct WindowSnapshot {
    inner: std::vec::IntoIter<NativeWindow>,
}

impl WindowSnapshot {
    pub fn new(windows: Vec<NativeWindow>) -> Self {
        Self {
            inner: windows.into_iter(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl Iterator for WindowSnapshot {
    type Item = NativeWindow;

    fn next(&mut self) -> Option<NativeWindow> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for WindowSnapshot {}

/// Query/command surface over OS top-level windows. Stateless: every call
/// goes to the OS.
pub trait WindowDirectory: Send + Sync {
    /// Windows whose class name contains `class_filter`.
    fn enumerate(&self, class_filter: &str) -> Result<WindowSnapshot>;

    fn is_visible(&self, handle: WindowHandle) -> bool;

    fn move_resize(&self, handle: WindowHandle, rect: Rect) -> Result<()>;

    fn set_title(&self, handle: WindowHandle, title: &str) -> Result<()>;

    /// Handles of class-matching windows whose title contains `needle`.
    fn find_by_title_substring(
        &self,
        class_filter: &str,
        needle: &str,
    ) -> Result<Vec<(WindowHandle, String)>> {
        Ok(self
            .enumerate(class_filter)?
            .filter(|w| w.title.contains(needle))
            .map(|w| (w.handle, w.title))
            .collect())
    }
}
