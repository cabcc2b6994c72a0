//! In-memory desktop and store doubles that record every call.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use casement_common::{PlatformError, ProcessId, Rect, StoreError, WindowHandle};
use casement_platform::{NativeWindow, ProcessControl, WindowDirectory, WindowSnapshot};

use crate::store::{MemoryStore, PersistedPosition, PositionStore};

type PlatformResult<T> = casement_platform::Result<T>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Spawn,
    SetTitle(WindowHandle, String),
    MoveResize(WindowHandle, Rect),
    RequestClose(WindowHandle),
    Terminate(ProcessId),
}

#[derive(Debug, Clone)]
pub struct FakeWindow {
    pub pid: ProcessId,
    pub class: String,
    pub title: String,
    pub rect: Rect,
    pub visible: bool,
}

#[derive(Default)]
pub struct Behaviour {
    pub fail_enumerate: bool,
    pub spawn_hidden: bool,
    /// Spawned processes keep running but never show a window.
    pub spawn_headless: bool,
    pub deny_close: bool,
    /// Close requests are accepted but the window stays open.
    pub ignore_close: bool,
    pub deny_terminate: bool,
    pub deny_move: bool,
}

#[derive(Default)]
struct State {
    windows: BTreeMap<WindowHandle, FakeWindow>,
    next_id: u64,
    calls: Vec<Call>,
    headless: HashSet<ProcessId>,
}

/// A desktop whose windows live in a map. Processes own exactly one
/// window each and exit when it is closed.
#[derive(Default)]
pub struct FakeDesktop {
    state: Mutex<State>,
    pub behaviour: Mutex<Behaviour>,
}

impl FakeDesktop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put an already running window on the desktop.
    pub fn add_window(&self, class: &str, title: &str, rect: Rect) -> WindowHandle {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let pid = ProcessId(state.next_id as u32);
        let handle = WindowHandle(0x100 + state.next_id);
        state.windows.insert(
            handle,
            FakeWindow {
                pid,
                class: class.into(),
                title: title.into(),
                rect,
                visible: true,
            },
        );
        handle
    }

    /// Simulate the user moving a window.
    pub fn drag(&self, handle: WindowHandle, rect: Rect) {
        if let Some(w) = self.state.lock().unwrap().windows.get_mut(&handle) {
            w.rect = rect;
        }
    }

    pub fn set_visible(&self, handle: WindowHandle, visible: bool) {
        if let Some(w) = self.state.lock().unwrap().windows.get_mut(&handle) {
            w.visible = visible;
        }
    }

    /// Simulate the window going away outside our control.
    pub fn vanish(&self, handle: WindowHandle) {
        self.state.lock().unwrap().windows.remove(&handle);
    }

    pub fn window(&self, handle: WindowHandle) -> Option<FakeWindow> {
        self.state.lock().unwrap().windows.get(&handle).cloned()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn handle_of(&self, pid: ProcessId) -> Option<WindowHandle> {
        let state = self.state.lock().unwrap();
        state
            .windows
            .iter()
            .find(|(_, w)| w.pid == pid)
            .map(|(h, _)| *h)
    }
}

impl WindowDirectory for FakeDesktop {
    fn enumerate(&self, class_filter: &str) -> PlatformResult<WindowSnapshot> {
        if self.behaviour.lock().unwrap().fail_enumerate {
            return Err(PlatformError::WindowManagerError("enumeration failed".into()));
        }
        let state = self.state.lock().unwrap();
        Ok(WindowSnapshot::new(
            state
                .windows
                .iter()
                .filter(|(_, w)| w.class.contains(class_filter))
                .map(|(h, w)| NativeWindow {
                    handle: *h,
                    rect: w.rect,
                    title: w.title.clone(),
                })
                .collect(),
        ))
    }

    fn is_visible(&self, handle: WindowHandle) -> bool {
        self.window(handle).is_some_and(|w| w.visible)
    }

    fn move_resize(&self, handle: WindowHandle, rect: Rect) -> PlatformResult<()> {
        self.record(Call::MoveResize(handle, rect));
        if self.behaviour.lock().unwrap().deny_move {
            return Err(PlatformError::AccessDenied(handle.to_string()));
        }
        let mut state = self.state.lock().unwrap();
        let w = state
            .windows
            .get_mut(&handle)
            .ok_or(PlatformError::WindowNotFound(handle))?;
        w.rect = rect;
        Ok(())
    }

    fn set_title(&self, handle: WindowHandle, title: &str) -> PlatformResult<()> {
        self.record(Call::SetTitle(handle, title.into()));
        let mut state = self.state.lock().unwrap();
        let w = state
            .windows
            .get_mut(&handle)
            .ok_or(PlatformError::WindowNotFound(handle))?;
        w.title = title.into();
        Ok(())
    }
}

impl ProcessControl for FakeDesktop {
    fn spawn(&self, _executable: &str) -> PlatformResult<ProcessId> {
        self.record(Call::Spawn);
        let (visible, headless) = {
            let behaviour = self.behaviour.lock().unwrap();
            (!behaviour.spawn_hidden, behaviour.spawn_headless)
        };
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let pid = ProcessId(state.next_id as u32);
        if headless {
            state.headless.insert(pid);
            return Ok(pid);
        }
        let handle = WindowHandle(0x100 + state.next_id);
        state.windows.insert(
            handle,
            FakeWindow {
                pid,
                class: "Notepad".into(),
                title: "Untitled - Notepad".into(),
                rect: Rect::new(0, 0, 640, 480),
                visible,
            },
        );
        Ok(pid)
    }

    fn main_window(&self, pid: ProcessId) -> PlatformResult<Option<WindowHandle>> {
        Ok(self.handle_of(pid))
    }

    fn owner_of(&self, window: WindowHandle) -> PlatformResult<ProcessId> {
        self.window(window)
            .map(|w| w.pid)
            .ok_or(PlatformError::WindowNotFound(window))
    }

    fn request_close(&self, window: WindowHandle) -> PlatformResult<()> {
        self.record(Call::RequestClose(window));
        if self.behaviour.lock().unwrap().deny_close {
            return Err(PlatformError::AccessDenied(window.to_string()));
        }
        if !self.behaviour.lock().unwrap().ignore_close {
            self.vanish(window);
        }
        Ok(())
    }

    fn is_running(&self, pid: ProcessId) -> PlatformResult<bool> {
        let headless = self.state.lock().unwrap().headless.contains(&pid);
        Ok(headless || self.handle_of(pid).is_some())
    }

    fn terminate(&self, pid: ProcessId) -> PlatformResult<()> {
        self.record(Call::Terminate(pid));
        if self.behaviour.lock().unwrap().deny_terminate {
            return Err(PlatformError::AccessDenied(pid.to_string()));
        }
        self.state.lock().unwrap().headless.remove(&pid);
        if let Some(handle) = self.handle_of(pid) {
            self.vanish(handle);
        }
        Ok(())
    }
}

/// `MemoryStore` that also keeps a log of every save.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    pub saves: Mutex<Vec<(String, Rect)>>,
}

impl RecordingStore {
    pub fn with_records(records: impl IntoIterator<Item = PersistedPosition>) -> Self {
        Self {
            inner: MemoryStore::with_records(records),
            saves: Mutex::new(Vec::new()),
        }
    }

    pub fn saves(&self) -> Vec<(String, Rect)> {
        self.saves.lock().unwrap().clone()
    }
}

#[async_trait]
impl PositionStore for RecordingStore {
    async fn load_all(&self) -> Result<Vec<PersistedPosition>, StoreError> {
        self.inner.load_all().await
    }

    async fn save(&self, window_type: &str, rect: Rect) -> Result<(), StoreError> {
        self.saves
            .lock()
            .unwrap()
            .push((window_type.to_string(), rect));
        self.inner.save(window_type, rect).await
    }
}
