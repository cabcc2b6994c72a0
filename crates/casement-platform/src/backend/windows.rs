//! Win32 backend.
//!
//! Enumeration goes through `EnumWindows` with a collecting callback, so
//! the callback never escapes this module: callers get a `WindowSnapshot`.

use std::ffi::c_void;
use std::process::Command;

use casement_common::{PlatformError, ProcessId, Rect, WindowHandle};
use windows::core::HSTRING;
use windows::Win32::Foundation::{
    CloseHandle, BOOL, E_ACCESSDENIED, E_INVALIDARG, ERROR_INVALID_WINDOW_HANDLE, HANDLE, HWND,
    LPARAM, RECT, STILL_ACTIVE, TRUE, WPARAM,
};
use windows::Win32::System::Threading::{
    GetExitCodeProcess, OpenProcess, TerminateProcess, PROCESS_ACCESS_RIGHTS,
    PROCESS_QUERY_LIMITED_INFORMATION, PROCESS_TERMINATE,
};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetClassNameW, GetWindowRect, GetWindowTextW, GetWindowThreadProcessId,
    IsWindowVisible, PostMessageW, SetWindowPos, SetWindowTextW, SWP_NOACTIVATE, SWP_NOZORDER,
    WM_CLOSE,
};

use crate::directory::{NativeWindow, WindowDirectory, WindowSnapshot};
use crate::process::ProcessControl;
use crate::Result;

/// Exit code reported for processes we terminate.
const TERMINATED_EXIT_CODE: u32 = 1;

pub struct Win32Desktop;

fn to_hwnd(handle: WindowHandle) -> HWND {
    HWND(handle.0 as usize as *mut c_void)
}

fn from_hwnd(hwnd: HWND) -> WindowHandle {
    WindowHandle(hwnd.0 as usize as u64)
}

fn map_window_error(handle: WindowHandle, context: &str, e: windows::core::Error) -> PlatformError {
    if e.code() == ERROR_INVALID_WINDOW_HANDLE.to_hresult() {
        PlatformError::WindowNotFound(handle)
    } else if e.code() == E_ACCESSDENIED {
        PlatformError::AccessDenied(format!("{context} on window {handle}"))
    } else {
        PlatformError::WindowManagerError(format!("{context} on window {handle}: {e}"))
    }
}

unsafe extern "system" fn collect_hwnd(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam is the `&mut Vec<HWND>` passed by `top_level_windows`,
    // which outlives the synchronous EnumWindows call.
    let handles = &mut *(lparam.0 as *mut Vec<HWND>);
    handles.push(hwnd);
    TRUE
}

fn top_level_windows() -> Result<Vec<HWND>> {
    let mut handles: Vec<HWND> = Vec::new();
    unsafe { EnumWindows(Some(collect_hwnd), LPARAM(&mut handles as *mut Vec<HWND> as isize)) }
        .map_err(|e| PlatformError::WindowManagerError(format!("EnumWindows failed: {e}")))?;
    Ok(handles)
}

fn class_name(hwnd: HWND) -> String {
    let mut buf = [0u16; 256];
    let len = unsafe { GetClassNameW(hwnd, &mut buf) };
    String::from_utf16_lossy(&buf[..len.max(0) as usize])
}

fn window_text(hwnd: HWND) -> String {
    let mut buf = [0u16; 512];
    let len = unsafe { GetWindowTextW(hwnd, &mut buf) };
    String::from_utf16_lossy(&buf[..len.max(0) as usize])
}

fn window_rect(hwnd: HWND) -> Result<Rect> {
    let mut rc = RECT::default();
    unsafe { GetWindowRect(hwnd, &mut rc) }
        .map_err(|e| map_window_error(from_hwnd(hwnd), "GetWindowRect", e))?;
    Ok(Rect::new(rc.left, rc.top, rc.right, rc.bottom))
}

fn window_pid(hwnd: HWND) -> Option<u32> {
    let mut pid = 0u32;
    let thread = unsafe { GetWindowThreadProcessId(hwnd, Some(&mut pid)) };
    (thread != 0).then_some(pid)
}

/// Process handle closed on drop.
struct OwnedProcess(HANDLE);

impl OwnedProcess {
    fn open(pid: ProcessId, access: PROCESS_ACCESS_RIGHTS) -> windows::core::Result<Self> {
        unsafe { OpenProcess(access, false, pid.0) }.map(Self)
    }
}

impl Drop for OwnedProcess {
    fn drop(&mut self) {
        let _ = unsafe { CloseHandle(self.0) };
    }
}

impl WindowDirectory for Win32Desktop {
    fn enumerate(&self, class_filter: &str) -> Result<WindowSnapshot> {
        let mut windows = Vec::new();
        for hwnd in top_level_windows()? {
            if !class_name(hwnd).contains(class_filter) {
                continue;
            }
            match window_rect(hwnd) {
                Ok(rect) => windows.push(NativeWindow {
                    handle: from_hwnd(hwnd),
                    rect,
                    title: window_text(hwnd),
                }),
                Err(e) => {
                    tracing::debug!(handle = %from_hwnd(hwnd), error = %e, "Skipping window");
                }
            }
        }
        Ok(WindowSnapshot::new(windows))
    }

    fn is_visible(&self, handle: WindowHandle) -> bool {
        unsafe { IsWindowVisible(to_hwnd(handle)) }.as_bool()
    }

    fn move_resize(&self, handle: WindowHandle, rect: Rect) -> Result<()> {
        unsafe {
            SetWindowPos(
                to_hwnd(handle),
                None,
                rect.left,
                rect.top,
                rect.width(),
                rect.height(),
                SWP_NOZORDER | SWP_NOACTIVATE,
            )
        }
        .map_err(|e| map_window_error(handle, "SetWindowPos", e))
    }

    fn set_title(&self, handle: WindowHandle, title: &str) -> Result<()> {
        unsafe { SetWindowTextW(to_hwnd(handle), &HSTRING::from(title)) }
            .map_err(|e| map_window_error(handle, "SetWindowText", e))
    }
}

impl ProcessControl for Win32Desktop {
    fn spawn(&self, executable: &str) -> Result<ProcessId> {
        let child = Command::new(executable)
            .spawn()
            .map_err(|e| PlatformError::SpawnFailed(format!("{executable}: {e}")))?;
        Ok(ProcessId(child.id()))
    }

    fn main_window(&self, pid: ProcessId) -> Result<Option<WindowHandle>> {
        let found = top_level_windows()?.into_iter().find(|&hwnd| {
            window_pid(hwnd) == Some(pid.0) && unsafe { IsWindowVisible(hwnd) }.as_bool()
        });
        Ok(found.map(from_hwnd))
    }

    fn owner_of(&self, window: WindowHandle) -> Result<ProcessId> {
        window_pid(to_hwnd(window))
            .map(ProcessId)
            .ok_or(PlatformError::WindowNotFound(window))
    }

    fn request_close(&self, window: WindowHandle) -> Result<()> {
        unsafe { PostMessageW(Some(to_hwnd(window)), WM_CLOSE, WPARAM(0), LPARAM(0)) }
            .map_err(|e| map_window_error(window, "PostMessage(WM_CLOSE)", e))
    }

    fn is_running(&self, pid: ProcessId) -> Result<bool> {
        let process = match OwnedProcess::open(pid, PROCESS_QUERY_LIMITED_INFORMATION) {
            Ok(p) => p,
            // OpenProcess rejects pids that no longer exist.
            Err(e) if e.code() == E_INVALIDARG => return Ok(false),
            Err(e) if e.code() == E_ACCESSDENIED => {
                return Err(PlatformError::AccessDenied(format!("query {pid}")))
            }
            Err(e) => {
                return Err(PlatformError::WindowManagerError(format!(
                    "OpenProcess({pid}) failed: {e}"
                )))
            }
        };

        let mut code = 0u32;
        unsafe { GetExitCodeProcess(process.0, &mut code) }.map_err(|e| {
            PlatformError::WindowManagerError(format!("GetExitCodeProcess({pid}) failed: {e}"))
        })?;
        Ok(code == STILL_ACTIVE.0 as u32)
    }

    fn terminate(&self, pid: ProcessId) -> Result<()> {
        let process = OwnedProcess::open(pid, PROCESS_TERMINATE).map_err(|e| {
            if e.code() == E_ACCESSDENIED {
                PlatformError::AccessDenied(format!("terminate {pid}"))
            } else {
                PlatformError::WindowManagerError(format!("OpenProcess({pid}) failed: {e}"))
            }
        })?;
        unsafe { TerminateProcess(process.0, TERMINATED_EXIT_CODE) }.map_err(|e| {
            if e.code() == E_ACCESSDENIED {
                PlatformError::AccessDenied(format!("terminate {pid}"))
            } else {
                PlatformError::WindowManagerError(format!("TerminateProcess({pid}) failed: {e}"))
            }
        })
    }
}
