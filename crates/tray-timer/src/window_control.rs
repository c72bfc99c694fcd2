//! Resolves and minimizes the window under the pointer.

use tray_timer_core::WindowControl;

/// The platform's [`WindowControl`].
pub(crate) fn platform_window_control() -> Box<dyn WindowControl> {
    #[cfg(target_os = "windows")]
    {
        Box::new(win32::Win32WindowControl)
    }
    #[cfg(not(target_os = "windows"))]
    {
        Box::new(unsupported::UnsupportedWindowControl)
    }
}

#[cfg(target_os = "windows")]
mod win32 {
    use std::{ffi::c_void, panic::Location, path::Path};

    use error_location::ErrorLocation;
    use tracing::debug;
    use tray_timer_core::{CoreResult, ReminderError, ScreenPoint, TargetWindow, WindowControl};
    use windows::{
        Win32::{
            Foundation::{CloseHandle, HWND, POINT},
            System::Threading::{
                OpenProcess, PROCESS_NAME_WIN32, PROCESS_QUERY_LIMITED_INFORMATION,
                QueryFullProcessImageNameW,
            },
            UI::WindowsAndMessaging::{
                GA_ROOT, GetAncestor, GetWindowThreadProcessId, IsWindowVisible, SW_MINIMIZE,
                ShowWindow, WindowFromPoint,
            },
        },
        core::PWSTR,
    };

    const MAX_IMAGE_PATH: usize = 1024;

    /// Win32 window resolution via `WindowFromPoint` and the owning
    /// process image name.
    pub(super) struct Win32WindowControl;

    impl WindowControl for Win32WindowControl {
        #[track_caller]
        fn window_at(&self, point: ScreenPoint) -> CoreResult<TargetWindow> {
            let hwnd = unsafe { WindowFromPoint(POINT { x: point.x, y: point.y }) };
            if hwnd.is_invalid() {
                return Err(failure("no window under the pointer"));
            }

            let root = unsafe { GetAncestor(hwnd, GA_ROOT) };
            let root = if root.is_invalid() { hwnd } else { root };

            let mut pid = 0u32;
            unsafe { GetWindowThreadProcessId(root, Some(&mut pid)) };
            if pid == 0 {
                return Err(failure("window has no owning process"));
            }

            let process_name = process_name(pid)?;
            let visible = unsafe { IsWindowVisible(root) }.as_bool();

            debug!(pid, process = %process_name, visible, "Resolved window under pointer");

            Ok(TargetWindow {
                process_name,
                visible,
                raw_handle: root.0 as isize,
            })
        }

        fn minimize(&self, window: &TargetWindow) -> CoreResult<()> {
            let hwnd = HWND(window.raw_handle as *mut c_void);
            // Returns the previous visibility, not success.
            let _ = unsafe { ShowWindow(hwnd, SW_MINIMIZE) };
            Ok(())
        }
    }

    #[track_caller]
    fn process_name(pid: u32) -> CoreResult<String> {
        let process = unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) }
            .map_err(|e| failure(&format!("cannot open process {}: {}", pid, e)))?;

        let mut buffer = [0u16; MAX_IMAGE_PATH];
        let mut len = buffer.len() as u32;
        let queried = unsafe {
            QueryFullProcessImageNameW(
                process,
                PROCESS_NAME_WIN32,
                PWSTR(buffer.as_mut_ptr()),
                &mut len,
            )
        };
        let _ = unsafe { CloseHandle(process) };
        queried.map_err(|e| failure(&format!("cannot query process {}: {}", pid, e)))?;

        let image = String::from_utf16_lossy(&buffer[..len as usize]);
        Path::new(&image)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| failure("process image has no file name"))
    }

    #[track_caller]
    fn failure(reason: &str) -> ReminderError {
        ReminderError::WindowResolutionFailure {
            reason: reason.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

#[cfg(not(target_os = "windows"))]
mod unsupported {
    use std::panic::Location;

    use error_location::ErrorLocation;
    use tray_timer_core::{CoreResult, ReminderError, ScreenPoint, TargetWindow, WindowControl};

    /// Window control on platforms without a supported API.
    pub(super) struct UnsupportedWindowControl;

    impl WindowControl for UnsupportedWindowControl {
        #[track_caller]
        fn window_at(&self, _point: ScreenPoint) -> CoreResult<TargetWindow> {
            Err(ReminderError::WindowResolutionFailure {
                reason: "minimizing other windows is only supported on Windows".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
        }

        #[track_caller]
        fn minimize(&self, window: &TargetWindow) -> CoreResult<()> {
            Err(ReminderError::WindowResolutionFailure {
                reason: format!("cannot minimize {} on this platform", window.process_name),
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }
}
