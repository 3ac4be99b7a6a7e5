use super::r#trait::{WindowIter, WindowSource};
use crate::error::{Result, ToastError};
use crate::events::{WindowDescriptor, WindowHandle, WindowRect};
use crate::trace_if_enabled;
use std::ffi::c_void;
use tracing::info;
use windows::core::PCWSTR;
use windows::Win32::Foundation::{BOOL, HWND, LPARAM, RECT, TRUE};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, FindWindowW, GetClassNameW, GetSystemMetrics, GetWindowRect, GetWindowTextW,
    IsWindow, IsWindowVisible, SetWindowPos, SM_CXSCREEN, SWP_NOSIZE, SWP_NOZORDER,
    SWP_SHOWWINDOW,
};

// Заголовки и имена классов длиннее 255 символов обрезаются
const TEXT_CAPACITY: usize = 256;

pub struct Win32Source;

fn to_hwnd(handle: WindowHandle) -> HWND {
    HWND(handle.value() as *mut c_void)
}

fn from_hwnd(hwnd: HWND) -> WindowHandle {
    WindowHandle::new(hwnd.0 as isize)
}

/// Callback for EnumWindows: collects every top-level handle, never stops early.
unsafe extern "system" fn collect_handles(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let handles = &mut *(lparam.0 as *mut Vec<WindowHandle>);
    handles.push(from_hwnd(hwnd));
    TRUE
}

fn window_text(hwnd: HWND) -> String {
    let mut buf = [0u16; TEXT_CAPACITY];
    let len = unsafe { GetWindowTextW(hwnd, &mut buf) };
    String::from_utf16_lossy(&buf[..len.max(0) as usize])
}

fn class_name(hwnd: HWND) -> String {
    let mut buf = [0u16; TEXT_CAPACITY];
    let len = unsafe { GetClassNameW(hwnd, &mut buf) };
    String::from_utf16_lossy(&buf[..len.max(0) as usize])
}

impl Default for Win32Source {
    fn default() -> Self {
        Self::new()
    }
}

impl Win32Source {
    pub fn new() -> Self {
        info!("Инициализация Win32Source");
        Self
    }

    /// Недействительный дескриптор отличаем от прочих отказов API
    fn api_failure(handle: WindowHandle, call: &'static str, err: windows::core::Error) -> ToastError {
        if unsafe { IsWindow(to_hwnd(handle)) }.as_bool() {
            crate::toast_error!(api, call, "{}", err)
        } else {
            ToastError::StaleHandle(handle)
        }
    }

    /// Свойства окна запрашиваются лениво, по мере продвижения классификатора
    fn describe(&self, handle: WindowHandle) -> Option<WindowDescriptor> {
        let hwnd = to_hwnd(handle);
        if !unsafe { IsWindowVisible(hwnd) }.as_bool() {
            return Some(WindowDescriptor::hidden(handle));
        }

        let rect = match self.window_rect(handle) {
            Ok(rect) => rect,
            Err(e) => {
                trace_if_enabled!("Окно {} пропущено при перечислении: {}", handle, e);
                return None;
            }
        };

        Some(WindowDescriptor::new(handle, window_text(hwnd), rect).with_class(class_name(hwnd)))
    }
}

impl WindowSource for Win32Source {
    fn windows(&self) -> Result<WindowIter<'_>> {
        let mut handles: Vec<WindowHandle> = Vec::new();
        unsafe { EnumWindows(Some(collect_handles), LPARAM(&mut handles as *mut Vec<WindowHandle> as isize)) }
            .map_err(|e| crate::toast_error!(api, "EnumWindows", "{}", e))?;

        Ok(Box::new(handles.into_iter().filter_map(move |handle| self.describe(handle))))
    }

    fn find_by_title(&self, title: &str) -> Result<Option<WindowHandle>> {
        let wide: Vec<u16> = title.encode_utf16().chain(std::iter::once(0)).collect();
        // FindWindowW сообщает «не найдено» тем же способом, что и ошибку
        let found = unsafe { FindWindowW(PCWSTR::null(), PCWSTR(wide.as_ptr())) };
        Ok(found.ok().filter(|hwnd| !hwnd.is_invalid()).map(from_hwnd))
    }

    fn window_rect(&self, handle: WindowHandle) -> Result<WindowRect> {
        let mut rect = RECT::default();
        unsafe { GetWindowRect(to_hwnd(handle), &mut rect) }
            .map_err(|e| Self::api_failure(handle, "GetWindowRect", e))?;
        Ok(WindowRect::new(rect.left, rect.top, rect.right, rect.bottom))
    }

    fn move_window(&self, handle: WindowHandle, x: i32, y: i32) -> Result<()> {
        unsafe {
            SetWindowPos(
                to_hwnd(handle),
                HWND::default(),
                x,
                y,
                0,
                0,
                SWP_NOSIZE | SWP_NOZORDER | SWP_SHOWWINDOW,
            )
        }
        .map_err(|e| Self::api_failure(handle, "SetWindowPos", e))
    }

    fn is_visible(&self, handle: WindowHandle) -> bool {
        unsafe { IsWindowVisible(to_hwnd(handle)) }.as_bool()
    }

    fn primary_screen_width(&self) -> Result<i32> {
        let width = unsafe { GetSystemMetrics(SM_CXSCREEN) };
        if width <= 0 {
            return Err(crate::toast_error!(api, "GetSystemMetrics", "ширина экрана {}", width));
        }
        Ok(width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_conversion_roundtrip() {
        let handle = WindowHandle::new(0x2_0456);
        assert_eq!(from_hwnd(to_hwnd(handle)), handle);
    }

    #[test]
    fn test_stale_handle_is_not_visible() {
        let source = Win32Source::new();
        let bogus = WindowHandle::new(0x7FFF_FFF0);
        assert!(!source.is_visible(bogus));
        assert!(source.window_rect(bogus).is_err());
    }
}
