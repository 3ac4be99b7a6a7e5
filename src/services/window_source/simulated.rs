use super::r#trait::{WindowIter, WindowSource};
use crate::error::{Result, ToastError};
use crate::events::{WindowDescriptor, WindowHandle, WindowRect};
use parking_lot::Mutex;

/// In-memory desktop: a list of windows in enumeration order plus screen width.
///
/// Backs the dry-run mode and the unit tests of the monitor components.
pub struct SimulatedDesktop {
    state: Mutex<DesktopState>,
}

struct DesktopState {
    screen_width: i32,
    next_handle: isize,
    windows: Vec<WindowDescriptor>,
    faults: Faults,
    calls: CallCounters,
}

#[derive(Default)]
struct Faults {
    fail_next_enumeration: bool,
    fail_next_screen_query: bool,
    reject_moves: bool,
    close_after_move: bool,
}

/// Сколько раз вызывался каждый метод источника
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounters {
    pub enumerations: usize,
    pub title_lookups: usize,
    pub moves: usize,
}

impl SimulatedDesktop {
    pub fn new(screen_width: i32) -> Self {
        Self {
            state: Mutex::new(DesktopState {
                screen_width,
                next_handle: 0x10010,
                windows: Vec::new(),
                faults: Faults::default(),
                calls: CallCounters::default(),
            }),
        }
    }

    /// Открыть новое видимое окно в конце порядка перечисления
    pub fn open(&self, title: &str, class_name: &str, rect: WindowRect) -> WindowHandle {
        let mut state = self.state.lock();
        let handle = WindowHandle::new(state.next_handle);
        state.next_handle += 0x10;
        state.windows.push(
            WindowDescriptor::new(handle, title.to_string(), rect).with_class(class_name.to_string()),
        );
        handle
    }

    /// Закрыть окно: дескриптор становится недействительным
    pub fn close(&self, handle: WindowHandle) {
        self.state.lock().windows.retain(|w| w.handle != handle);
    }

    #[cfg(test)]
    pub fn set_visible(&self, handle: WindowHandle, visible: bool) {
        let mut state = self.state.lock();
        if let Some(window) = state.windows.iter_mut().find(|w| w.handle == handle) {
            window.visible = visible;
        }
    }

    /// Перемещение окна «пользователем» в обход монитора
    #[cfg(test)]
    pub fn set_rect(&self, handle: WindowHandle, rect: WindowRect) {
        let mut state = self.state.lock();
        if let Some(window) = state.windows.iter_mut().find(|w| w.handle == handle) {
            window.rect = rect;
        }
    }

    pub fn rect_of(&self, handle: WindowHandle) -> Option<WindowRect> {
        let state = self.state.lock();
        state.windows.iter().find(|w| w.handle == handle).map(|w| w.rect)
    }

    #[cfg(test)]
    pub fn calls(&self) -> CallCounters {
        self.state.lock().calls
    }

    #[cfg(test)]
    pub fn fail_next_enumeration(&self) {
        self.state.lock().faults.fail_next_enumeration = true;
    }

    #[cfg(test)]
    pub fn fail_next_screen_query(&self) {
        self.state.lock().faults.fail_next_screen_query = true;
    }

    /// Окно уничтожается сразу после успешного перемещения
    #[cfg(test)]
    pub fn close_after_move(&self, close: bool) {
        self.state.lock().faults.close_after_move = close;
    }

    #[cfg(test)]
    pub fn reject_moves(&self, reject: bool) {
        self.state.lock().faults.reject_moves = reject;
    }
}

impl WindowSource for SimulatedDesktop {
    fn windows(&self) -> Result<WindowIter<'_>> {
        let mut state = self.state.lock();
        state.calls.enumerations += 1;
        if std::mem::take(&mut state.faults.fail_next_enumeration) {
            return Err(crate::toast_error!(api, "EnumWindows", "симулированный сбой перечисления"));
        }

        // Снимок на момент вызова, как и у EnumWindows
        let snapshot: Vec<WindowDescriptor> = state
            .windows
            .iter()
            .map(|w| {
                if w.visible {
                    w.clone()
                } else {
                    WindowDescriptor::hidden(w.handle)
                }
            })
            .collect();
        Ok(Box::new(snapshot.into_iter()))
    }

    fn find_by_title(&self, title: &str) -> Result<Option<WindowHandle>> {
        let mut state = self.state.lock();
        state.calls.title_lookups += 1;
        Ok(state.windows.iter().find(|w| w.title == title).map(|w| w.handle))
    }

    fn window_rect(&self, handle: WindowHandle) -> Result<WindowRect> {
        self.rect_of(handle).ok_or(ToastError::StaleHandle(handle))
    }

    fn move_window(&self, handle: WindowHandle, x: i32, y: i32) -> Result<()> {
        let mut state = self.state.lock();
        state.calls.moves += 1;
        if state.faults.reject_moves {
            return Err(crate::toast_error!(api, "SetWindowPos", "симулированный отказ для {}", handle));
        }

        let window = state
            .windows
            .iter_mut()
            .find(|w| w.handle == handle)
            .ok_or(ToastError::StaleHandle(handle))?;
        window.rect = window.rect.moved_to(x, y);
        window.visible = true;

        if state.faults.close_after_move {
            state.windows.retain(|w| w.handle != handle);
        }
        Ok(())
    }

    fn is_visible(&self, handle: WindowHandle) -> bool {
        let state = self.state.lock();
        state.windows.iter().any(|w| w.handle == handle && w.visible)
    }

    fn primary_screen_width(&self) -> Result<i32> {
        let mut state = self.state.lock();
        if std::mem::take(&mut state.faults.fail_next_screen_query) {
            return Err(crate::toast_error!(api, "GetSystemMetrics", "симулированный сбой"));
        }
        Ok(state.screen_width)
    }
}
