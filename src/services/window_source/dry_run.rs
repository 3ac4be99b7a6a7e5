use super::r#trait::{WindowIter, WindowSource};
use super::simulated::SimulatedDesktop;
use crate::error::Result;
use crate::events::{WindowHandle, WindowRect};
use parking_lot::Mutex;
use std::time::{Duration, Instant};
use tracing::info;

const SCREEN_WIDTH: i32 = 1920;
const ROUND: Duration = Duration::from_secs(12);
const TOAST_SHOWN_FROM: Duration = Duration::from_secs(2);
const TOAST_SHOWN_UNTIL: Duration = Duration::from_secs(9);

/// Эмуляция рабочего стола: каждые 12 секунд в правом нижнем углу
/// появляется уведомление и через 7 секунд исчезает.
pub struct DryRunSource {
    desktop: SimulatedDesktop,
    started: Instant,
    current_toast: Mutex<Option<(u64, WindowHandle)>>,
}

impl Default for DryRunSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DryRunSource {
    pub fn new() -> Self {
        info!("Dry-run режим - WindowSource работает в режиме эмуляции");

        let desktop = SimulatedDesktop::new(SCREEN_WIDTH);
        desktop.open("Program Manager", "Progman", WindowRect::from_origin(0, 0, SCREEN_WIDTH, 1080));
        desktop.open(
            "Документ - Блокнот",
            "Notepad",
            WindowRect::from_origin(200, 150, 800, 600),
        );

        Self {
            desktop,
            started: Instant::now(),
            current_toast: Mutex::new(None),
        }
    }

    /// Приводит эмулированный рабочий стол к текущей фазе сценария
    fn advance(&self) {
        let elapsed = self.started.elapsed();
        let round = elapsed.as_secs() / ROUND.as_secs();
        let phase = Duration::from_secs(elapsed.as_secs() % ROUND.as_secs());
        let shown = (TOAST_SHOWN_FROM..TOAST_SHOWN_UNTIL).contains(&phase);

        let mut current = self.current_toast.lock();
        let stale = match *current {
            Some((toast_round, handle)) if !shown || toast_round != round => Some(handle),
            _ => None,
        };
        if let Some(handle) = stale {
            self.desktop.close(handle);
            info!("[DRY RUN] уведомление {} скрыто", handle);
            *current = None;
        }

        if shown && current.is_none() {
            let handle = self.open_toast(round);
            *current = Some((round, handle));
        }
    }

    fn open_toast(&self, round: u64) -> WindowHandle {
        // Позиция по умолчанию у оболочки: правый нижний угол над панелью задач
        if round % 2 == 0 {
            let handle = self.desktop.open(
                "New notification",
                "Windows.UI.Core.CoreWindow",
                WindowRect::from_origin(SCREEN_WIDTH - 364 - 16, 1080 - 48 - 108 - 16, 364, 108),
            );
            info!("[DRY RUN] показано уведомление {} с точным заголовком", handle);
            handle
        } else {
            let handle = self.desktop.open(
                "Календарь: встреча через 5 минут",
                "NotificationPopupWindow",
                WindowRect::from_origin(SCREEN_WIDTH - 360 - 16, 1080 - 48 - 120 - 16, 360, 120),
            );
            info!("[DRY RUN] показано уведомление {} без точного заголовка", handle);
            handle
        }
    }
}

impl WindowSource for DryRunSource {
    fn windows(&self) -> Result<WindowIter<'_>> {
        self.advance();
        self.desktop.windows()
    }

    fn find_by_title(&self, title: &str) -> Result<Option<WindowHandle>> {
        self.advance();
        self.desktop.find_by_title(title)
    }

    fn window_rect(&self, handle: WindowHandle) -> Result<WindowRect> {
        self.desktop.window_rect(handle)
    }

    fn move_window(&self, handle: WindowHandle, x: i32, y: i32) -> Result<()> {
        info!("[DRY RUN] перемещение окна {} в ({}, {})", handle, x, y);
        self.desktop.move_window(handle, x, y)
    }

    fn is_visible(&self, handle: WindowHandle) -> bool {
        self.desktop.is_visible(handle)
    }

    fn primary_screen_width(&self) -> Result<i32> {
        self.desktop.primary_screen_width()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_desktop_has_no_toast() {
        let source = DryRunSource::new();
        let windows: Vec<_> = source.windows().unwrap().collect();
        assert_eq!(windows.len(), 2);
        assert!(source.find_by_title("New notification").unwrap().is_none());
        assert_eq!(source.primary_screen_width().unwrap(), SCREEN_WIDTH);
    }

    #[test]
    fn test_first_toast_is_exact_title() {
        let source = DryRunSource::new();
        let handle = source.open_toast(0);
        assert_eq!(source.find_by_title("New notification").unwrap(), Some(handle));
        let rect = source.window_rect(handle).unwrap();
        assert_eq!(rect.right, SCREEN_WIDTH - 16);
    }
}
