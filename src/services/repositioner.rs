use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::{WindowHandle, WindowRect};
use crate::services::window_source::WindowSource;
use tokio::time::{sleep, Duration};

/// Перемещает окно к якорю и возвращает фактический прямоугольник после перемещения
pub struct Repositioner {
    settle_delay: Duration,
}

impl Repositioner {
    pub fn new(settle_delay: Duration) -> Self {
        Self { settle_delay }
    }

    /// Размер и Z-порядок не меняются, окно принудительно показывается.
    ///
    /// При ошибке запись трекера не трогается: следующий цикл сравнит
    /// реальное положение окна с прежней записью.
    pub async fn apply(
        &self,
        source: &dyn WindowSource,
        handle: WindowHandle,
        x: i32,
        y: i32,
    ) -> Result<WindowRect> {
        // Даём уведомлению закончить анимацию появления
        sleep(self.settle_delay).await;

        source.move_window(handle, x, y)?;
        let rect = source.window_rect(handle)?;

        debug_if_enabled!("Окно {} после перемещения: {}", handle, rect);
        Ok(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToastError;
    use crate::services::window_source::SimulatedDesktop;

    #[tokio::test]
    async fn test_apply_returns_real_rect() {
        let desktop = SimulatedDesktop::new(1920);
        let handle = desktop.open("New notification", "Toast", WindowRect::new(1200, 20, 1500, 120));

        let rect = Repositioner::new(Duration::ZERO)
            .apply(&desktop, handle, 1610, 10)
            .await
            .unwrap();

        assert_eq!(rect, WindowRect::new(1610, 10, 1910, 110));
        assert_eq!(desktop.calls().moves, 1);
    }

    #[tokio::test]
    async fn test_apply_reports_rejected_move() {
        let desktop = SimulatedDesktop::new(1920);
        let handle = desktop.open("New notification", "Toast", WindowRect::new(1200, 20, 1500, 120));
        desktop.reject_moves(true);

        let result = Repositioner::new(Duration::ZERO).apply(&desktop, handle, 1610, 10).await;
        assert!(matches!(result, Err(ToastError::Api { call: "SetWindowPos", .. })));
        assert_eq!(desktop.rect_of(handle), Some(WindowRect::new(1200, 20, 1500, 120)));
    }

    #[tokio::test]
    async fn test_apply_fails_when_requery_fails() {
        let desktop = SimulatedDesktop::new(1920);
        let handle = desktop.open("New notification", "Toast", WindowRect::new(1200, 20, 1500, 120));
        desktop.close_after_move(true);

        let result = Repositioner::new(Duration::ZERO).apply(&desktop, handle, 1610, 10).await;
        assert!(matches!(result, Err(ToastError::StaleHandle(h)) if h == handle));
        assert_eq!(desktop.calls().moves, 1);
    }

    #[tokio::test]
    async fn test_apply_on_closed_window() {
        let desktop = SimulatedDesktop::new(1920);
        let handle = desktop.open("New notification", "Toast", WindowRect::new(1200, 20, 1500, 120));
        desktop.close(handle);

        let result = Repositioner::new(Duration::from_millis(1)).apply(&desktop, handle, 1610, 10).await;
        assert!(matches!(result, Err(ToastError::StaleHandle(h)) if h == handle));
    }
}
