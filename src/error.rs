use crate::events::WindowHandle;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToastError {
    #[error("Ошибка системного вызова {call}: {message}")]
    Api { call: &'static str, message: String },

    #[error("Окно {0} больше не существует")]
    StaleHandle(WindowHandle),

    #[error("Некорректная геометрия окна: {width}x{height}")]
    InvalidGeometry { width: i32, height: i32 },

    #[error("Сервис недоступен: {0}")]
    ServiceUnavailable(String),
}

impl ToastError {
    /// Ошибки, которые цикл мониторинга проглатывает и повторяет на следующей итерации
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ToastError::Api { .. } | ToastError::StaleHandle(_) | ToastError::InvalidGeometry { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ToastError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! toast_error {
    (api, $call:expr, $($arg:tt)*) => {
        $crate::error::ToastError::Api { call: $call, message: format!($($arg)*) }
    };
    (service_unavailable, $($arg:tt)*) => {
        $crate::error::ToastError::ServiceUnavailable(format!($($arg)*))
    };
}
