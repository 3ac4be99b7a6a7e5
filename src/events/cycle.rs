use super::window::{WindowHandle, WindowRect};
use std::fmt;

/// Как классификатор нашёл кандидата
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// Точное совпадение заголовка через прямой поиск
    ExactTitle,
    /// Эвристика по классу/заголовку и размеру при полном перечислении
    Heuristic,
}

/// Итог одного цикла мониторинга
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Кандидат не найден
    Idle,
    /// Кандидат найден, перемещение не требуется, позиция записана
    Recorded { handle: WindowHandle, rect: WindowRect },
    /// Окно перемещено, записан фактический прямоугольник после перемещения
    Repositioned {
        handle: WindowHandle,
        from: WindowRect,
        to: WindowRect,
    },
    /// ОС отклонила перемещение, запись не изменена
    RepositionFailed { handle: WindowHandle },
    /// Геометрия окна отброшена как шум
    Skipped { handle: WindowHandle },
}

impl CycleOutcome {
    #[allow(dead_code)]
    pub fn handle(&self) -> Option<WindowHandle> {
        match self {
            CycleOutcome::Idle => None,
            CycleOutcome::Recorded { handle, .. }
            | CycleOutcome::Repositioned { handle, .. }
            | CycleOutcome::RepositionFailed { handle }
            | CycleOutcome::Skipped { handle } => Some(*handle),
        }
    }
}

impl fmt::Display for CycleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleOutcome::Idle => write!(f, "нет уведомлений"),
            CycleOutcome::Recorded { handle, rect } => write!(f, "{} на месте {}", handle, rect),
            CycleOutcome::Repositioned { handle, from, to } => {
                write!(f, "{} перемещено {} -> {}", handle, from, to)
            }
            CycleOutcome::RepositionFailed { handle } => {
                write!(f, "{} не удалось переместить", handle)
            }
            CycleOutcome::Skipped { handle } => write!(f, "{} пропущено (геометрия)", handle),
        }
    }
}
