use crate::config::PlacementConfig;
use crate::error::{Result, ToastError};
use crate::events::{WindowHandle, WindowRect};
use std::collections::HashMap;

/// Решение трекера по кандидату
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Переместить левый верхний угол окна в (x, y)
    Reposition { x: i32, y: i32 },
    /// Только запомнить текущий прямоугольник
    RecordOnly,
}

/// Якорь в правом верхнем углу экрана для одного решения
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub screen_width: i32,
    pub target_y: i32,
    pub margin_px: i32,
    pub tolerance_px: i32,
}

impl Anchor {
    pub fn new(screen_width: i32, placement: &PlacementConfig) -> Self {
        Self {
            screen_width,
            target_y: placement.target_y,
            margin_px: placement.margin_px,
            tolerance_px: placement.tolerance_px,
        }
    }

    /// Левая граница окна заданной ширины, прижатого к правому краю с отступом
    pub fn target_x(&self, width: i32) -> i32 {
        self.screen_width - width - self.margin_px
    }

    pub fn is_at_target(&self, rect: &WindowRect) -> bool {
        (rect.left - self.target_x(rect.width())).abs() < self.tolerance_px
            && (rect.top - self.target_y).abs() < self.tolerance_px
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRecord {
    pub handle: WindowHandle,
    pub last_rect: WindowRect,
}

/// Изменилась ли хотя бы одна из четырёх границ
pub fn has_changed(old: &WindowRect, new: &WindowRect) -> bool {
    old.left != new.left || old.top != new.top || old.right != new.right || old.bottom != new.bottom
}

/// Последние известные прямоугольники окон-кандидатов.
///
/// Запись создаётся при первом появлении окна кандидатом, обновляется в
/// каждом цикле, где оно снова кандидат, и удаляется в первом же цикле,
/// когда окно стало невидимым. Принадлежит единственному рабочему циклу.
pub struct PositionTracker {
    registry: HashMap<WindowHandle, WindowRecord>,
    max_width: i32,
    max_height: i32,
}

impl PositionTracker {
    pub fn new(placement: &PlacementConfig) -> Self {
        Self {
            registry: HashMap::new(),
            max_width: placement.max_width,
            max_height: placement.max_height,
        }
    }

    /// Перемещать только если окно новое или сдвинулось и при этом не у якоря.
    ///
    /// Окно, прямоугольник которого не менялся с прошлого цикла, не трогаем,
    /// даже если оно не у якоря.
    pub fn decide(&self, handle: WindowHandle, rect: WindowRect, anchor: &Anchor) -> Result<Action> {
        let (width, height) = (rect.width(), rect.height());
        if !rect.has_positive_size() || width > self.max_width || height > self.max_height {
            return Err(ToastError::InvalidGeometry { width, height });
        }

        let changed = match self.registry.get(&handle) {
            Some(record) => has_changed(&record.last_rect, &rect),
            None => true,
        };

        if changed && !anchor.is_at_target(&rect) {
            Ok(Action::Reposition {
                x: anchor.target_x(width),
                y: anchor.target_y,
            })
        } else {
            Ok(Action::RecordOnly)
        }
    }

    pub fn record(&mut self, handle: WindowHandle, rect: WindowRect) {
        self.registry.insert(
            handle,
            WindowRecord {
                handle,
                last_rect: rect,
            },
        );
    }

    /// Удаляет записи всех окон, которые сейчас не видимы; возвращает удалённые дескрипторы
    pub fn prune<F>(&mut self, mut is_visible: F) -> Vec<WindowHandle>
    where
        F: FnMut(WindowHandle) -> bool,
    {
        let mut removed = Vec::new();
        self.registry.retain(|handle, _| {
            let keep = is_visible(*handle);
            if !keep {
                removed.push(*handle);
            }
            keep
        });
        removed
    }

    #[allow(dead_code)]
    pub fn get(&self, handle: WindowHandle) -> Option<&WindowRecord> {
        self.registry.get(&handle)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}
