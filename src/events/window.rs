use std::fmt;

/// Непрозрачный идентификатор окна верхнего уровня, выданный ОС
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub isize);

impl WindowHandle {
    pub fn new(raw: isize) -> Self {
        Self(raw)
    }

    #[allow(dead_code)]
    pub fn value(&self) -> isize {
        self.0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

/// Прямоугольник окна в экранных координатах
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WindowRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl WindowRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Прямоугольник по позиции и размеру
    pub fn from_origin(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn has_positive_size(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }

    /// Тот же размер, левый верхний угол в (x, y)
    pub fn moved_to(&self, x: i32, y: i32) -> Self {
        Self::from_origin(x, y, self.width(), self.height())
    }
}

impl fmt::Display for WindowRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})-({},{}) {}x{}",
            self.left,
            self.top,
            self.right,
            self.bottom,
            self.width(),
            self.height()
        )
    }
}

/// Информация об окне на момент перечисления
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowDescriptor {
    pub handle: WindowHandle,
    pub visible: bool,
    pub title: String,
    pub class_name: String,
    pub rect: WindowRect,
}

impl WindowDescriptor {
    pub fn new(handle: WindowHandle, title: String, rect: WindowRect) -> Self {
        Self {
            handle,
            visible: true,
            title,
            class_name: String::new(),
            rect,
        }
    }

    /// Скрытое окно: остальные свойства у ОС не запрашиваются
    pub fn hidden(handle: WindowHandle) -> Self {
        Self {
            handle,
            visible: false,
            title: String::new(),
            class_name: String::new(),
            rect: WindowRect::default(),
        }
    }

    pub fn with_class(mut self, class_name: String) -> Self {
        self.class_name = class_name;
        self
    }

    #[allow(dead_code)]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

impl fmt::Display for WindowDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.class_name.is_empty() {
            write!(f, "{} \"{}\"", self.handle, self.title)
        } else {
            write!(f, "{} \"{}\" ({})", self.handle, self.title, self.class_name)
        }
    }
}
