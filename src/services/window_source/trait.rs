use crate::error::Result;
use crate::events::{WindowDescriptor, WindowHandle, WindowRect};

/// Lazy sequence of top-level windows, in the order the OS presents them.
pub type WindowIter<'a> = Box<dyn Iterator<Item = WindowDescriptor> + Send + 'a>;

/// Trait for the OS window surface the monitor loop reads and manipulates.
///
/// Every call is synchronous and reflects the state of the desktop at the
/// moment of the call. Implementations must not cache between calls.
pub trait WindowSource: Send + Sync {
    /// Enumerate all top-level windows. Each call starts a fresh enumeration.
    fn windows(&self) -> Result<WindowIter<'_>>;

    /// Direct lookup of a top-level window by its exact title.
    fn find_by_title(&self, title: &str) -> Result<Option<WindowHandle>>;

    /// Current bounding rectangle; fails for a stale handle.
    fn window_rect(&self, handle: WindowHandle) -> Result<WindowRect>;

    /// Move the window to (x, y) keeping its size and Z-order and making sure it is shown.
    fn move_window(&self, handle: WindowHandle, x: i32, y: i32) -> Result<()>;

    fn is_visible(&self, handle: WindowHandle) -> bool;

    /// Width of the primary display in pixels.
    fn primary_screen_width(&self) -> Result<i32>;
}

/// Factory function to create an appropriate window source based on the dry_run flag
pub fn create_window_source(dry_run: bool) -> Result<Box<dyn WindowSource>> {
    if dry_run {
        return Ok(Box::new(super::dry_run::DryRunSource::new()));
    }

    #[cfg(windows)]
    {
        Ok(Box::new(super::win32::Win32Source::new()))
    }

    #[cfg(not(windows))]
    {
        Err(crate::toast_error!(
            service_unavailable,
            "перемещение окон поддерживается только в Windows, используйте --dry-run"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_source_is_always_available() {
        let source = create_window_source(true).unwrap();
        assert!(source.primary_screen_width().unwrap() > 0);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_real_source_unavailable_off_windows() {
        let err = create_window_source(false).err().unwrap();
        assert!(matches!(err, crate::error::ToastError::ServiceUnavailable(_)));
    }
}
