//! WindowSource: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for talking to the OS window
//! surface: enumerating top-level windows, looking one up by title, reading geometry
//! and visibility, and moving a window. It MUST NOT decide which window is a
//! notification or whether it should move. Those decisions belong to
//! WindowClassifier and PositionTracker.

mod dry_run;
mod simulated;
#[cfg(windows)]
mod win32;
mod r#trait;

pub use self::r#trait::{create_window_source, WindowIter, WindowSource};
#[cfg(test)]
pub use self::simulated::SimulatedDesktop;
