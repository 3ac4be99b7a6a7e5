pub mod cycle;
pub mod window;

pub use cycle::{CycleOutcome, MatchKind};
pub use window::{WindowDescriptor, WindowHandle, WindowRect};
