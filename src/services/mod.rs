pub mod classifier;
pub mod monitor_loop;
pub mod position_tracker;
pub mod repositioner;
pub mod scan;
pub mod window_source;

pub use classifier::WindowClassifier;
pub use monitor_loop::MonitorLoop;
pub use scan::scan_windows;
pub use window_source::create_window_source;
