pub mod color;
pub mod config;
pub mod processor;

pub use color::{app_color, ColorPalette};
pub use config::CoalescingConfig;
pub use processor::TimelineProcessor;
