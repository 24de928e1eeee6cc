pub mod block;
pub mod interval;
pub mod mapping;
pub mod window;

pub use block::{BlockRect, RenderBlock, Rgb};
pub use interval::ActivityInterval;
pub use mapping::PixelMapping;
pub use window::{duration_to_secs, secs_to_duration, TimeWindow};
