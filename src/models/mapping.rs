use chrono::{DateTime, Utc};

use super::window::{duration_to_secs, secs_to_duration, TimeWindow};

/// Linear time <-> pixel mapping of a window onto a canvas.
///
/// `x(t) = (t - lower).secs * pixels_per_second`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelMapping {
    lower: DateTime<Utc>,
    pixels_per_second: f64,
    canvas_width_px: f64,
}

impl PixelMapping {
    /// `None` when the canvas has no width or the window no duration.
    pub fn new(window: &TimeWindow, canvas_width_px: f64) -> Option<Self> {
        if !canvas_width_px.is_finite() || canvas_width_px <= 0.0 {
            return None;
        }
        let duration_secs = window.duration_secs();
        if duration_secs <= 0.0 {
            return None;
        }
        Some(Self {
            lower: window.lower,
            pixels_per_second: canvas_width_px / duration_secs,
            canvas_width_px,
        })
    }

    pub fn pixels_per_second(&self) -> f64 {
        self.pixels_per_second
    }

    pub fn canvas_width_px(&self) -> f64 {
        self.canvas_width_px
    }

    pub fn x(&self, t: DateTime<Utc>) -> f64 {
        duration_to_secs(t - self.lower) * self.pixels_per_second
    }

    /// Inverse of [`x`](Self::x).
    pub fn time_at(&self, x: f64) -> Option<DateTime<Utc>> {
        let offset = secs_to_duration(x / self.pixels_per_second)?;
        self.lower.checked_add_signed(offset)
    }

    pub fn px_to_secs(&self, px: f64) -> f64 {
        px / self.pixels_per_second
    }
}
