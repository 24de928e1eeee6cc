//! Minimap thumb geometry for the always-zoomed-out navigator strip.

use serde::{Deserialize, Serialize};

use crate::models::{duration_to_secs, TimeWindow};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigatorConfig {
    /// Keeps the thumb grabbable at extreme zoom
    pub min_thumb_width_px: f64,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            min_thumb_width_px: 24.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NavigatorThumb {
    pub x: f64,
    pub width: f64,
}

impl NavigatorThumb {
    pub fn contains(&self, x: f64) -> bool {
        x >= self.x && x <= self.x + self.width
    }
}

/// Thumb position and width for `visible` within `total` on a track `track_width_px` wide.
///
/// The width is proportional to the visible share, floored at
/// `min_thumb_width_px` and capped at the track. The thumb travels over the
/// track minus its own width, so a floored thumb still reaches both ends.
pub fn thumb(
    visible: &TimeWindow,
    total: &TimeWindow,
    track_width_px: f64,
    config: &NavigatorConfig,
) -> NavigatorThumb {
    if !track_width_px.is_finite() || track_width_px <= 0.0 {
        return NavigatorThumb { x: 0.0, width: 0.0 };
    }

    let total_secs = total.duration_secs();
    let visible_secs = visible.duration_secs();
    if total_secs <= 0.0 || visible_secs >= total_secs {
        return NavigatorThumb {
            x: 0.0,
            width: track_width_px,
        };
    }

    let width = (track_width_px * visible_secs / total_secs)
        .max(config.min_thumb_width_px)
        .min(track_width_px);
    let offset_secs = duration_to_secs(visible.lower - total.lower);
    let position = (offset_secs / (total_secs - visible_secs)).clamp(0.0, 1.0);

    NavigatorThumb {
        x: (track_width_px - width) * position,
        width,
    }
}

/// Seconds of pan for a thumb drag of `delta_px`.
///
/// The track maps the whole total range, so the factor is
/// `track_width_px / total_secs` pixels per second.
pub fn thumb_drag_to_pan_secs(delta_px: f64, total: &TimeWindow, track_width_px: f64) -> f64 {
    let total_secs = total.duration_secs();
    if track_width_px <= 0.0 || total_secs <= 0.0 {
        return 0.0;
    }
    delta_px / (track_width_px / total_secs)
}

/// Tracks one thumb drag and turns pointer motion into incremental pan deltas.
#[derive(Debug, Clone, Default)]
pub struct NavigatorDrag {
    last_x: Option<f64>,
}

impl NavigatorDrag {
    /// Begin a drag if `x` lands on the thumb.
    pub fn press(&mut self, x: f64, thumb: &NavigatorThumb) -> bool {
        if thumb.contains(x) {
            self.last_x = Some(x);
            true
        } else {
            false
        }
    }

    /// Pixel delta since the last move, or `None` when no drag is active.
    pub fn drag_to(&mut self, x: f64) -> Option<f64> {
        let last = self.last_x?;
        self.last_x = Some(x);
        Some(x - last)
    }

    pub fn release(&mut self) {
        self.last_x = None;
    }

    pub fn is_active(&self) -> bool {
        self.last_x.is_some()
    }
}
