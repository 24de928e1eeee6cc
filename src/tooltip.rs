//! Pointer-to-block hit testing and the content shown for a hovered block.

use std::fmt;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::models::RenderBlock;

/// First block whose rectangle contains `(x, y)`.
///
/// Blocks arrive in ascending x, so everything starting right of `x` is cut
/// off with a binary search before the scan.
pub fn hit_test(x: f64, y: f64, blocks: &[RenderBlock]) -> Option<&RenderBlock> {
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    let candidates = blocks.partition_point(|b| b.rect.x <= x);
    blocks[..candidates].iter().find(|b| b.rect.contains(x, y))
}

/// What the host needs to show or act on for a single block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BlockSummary {
    pub bundle_id: String,
    pub app_name: String,
    pub interval_ids: Vec<String>,
    pub interval_count: usize,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_label: String,
}

impl BlockSummary {
    pub fn from_block(block: &RenderBlock) -> Self {
        Self {
            bundle_id: block.bundle_id.clone(),
            app_name: block.app_name.clone(),
            interval_ids: block.interval_ids.clone(),
            interval_count: block.interval_count(),
            start_time: block.start_time,
            end_time: block.end_time,
            duration_label: format_duration(block.duration()),
        }
    }

    /// `HH:MM:SS - HH:MM:SS` in the given zone.
    pub fn time_range_label<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: fmt::Display,
    {
        format!(
            "{} - {}",
            self.start_time.with_timezone(tz).format("%H:%M:%S"),
            self.end_time.with_timezone(tz).format("%H:%M:%S")
        )
    }
}

/// Compact human duration: `1h 05m`, `4m 07s`, `42s`.
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.num_seconds().max(0);
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
