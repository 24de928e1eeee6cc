use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Pixel rectangle on the timeline canvas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BlockRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BlockRect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Half-open on the right/bottom edge so adjacent blocks never both claim a point.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB`. An alpha suffix (`#RRGGBBAA`) is accepted and dropped.
    pub fn from_hex(color: &str) -> Result<Self> {
        let Some(hex_part) = color.strip_prefix('#') else {
            bail!("Invalid color format. Must be hex (#RRGGBB)");
        };
        if hex_part.len() != 6 && hex_part.len() != 8 {
            bail!("Invalid color format. Must be hex (#RRGGBB or #RRGGBBAA)");
        }
        if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
            bail!("Invalid color format. Must be hex (#RRGGBB)");
        }

        let channel = |i: usize| u8::from_str_radix(&hex_part[i..i + 2], 16);
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// One drawable block on the timeline: a run of coalesced intervals of the same app.
///
/// Recomputed wholesale on every pass and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderBlock {
    pub rect: BlockRect,
    pub color: Rgb,
    pub icon_data_url: Option<String>,
    pub bundle_id: String,
    pub app_name: String,
    pub interval_ids: Vec<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Focused time summed over the underlying intervals, gaps excluded.
    pub duration_ms: i64,
}

impl RenderBlock {
    pub fn duration(&self) -> Duration {
        Duration::milliseconds(self.duration_ms)
    }

    /// Wall-clock span from first start to last end, gaps included.
    pub fn span(&self) -> Duration {
        self.end_time - self.start_time
    }

    pub fn interval_count(&self) -> usize {
        self.interval_ids.len()
    }
}
