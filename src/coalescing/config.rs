use serde::{Deserialize, Serialize};

/// Level-of-detail thresholds for turning intervals into blocks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CoalescingConfig {
    /// Same-app intervals closer than this many pixels become one block
    pub merge_threshold_px: f64,

    /// Blocks narrower than this are dropped as visual noise
    pub cull_epsilon_px: f64,

    /// Surviving blocks are drawn at least this wide
    pub min_draw_width_px: f64,

    /// Vertical placement of the block row
    pub block_top_px: f64,
    pub block_height_px: f64,
}

impl Default for CoalescingConfig {
    fn default() -> Self {
        Self {
            merge_threshold_px: 1.0,
            cull_epsilon_px: 0.25,
            min_draw_width_px: 2.0,
            block_top_px: 8.0,
            block_height_px: 48.0,
        }
    }
}
