use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::coalescing::{CoalescingConfig, ColorPalette};
use crate::interaction::InteractionConfig;
use crate::navigator::NavigatorConfig;
use crate::viewport::ViewportConfig;

/// Everything tunable about the timeline, persisted as one JSON document.
///
/// Missing sections fall back to their defaults, so older settings files
/// keep loading after new knobs are added.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineConfig {
    pub coalescing: CoalescingConfig,
    pub viewport: ViewportConfig,
    pub interaction: InteractionConfig,
    pub navigator: NavigatorConfig,
    /// `bundle_id -> "#RRGGBB"`; wins over the hashed color
    pub app_colors: HashMap<String, String>,
}

impl TimelineConfig {
    pub fn palette(&self) -> ColorPalette {
        ColorPalette::from_overrides(&self.app_colors)
    }
}
