use chrono::Duration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewportConfig {
    /// Zoom-in floor: the visible window never gets shorter than this
    pub min_visible_duration_secs: u64,
}

impl ViewportConfig {
    /// The floor as a `Duration`, at least one second and saturating at
    /// the largest representable span.
    pub fn min_visible_duration(&self) -> Duration {
        let secs = i64::try_from(self.min_visible_duration_secs)
            .unwrap_or(i64::MAX)
            .max(1);
        Duration::try_seconds(secs).unwrap_or(Duration::MAX)
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_visible_duration_secs: 60,
        }
    }
}
