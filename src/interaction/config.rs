use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct InteractionConfig {
    /// Press-to-release movement below this is a click, not a drag
    pub click_distance_px: f64,

    /// Drags released above this y zoom to the range; below it they create a record
    pub interactive_band_height_px: f64,

    /// Wheel zoom factor is `1 - dy * wheel_zoom_sensitivity`
    pub wheel_zoom_sensitivity: f64,

    /// Bounds on any single zoom step
    pub min_zoom_factor: f64,
    pub max_zoom_factor: f64,
}

impl InteractionConfig {
    /// Non-finite factors pass through unchanged so the viewport rejects them.
    pub fn clamp_zoom_factor(&self, factor: f64) -> f64 {
        if !factor.is_finite() {
            return factor;
        }
        factor.max(self.min_zoom_factor).min(self.max_zoom_factor)
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            click_distance_px: 10.0,
            interactive_band_height_px: 64.0,
            wheel_zoom_sensitivity: 0.05,
            min_zoom_factor: 0.1,
            max_zoom_factor: 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_finite_factors_only() {
        let config = InteractionConfig::default();
        assert_eq!(config.clamp_zoom_factor(0.01), 0.1);
        assert_eq!(config.clamp_zoom_factor(50.0), 10.0);
        assert_eq!(config.clamp_zoom_factor(0.5), 0.5);
        assert!(config.clamp_zoom_factor(f64::NAN).is_nan());
        assert_eq!(config.clamp_zoom_factor(f64::INFINITY), f64::INFINITY);
    }
}
