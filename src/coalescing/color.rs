use std::collections::HashMap;

use crate::models::Rgb;

const ENABLE_LOGS: bool = true;

const SATURATION_MIN: f64 = 0.55;
const SATURATION_SPAN: f64 = 0.20;
const BRIGHTNESS_MIN: f64 = 0.70;
const BRIGHTNESS_SPAN: f64 = 0.20;

/// djb2. Stable across runs and platforms, unlike `DefaultHasher`.
fn djb2(bundle_id: &str) -> u32 {
    let mut hash: u32 = 5381;
    for byte in bundle_id.bytes() {
        hash = hash.wrapping_mul(33).wrapping_add(u32::from(byte));
    }
    hash
}

/// Deterministic color for an application identity.
///
/// Hue spans the full wheel; saturation and brightness stay in a mid band so
/// neighbouring blocks stay distinguishable and text on top stays readable.
pub fn app_color(bundle_id: &str) -> Rgb {
    let hash = djb2(bundle_id);
    let hue = f64::from(hash % 360);
    let saturation = SATURATION_MIN + SATURATION_SPAN * f64::from((hash >> 9) % 100) / 99.0;
    let brightness = BRIGHTNESS_MIN + BRIGHTNESS_SPAN * f64::from((hash >> 17) % 100) / 99.0;
    hsv_to_rgb(hue, saturation, brightness)
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let c = v * s;
    let h_prime = (h % 360.0) / 60.0;
    let x = c * (1.0 - (h_prime % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match h_prime as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    let to_byte = |channel: f64| ((channel + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb::new(to_byte(r1), to_byte(g1), to_byte(b1))
}

/// Hashed colors plus user-chosen overrides keyed by bundle id.
#[derive(Debug, Clone, Default)]
pub struct ColorPalette {
    overrides: HashMap<String, Rgb>,
}

impl ColorPalette {
    /// Build from `bundle_id -> "#RRGGBB"` pairs. Unparseable entries are skipped.
    pub fn from_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut parsed = HashMap::with_capacity(overrides.len());
        for (bundle_id, hex) in overrides {
            match Rgb::from_hex(hex) {
                Ok(color) => {
                    parsed.insert(bundle_id.clone(), color);
                }
                Err(e) => {
                    crate::log_warn!("Ignoring color override for {}: {}", bundle_id, e);
                }
            }
        }
        Self { overrides: parsed }
    }

    pub fn color_for(&self, bundle_id: &str) -> Rgb {
        self.overrides
            .get(bundle_id)
            .copied()
            .unwrap_or_else(|| app_color(bundle_id))
    }
}
