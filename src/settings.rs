use anyhow::{anyhow, Context, Result};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::config::TimelineConfig;

const ENABLE_LOGS: bool = true;

/// Timeline settings backed by a JSON file.
///
/// A missing or unreadable-as-JSON file yields defaults; writes go straight
/// back to disk.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<TimelineConfig>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|e| {
                crate::log_warn!("Settings at {} are invalid, using defaults: {}", path.display(), e);
                TimelineConfig::default()
            })
        } else {
            TimelineConfig::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn config(&self) -> Result<TimelineConfig> {
        let guard = self
            .data
            .read()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        Ok(guard.clone())
    }

    pub fn update(&self, config: TimelineConfig) -> Result<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        self.persist(&config)?;
        *guard = config;
        Ok(())
    }

    /// Set or clear (`None`) the color override for one app.
    pub fn set_app_color(&self, bundle_id: &str, hex: Option<&str>) -> Result<()> {
        let mut config = self.config()?;
        match hex {
            Some(hex) => {
                // Reject here so a bad value never reaches the file
                crate::models::Rgb::from_hex(hex)?;
                config.app_colors.insert(bundle_id.to_string(), hex.to_string());
            }
            None => {
                config.app_colors.remove(bundle_id);
            }
        }
        self.update(config)
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: TimelineConfig = serde_json::from_str(&contents)?;
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        *guard = data;
        Ok(())
    }

    fn persist(&self, data: &TimelineConfig) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
