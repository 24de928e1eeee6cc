//! Application metadata (display names, icons) resolved by bundle id.
//!
//! Resolution belongs to the host; the timeline only asks through
//! [`AppMetadataProvider`] and memoizes the answers in an [`IconCache`].

mod icon_cache;

pub use icon_cache::{CachedApp, IconCache};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Host-side lookup of per-application metadata.
///
/// Both lookups may fail silently; `None` means "use a placeholder".
pub trait AppMetadataProvider {
    fn icon_data_url(&self, bundle_id: &str) -> Option<String>;

    fn display_name(&self, _bundle_id: &str) -> Option<String> {
        None
    }
}

/// Provider that knows nothing. Every block falls back to the placeholder icon.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetadata;

impl AppMetadataProvider for NoMetadata {
    fn icon_data_url(&self, _bundle_id: &str) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppMetadata {
    pub app_name: Option<String>,
    pub icon_data_url: Option<String>,
}

/// In-memory provider, e.g. loaded from the apps table by the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticMetadata {
    pub apps: HashMap<String, AppMetadata>,
}

impl StaticMetadata {
    pub fn with_app(
        mut self,
        bundle_id: impl Into<String>,
        app_name: Option<&str>,
        icon_data_url: Option<&str>,
    ) -> Self {
        self.apps.insert(
            bundle_id.into(),
            AppMetadata {
                app_name: app_name.map(String::from),
                icon_data_url: icon_data_url.map(String::from),
            },
        );
        self
    }
}

impl AppMetadataProvider for StaticMetadata {
    fn icon_data_url(&self, bundle_id: &str) -> Option<String> {
        self.apps.get(bundle_id)?.icon_data_url.clone()
    }

    fn display_name(&self, bundle_id: &str) -> Option<String> {
        self.apps.get(bundle_id)?.app_name.clone()
    }
}
