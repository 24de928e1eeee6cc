use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::AppMetadataProvider;

const ENABLE_LOGS: bool = false;

/// Synthetic bundle ids the capture loop emits that never have icons.
const SYNTHETIC_BUNDLE_IDS: &[&str] = &["com.apple.system", "com.apple.loginwindow"];

/// What we learned about an app the first time we asked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CachedApp {
    pub display_name: Option<String>,
    pub icon_data_url: Option<String>,
}

/// Append-only memo of metadata lookups keyed by bundle id.
///
/// Misses are cached too, so a missing icon costs one provider call per
/// session. Entries are never invalidated. Access is single-threaded (the
/// render pass runs on the UI thread), hence `RefCell` rather than a lock.
pub struct IconCache {
    provider: Box<dyn AppMetadataProvider>,
    entries: RefCell<HashMap<String, CachedApp>>,
    lookups: Cell<usize>,
}

impl IconCache {
    pub fn new(provider: Box<dyn AppMetadataProvider>) -> Self {
        Self {
            provider,
            entries: RefCell::new(HashMap::new()),
            lookups: Cell::new(0),
        }
    }

    pub fn get(&self, bundle_id: &str) -> CachedApp {
        if let Some(entry) = self.entries.borrow().get(bundle_id) {
            return entry.clone();
        }

        let entry = self.resolve(bundle_id);
        self.entries
            .borrow_mut()
            .insert(bundle_id.to_string(), entry.clone());
        entry
    }

    fn resolve(&self, bundle_id: &str) -> CachedApp {
        if bundle_id.is_empty() || SYNTHETIC_BUNDLE_IDS.contains(&bundle_id) {
            crate::log_trace!("Skipping icon lookup for synthetic bundle ID: {}", bundle_id);
            return CachedApp::default();
        }

        self.lookups.set(self.lookups.get() + 1);
        let entry = CachedApp {
            display_name: self.provider.display_name(bundle_id),
            icon_data_url: self.provider.icon_data_url(bundle_id),
        };
        if entry.icon_data_url.is_none() {
            crate::log_debug!("No icon for {} (placeholder will be drawn)", bundle_id);
        }
        entry
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Provider calls made so far.
    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::StaticMetadata;

    fn cache() -> IconCache {
        let provider = StaticMetadata::default()
            .with_app("com.x", Some("X App"), Some("data:image/png;base64,AAA"))
            .with_app("com.y", None, None);
        IconCache::new(Box::new(provider))
    }

    #[test]
    fn memoizes_hits_and_misses() {
        let cache = cache();
        let first = cache.get("com.x");
        assert_eq!(first.icon_data_url.as_deref(), Some("data:image/png;base64,AAA"));
        assert_eq!(first.display_name.as_deref(), Some("X App"));
        assert_eq!(cache.get("com.x"), first);
        assert_eq!(cache.get("com.unknown"), CachedApp::default());
        assert_eq!(cache.get("com.unknown"), CachedApp::default());
        assert_eq!(cache.lookups(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn synthetic_ids_never_reach_provider() {
        let cache = cache();
        assert_eq!(cache.get("com.apple.system"), CachedApp::default());
        assert_eq!(cache.get(""), CachedApp::default());
        assert_eq!(cache.lookups(), 0);
        assert_eq!(cache.len(), 2);
    }
}
