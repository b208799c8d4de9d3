//! Cache trigger service.
//!
//! High-level API for invalidating tagged cache entries from mutating
//! handlers. Invalidation happens synchronously: by the time a trigger
//! method returns, subsequent reads observe the latest store state.

use std::sync::Arc;

use tracing::debug;

use super::store::ContentCache;
use super::tags::CacheTag;

pub struct CacheTrigger {
    cache: Arc<ContentCache>,
}

impl CacheTrigger {
    pub fn new(cache: Arc<ContentCache>) -> Self {
        Self { cache }
    }

    /// Invalidate one tag. Safe to call repeatedly.
    pub fn invalidate(&self, tag: CacheTag) {
        if !self.cache.is_enabled() {
            debug!(tag = tag.as_str(), "Cache trigger skipped: cache disabled");
            return;
        }
        debug!(tag = tag.as_str(), "Invalidating cache tag");
        self.cache.invalidate(tag);
    }

    /// Invalidate several tags as one mutation's fallout.
    pub fn invalidate_all(&self, tags: &[CacheTag]) {
        for tag in tags {
            self.invalidate(*tag);
        }
    }

    /// Catalogue mutations also change navigation data, so the whole tag goes.
    pub fn catalogue_changed(&self) {
        self.invalidate(CacheTag::Catalogue);
    }

    pub fn fabrics_changed(&self) {
        self.invalidate(CacheTag::Fabrics);
    }

    pub fn factory_changed(&self) {
        self.invalidate(CacheTag::Factory);
    }

    pub fn reviews_changed(&self) {
        self.invalidate(CacheTag::Reviews);
    }

    /// A settings write invalidates the flat settings tag plus the page tag
    /// gated by the key, when one exists.
    pub fn setting_changed(&self, key: &str) {
        self.invalidate(CacheTag::Settings);
        let page_tag = match key {
            "about_page" => Some(CacheTag::AboutPage),
            "legal_page" => Some(CacheTag::LegalPage),
            "factory_page" => Some(CacheTag::FactoryPage),
            _ => None,
        };
        if let Some(tag) = page_tag {
            self.invalidate(tag);
        }
    }

    pub fn cache(&self) -> &Arc<ContentCache> {
        &self.cache
    }
}
