//! Cache storage for public content reads.
//!
//! Singleton slots hold whole-family lists (navigation, fabrics, factory
//! gallery, public reviews, sections); keyed slots hold per-slug and
//! per-setting-key lookups with LRU eviction. Every entry carries its store
//! time and is treated as a miss once older than the configured
//! revalidation interval.

use std::sync::RwLock;
use std::time::{Duration, Instant};

use lru::LruCache;
use metrics::counter;

use crate::domain::entities::{
    CatalogueItemRecord, ClothingTypeRecord, FabricRecord, FactoryPhotoRecord, ReviewRecord,
    SiteSectionRecord,
};

use super::config::CacheConfig;
use super::lock::{rw_read, rw_write};
use super::tags::CacheTag;

const SOURCE: &str = "cache::store";

#[derive(Clone)]
struct Timed<T> {
    value: T,
    stored_at: Instant,
}

impl<T> Timed<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
        }
    }

    fn fresh_within(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() < ttl
    }
}

/// In-process store for the cached read layer.
pub struct ContentCache {
    enabled: bool,
    ttl: Duration,

    // Singleton slots (no eviction needed).
    navigation: RwLock<Option<Timed<Vec<ClothingTypeRecord>>>>,
    fabrics: RwLock<Option<Timed<Vec<FabricRecord>>>>,
    factory_photos: RwLock<Option<Timed<Vec<FactoryPhotoRecord>>>>,
    public_reviews: RwLock<Option<Timed<Vec<ReviewRecord>>>>,
    sections: RwLock<Option<Timed<Vec<SiteSectionRecord>>>>,

    // Keyed slots (with LRU eviction).
    catalogue_by_slug: RwLock<LruCache<String, Timed<CatalogueItemRecord>>>,
    catalogue_lists: RwLock<LruCache<String, Timed<Vec<CatalogueItemRecord>>>>,
    fabrics_by_slug: RwLock<LruCache<String, Timed<FabricRecord>>>,
    settings: RwLock<LruCache<String, Timed<serde_json::Value>>>,
}

impl ContentCache {
    pub fn new(config: &CacheConfig) -> Self {
        let limit = config.entry_limit_non_zero();
        Self {
            enabled: config.enabled,
            ttl: config.revalidate_after,
            navigation: RwLock::new(None),
            fabrics: RwLock::new(None),
            factory_photos: RwLock::new(None),
            public_reviews: RwLock::new(None),
            sections: RwLock::new(None),
            catalogue_by_slug: RwLock::new(LruCache::new(limit)),
            catalogue_lists: RwLock::new(LruCache::new(limit)),
            fabrics_by_slug: RwLock::new(LruCache::new(limit)),
            settings: RwLock::new(LruCache::new(limit)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // ========================================================================
    // Singleton slots
    // ========================================================================

    pub fn get_navigation(&self) -> Option<Vec<ClothingTypeRecord>> {
        self.get_singleton(&self.navigation, CacheTag::Catalogue, "get_navigation")
    }

    pub fn set_navigation(&self, value: Vec<ClothingTypeRecord>) {
        self.set_singleton(&self.navigation, value, "set_navigation");
    }

    pub fn get_fabrics(&self) -> Option<Vec<FabricRecord>> {
        self.get_singleton(&self.fabrics, CacheTag::Fabrics, "get_fabrics")
    }

    pub fn set_fabrics(&self, value: Vec<FabricRecord>) {
        self.set_singleton(&self.fabrics, value, "set_fabrics");
    }

    pub fn get_factory_photos(&self) -> Option<Vec<FactoryPhotoRecord>> {
        self.get_singleton(&self.factory_photos, CacheTag::Factory, "get_factory_photos")
    }

    pub fn set_factory_photos(&self, value: Vec<FactoryPhotoRecord>) {
        self.set_singleton(&self.factory_photos, value, "set_factory_photos");
    }

    pub fn get_public_reviews(&self) -> Option<Vec<ReviewRecord>> {
        self.get_singleton(&self.public_reviews, CacheTag::Reviews, "get_public_reviews")
    }

    pub fn set_public_reviews(&self, value: Vec<ReviewRecord>) {
        self.set_singleton(&self.public_reviews, value, "set_public_reviews");
    }

    pub fn get_sections(&self) -> Option<Vec<SiteSectionRecord>> {
        self.get_singleton(&self.sections, CacheTag::Settings, "get_sections")
    }

    pub fn set_sections(&self, value: Vec<SiteSectionRecord>) {
        self.set_singleton(&self.sections, value, "set_sections");
    }

    // ========================================================================
    // Keyed slots
    // ========================================================================

    pub fn get_catalogue_by_slug(&self, slug: &str) -> Option<CatalogueItemRecord> {
        self.get_keyed(
            &self.catalogue_by_slug,
            slug,
            CacheTag::Catalogue,
            "get_catalogue_by_slug",
        )
    }

    pub fn set_catalogue_by_slug(&self, slug: &str, item: CatalogueItemRecord) {
        self.set_keyed(
            &self.catalogue_by_slug,
            slug.to_string(),
            item,
            "set_catalogue_by_slug",
        );
    }

    pub fn get_catalogue_list(&self, key: &str) -> Option<Vec<CatalogueItemRecord>> {
        self.get_keyed(
            &self.catalogue_lists,
            key,
            CacheTag::Catalogue,
            "get_catalogue_list",
        )
    }

    pub fn set_catalogue_list(&self, key: String, items: Vec<CatalogueItemRecord>) {
        self.set_keyed(&self.catalogue_lists, key, items, "set_catalogue_list");
    }

    pub fn get_fabric_by_slug(&self, slug: &str) -> Option<FabricRecord> {
        self.get_keyed(
            &self.fabrics_by_slug,
            slug,
            CacheTag::Fabrics,
            "get_fabric_by_slug",
        )
    }

    pub fn set_fabric_by_slug(&self, slug: &str, fabric: FabricRecord) {
        self.set_keyed(
            &self.fabrics_by_slug,
            slug.to_string(),
            fabric,
            "set_fabric_by_slug",
        );
    }

    pub fn get_setting(&self, key: &str) -> Option<serde_json::Value> {
        self.get_keyed(&self.settings, key, CacheTag::Settings, "get_setting")
    }

    pub fn set_setting(&self, key: &str, value: serde_json::Value) {
        self.set_keyed(&self.settings, key.to_string(), value, "set_setting");
    }

    // ========================================================================
    // Invalidation
    // ========================================================================

    /// Drop every entry grouped under the tag. Idempotent: invalidating an
    /// already-empty tag is a no-op.
    pub fn invalidate(&self, tag: CacheTag) {
        match tag {
            CacheTag::Catalogue => {
                *rw_write(&self.navigation, SOURCE, "invalidate.navigation") = None;
                rw_write(&self.catalogue_by_slug, SOURCE, "invalidate.catalogue").clear();
                rw_write(&self.catalogue_lists, SOURCE, "invalidate.catalogue_lists").clear();
            }
            CacheTag::Fabrics => {
                *rw_write(&self.fabrics, SOURCE, "invalidate.fabrics") = None;
                rw_write(&self.fabrics_by_slug, SOURCE, "invalidate.fabrics_by_slug").clear();
            }
            CacheTag::Factory => {
                *rw_write(&self.factory_photos, SOURCE, "invalidate.factory_photos") = None;
            }
            CacheTag::Reviews => {
                *rw_write(&self.public_reviews, SOURCE, "invalidate.public_reviews") = None;
            }
            CacheTag::Settings => {
                *rw_write(&self.sections, SOURCE, "invalidate.sections") = None;
                rw_write(&self.settings, SOURCE, "invalidate.settings").clear();
            }
            CacheTag::AboutPage | CacheTag::LegalPage | CacheTag::FactoryPage => {
                if let Some(key) = tag.setting_key() {
                    rw_write(&self.settings, SOURCE, "invalidate.page_setting").pop(key);
                }
            }
        }
        counter!("filato_cache_invalidate_total", "tag" => tag.as_str()).increment(1);
    }

    /// Clear all cached data.
    pub fn clear(&self) {
        for tag in CacheTag::ALL {
            self.invalidate(tag);
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn get_singleton<T: Clone>(
        &self,
        slot: &RwLock<Option<Timed<T>>>,
        tag: CacheTag,
        op: &'static str,
    ) -> Option<T> {
        if !self.enabled {
            return None;
        }
        let guard = rw_read(slot, SOURCE, op);
        match guard.as_ref() {
            Some(entry) if entry.fresh_within(self.ttl) => {
                counter!("filato_cache_hit_total", "tag" => tag.as_str()).increment(1);
                Some(entry.value.clone())
            }
            _ => {
                counter!("filato_cache_miss_total", "tag" => tag.as_str()).increment(1);
                None
            }
        }
    }

    fn set_singleton<T>(&self, slot: &RwLock<Option<Timed<T>>>, value: T, op: &'static str) {
        if !self.enabled {
            return;
        }
        *rw_write(slot, SOURCE, op) = Some(Timed::new(value));
    }

    fn get_keyed<T: Clone>(
        &self,
        slot: &RwLock<LruCache<String, Timed<T>>>,
        key: &str,
        tag: CacheTag,
        op: &'static str,
    ) -> Option<T> {
        if !self.enabled {
            return None;
        }
        let mut guard = rw_write(slot, SOURCE, op);
        match guard.get(key) {
            Some(entry) if entry.fresh_within(self.ttl) => {
                counter!("filato_cache_hit_total", "tag" => tag.as_str()).increment(1);
                Some(entry.value.clone())
            }
            Some(_) => {
                // Expired; evict eagerly so the slot is reused.
                guard.pop(key);
                counter!("filato_cache_miss_total", "tag" => tag.as_str()).increment(1);
                None
            }
            None => {
                counter!("filato_cache_miss_total", "tag" => tag.as_str()).increment(1);
                None
            }
        }
    }

    fn set_keyed<T>(
        &self,
        slot: &RwLock<LruCache<String, Timed<T>>>,
        key: String,
        value: T,
        op: &'static str,
    ) {
        if !self.enabled {
            return;
        }
        rw_write(slot, SOURCE, op).put(key, Timed::new(value));
    }
}
