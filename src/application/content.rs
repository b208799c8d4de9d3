//! Site settings and homepage sections, with defaults for the keys public
//! pages always expect.

use std::sync::Arc;

use serde_json::json;

use crate::application::error::AppError;
use crate::application::repos::SettingsRepo;
use crate::cache::ContentCache;
use crate::domain::entities::SiteSectionRecord;
use crate::domain::error::DomainError;

pub const SETTING_CURRENT_OFFER: &str = "current_offer";
pub const SETTING_ABOUT_PAGE: &str = "about_page";
pub const SETTING_LEGAL_PAGE: &str = "legal_page";
pub const SETTING_FACTORY_PAGE: &str = "factory_page";

/// Baseline value served when a well-known key has never been written.
/// Unknown keys have no default and read as not found.
pub fn default_setting(key: &str) -> Option<serde_json::Value> {
    match key {
        SETTING_CURRENT_OFFER => Some(json!({
            "enabled": false,
            "text": "",
            "discount_percent": 0,
        })),
        SETTING_ABOUT_PAGE | SETTING_LEGAL_PAGE | SETTING_FACTORY_PAGE => Some(json!({
            "title": "",
            "content": "",
        })),
        _ => None,
    }
}

pub struct ContentService {
    settings: Arc<dyn SettingsRepo>,
    cache: Arc<ContentCache>,
}

impl ContentService {
    pub fn new(settings: Arc<dyn SettingsRepo>, cache: Arc<ContentCache>) -> Self {
        Self { settings, cache }
    }

    /// Read one setting. Stored values are cached; synthesized defaults are
    /// not, so the first real write is picked up immediately.
    pub async fn setting(&self, key: &str) -> Result<serde_json::Value, AppError> {
        if let Some(cached) = self.cache.get_setting(key) {
            return Ok(cached);
        }
        match self.settings.get_setting(key).await? {
            Some(record) => {
                self.cache.set_setting(key, record.value.clone());
                Ok(record.value)
            }
            None => default_setting(key).ok_or_else(|| DomainError::not_found("setting").into()),
        }
    }

    /// Visible homepage sections in sort order.
    pub async fn visible_sections(&self) -> Result<Vec<SiteSectionRecord>, AppError> {
        if let Some(cached) = self.cache.get_sections() {
            return Ok(cached);
        }
        let sections = self.settings.list_sections(true).await?;
        self.cache.set_sections(sections.clone());
        Ok(sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys_have_defaults() {
        assert!(default_setting(SETTING_CURRENT_OFFER).is_some());
        assert!(default_setting(SETTING_ABOUT_PAGE).is_some());
        assert!(default_setting(SETTING_LEGAL_PAGE).is_some());
        assert!(default_setting(SETTING_FACTORY_PAGE).is_some());
    }

    #[test]
    fn unknown_keys_have_no_default() {
        assert!(default_setting("promo_banner_v2").is_none());
    }

    #[test]
    fn current_offer_default_is_disabled() {
        let value = default_setting(SETTING_CURRENT_OFFER).expect("default");
        assert_eq!(value["enabled"], serde_json::Value::Bool(false));
    }
}
