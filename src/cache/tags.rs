use serde::{Deserialize, Serialize};

/// Invalidation tags, each tied to the public read paths it gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheTag {
    Catalogue,
    Fabrics,
    Factory,
    Settings,
    Reviews,
    AboutPage,
    LegalPage,
    FactoryPage,
}

impl CacheTag {
    pub const ALL: [CacheTag; 8] = [
        CacheTag::Catalogue,
        CacheTag::Fabrics,
        CacheTag::Factory,
        CacheTag::Settings,
        CacheTag::Reviews,
        CacheTag::AboutPage,
        CacheTag::LegalPage,
        CacheTag::FactoryPage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CacheTag::Catalogue => "catalogue",
            CacheTag::Fabrics => "fabrics",
            CacheTag::Factory => "factory",
            CacheTag::Settings => "settings",
            CacheTag::Reviews => "reviews",
            CacheTag::AboutPage => "about-page",
            CacheTag::LegalPage => "legal-page",
            CacheTag::FactoryPage => "factory-page",
        }
    }

    /// The setting key a page tag gates, when it maps onto one.
    pub fn setting_key(self) -> Option<&'static str> {
        match self {
            CacheTag::AboutPage => Some("about_page"),
            CacheTag::LegalPage => Some("legal_page"),
            CacheTag::FactoryPage => Some("factory_page"),
            _ => None,
        }
    }
}
