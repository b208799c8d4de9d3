//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::domain::types::{EnquiryPriority, EnquiryStatus, ReviewStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClothingTypeRecord {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub default_moq: i32,
    pub lead_time: String,
    pub size_range: String,
    pub sort_order: i32,
    pub active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FabricRecord {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub composition: String,
    pub weight_gsm: Option<i32>,
    /// Boolean property map, e.g. `{"breathable": true, "stretchable": false}`.
    pub properties: serde_json::Value,
    pub image_url: Option<String>,
    pub sort_order: i32,
    pub active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogueItemRecord {
    pub id: Uuid,
    pub clothing_type_id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub moq: i32,
    pub lead_time: String,
    pub size_range: String,
    pub fabric_ids: Vec<Uuid>,
    pub features: Vec<String>,
    pub specifications: serde_json::Value,
    pub customizable: bool,
    pub images: Vec<CatalogueImageRecord>,
    pub colors: Vec<ColorVariantRecord>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// One image attached to a catalogue item. Exactly one image per item carries
/// `is_primary`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogueImageRecord {
    pub id: Uuid,
    pub catalogue_item_id: Uuid,
    pub url: String,
    pub alt_text: Option<String>,
    pub sort_order: i32,
    pub is_primary: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorVariantRecord {
    pub id: Uuid,
    pub catalogue_item_id: Uuid,
    pub name: String,
    pub hex: String,
    pub front_image_url: Option<String>,
    pub back_image_url: Option<String>,
    pub side_image_url: Option<String>,
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactoryPhotoRecord {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    pub category: String,
    pub sort_order: i32,
    pub active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesignTemplateRecord {
    pub id: Uuid,
    pub name: String,
    pub hex: String,
    pub front_image_url: String,
    pub back_image_url: String,
    pub side_image_url: String,
    pub active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewRecord {
    pub id: Uuid,
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub rating: i16,
    pub message: String,
    pub status: ReviewStatus,
    pub is_visible: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl ReviewRecord {
    /// Only approved reviews that are also toggled visible reach public pages.
    pub fn is_public(&self) -> bool {
        self.status == ReviewStatus::Approved && self.is_visible
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnquiryRecord {
    pub id: Uuid,
    pub clothing_type_id: Option<Uuid>,
    pub fabric_id: Option<Uuid>,
    /// Display names snapshotted at creation so later catalogue renames do
    /// not rewrite enquiry history.
    pub clothing_type_name: String,
    pub fabric_name: String,
    pub name: String,
    pub company: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub quantity: i32,
    pub is_sample_request: bool,
    pub size_range: Option<String>,
    pub notes: Option<String>,
    pub status: EnquiryStatus,
    pub priority: EnquiryPriority,
    pub deadline: Option<Date>,
    pub admin_notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesignEnquiryRecord {
    pub id: Uuid,
    pub fabric_id: Option<Uuid>,
    pub fabric_name: String,
    pub print_type: String,
    pub name: String,
    pub company: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub quantity: i32,
    pub front_image_url: String,
    pub back_image_url: String,
    pub side_image_url: String,
    pub logo_urls: Vec<String>,
    pub notes: Option<String>,
    pub status: EnquiryStatus,
    pub priority: EnquiryPriority,
    pub deadline: Option<Date>,
    pub admin_notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl DesignEnquiryRecord {
    /// Every stored image URL associated with this enquiry, in the order they
    /// are purged from media storage on delete.
    pub fn image_urls(&self) -> Vec<&str> {
        let mut urls = vec![
            self.front_image_url.as_str(),
            self.back_image_url.as_str(),
            self.side_image_url.as_str(),
        ];
        urls.extend(self.logo_urls.iter().map(String::as_str));
        urls
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteSettingRecord {
    pub key: String,
    pub value: serde_json::Value,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteSectionRecord {
    pub key: String,
    pub value: serde_json::Value,
    pub visible: bool,
    pub sort_order: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
