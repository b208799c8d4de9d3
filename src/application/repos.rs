//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::Date;
use uuid::Uuid;

use crate::application::pagination::{PageRequest, Paged};
use crate::domain::entities::{
    CatalogueImageRecord, CatalogueItemRecord, ClothingTypeRecord, ColorVariantRecord,
    DesignEnquiryRecord, DesignTemplateRecord, EnquiryRecord, FabricRecord, FactoryPhotoRecord,
    ReviewRecord, SiteSectionRecord, SiteSettingRecord,
};
use crate::domain::types::{EnquiryPriority, EnquiryStatus, ReviewStatus};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Clothing types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CreateClothingTypeParams {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub default_moq: i32,
    pub lead_time: String,
    pub size_range: String,
    pub sort_order: i32,
    pub active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateClothingTypeParams {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<Option<String>>,
    pub default_moq: Option<i32>,
    pub lead_time: Option<String>,
    pub size_range: Option<String>,
    pub sort_order: Option<i32>,
    pub active: Option<bool>,
}

#[async_trait]
pub trait ClothingTypesRepo: Send + Sync {
    async fn list_clothing_types(
        &self,
        include_inactive: bool,
    ) -> Result<Vec<ClothingTypeRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ClothingTypeRecord>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ClothingTypeRecord>, RepoError>;

    async fn create_clothing_type(
        &self,
        params: CreateClothingTypeParams,
    ) -> Result<ClothingTypeRecord, RepoError>;

    /// Partial patch; `Ok(None)` when the target row does not exist.
    async fn update_clothing_type(
        &self,
        id: Uuid,
        params: UpdateClothingTypeParams,
    ) -> Result<Option<ClothingTypeRecord>, RepoError>;

    async fn delete_clothing_type(&self, id: Uuid) -> Result<bool, RepoError>;
}

// ---------------------------------------------------------------------------
// Fabrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CreateFabricParams {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub composition: String,
    pub weight_gsm: Option<i32>,
    pub properties: serde_json::Value,
    pub image_url: Option<String>,
    pub sort_order: i32,
    pub active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateFabricParams {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub composition: Option<String>,
    pub weight_gsm: Option<Option<i32>>,
    pub properties: Option<serde_json::Value>,
    pub image_url: Option<Option<String>>,
    pub sort_order: Option<i32>,
    pub active: Option<bool>,
}

#[async_trait]
pub trait FabricsRepo: Send + Sync {
    async fn list_fabrics(&self, include_inactive: bool) -> Result<Vec<FabricRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FabricRecord>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<FabricRecord>, RepoError>;

    async fn create_fabric(&self, params: CreateFabricParams) -> Result<FabricRecord, RepoError>;

    async fn update_fabric(
        &self,
        id: Uuid,
        params: UpdateFabricParams,
    ) -> Result<Option<FabricRecord>, RepoError>;

    async fn delete_fabric(&self, id: Uuid) -> Result<bool, RepoError>;
}

// ---------------------------------------------------------------------------
// Catalogue items
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct CatalogueQueryFilter {
    pub clothing_type_id: Option<Uuid>,
    pub customizable: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct CreateCatalogueItemParams {
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
}

#[derive(Debug, Clone, Default)]
pub struct UpdateCatalogueItemParams {
    pub clothing_type_id: Option<Uuid>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub moq: Option<i32>,
    pub lead_time: Option<String>,
    pub size_range: Option<String>,
    pub fabric_ids: Option<Vec<Uuid>>,
    pub features: Option<Vec<String>>,
    pub specifications: Option<serde_json::Value>,
    pub customizable: Option<bool>,
}

/// Desired state of one catalogue image; side-table writes are replace-all,
/// so callers pass the complete target list.
#[derive(Debug, Clone)]
pub struct CatalogueImageParams {
    pub url: String,
    pub alt_text: Option<String>,
    pub sort_order: i32,
    pub is_primary: bool,
}

#[derive(Debug, Clone)]
pub struct ColorVariantParams {
    pub name: String,
    pub hex: String,
    pub front_image_url: Option<String>,
    pub back_image_url: Option<String>,
    pub side_image_url: Option<String>,
    pub sort_order: i32,
}

#[async_trait]
pub trait CatalogueRepo: Send + Sync {
    async fn list_catalogue_items(
        &self,
        filter: &CatalogueQueryFilter,
    ) -> Result<Vec<CatalogueItemRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CatalogueItemRecord>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CatalogueItemRecord>, RepoError>;

    async fn create_catalogue_item(
        &self,
        params: CreateCatalogueItemParams,
    ) -> Result<CatalogueItemRecord, RepoError>;

    async fn update_catalogue_item(
        &self,
        id: Uuid,
        params: UpdateCatalogueItemParams,
    ) -> Result<Option<CatalogueItemRecord>, RepoError>;

    async fn delete_catalogue_item(&self, id: Uuid) -> Result<bool, RepoError>;

    /// Replace the full image list for an item. `Ok(None)` when the item is
    /// missing; otherwise returns the stored list in order.
    async fn replace_images(
        &self,
        item_id: Uuid,
        images: Vec<CatalogueImageParams>,
    ) -> Result<Option<Vec<CatalogueImageRecord>>, RepoError>;

    /// Replace the full color-variant list for an item.
    async fn replace_colors(
        &self,
        item_id: Uuid,
        colors: Vec<ColorVariantParams>,
    ) -> Result<Option<Vec<ColorVariantRecord>>, RepoError>;
}

// ---------------------------------------------------------------------------
// Factory photos
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CreateFactoryPhotoParams {
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    pub category: String,
    pub sort_order: i32,
    pub active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateFactoryPhotoParams {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub sort_order: Option<i32>,
    pub active: Option<bool>,
}

#[async_trait]
pub trait FactoryPhotosRepo: Send + Sync {
    async fn list_factory_photos(
        &self,
        include_inactive: bool,
        category: Option<&str>,
    ) -> Result<Vec<FactoryPhotoRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FactoryPhotoRecord>, RepoError>;

    async fn create_factory_photo(
        &self,
        params: CreateFactoryPhotoParams,
    ) -> Result<FactoryPhotoRecord, RepoError>;

    async fn update_factory_photo(
        &self,
        id: Uuid,
        params: UpdateFactoryPhotoParams,
    ) -> Result<Option<FactoryPhotoRecord>, RepoError>;

    async fn delete_factory_photo(&self, id: Uuid) -> Result<bool, RepoError>;
}

// ---------------------------------------------------------------------------
// Design templates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CreateDesignTemplateParams {
    pub name: String,
    pub hex: String,
    pub front_image_url: String,
    pub back_image_url: String,
    pub side_image_url: String,
    pub active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateDesignTemplateParams {
    pub name: Option<String>,
    pub hex: Option<String>,
    pub front_image_url: Option<String>,
    pub back_image_url: Option<String>,
    pub side_image_url: Option<String>,
    pub active: Option<bool>,
}

#[async_trait]
pub trait DesignTemplatesRepo: Send + Sync {
    async fn list_design_templates(
        &self,
        include_inactive: bool,
    ) -> Result<Vec<DesignTemplateRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DesignTemplateRecord>, RepoError>;

    async fn create_design_template(
        &self,
        params: CreateDesignTemplateParams,
    ) -> Result<DesignTemplateRecord, RepoError>;

    async fn update_design_template(
        &self,
        id: Uuid,
        params: UpdateDesignTemplateParams,
    ) -> Result<Option<DesignTemplateRecord>, RepoError>;

    async fn delete_design_template(&self, id: Uuid) -> Result<bool, RepoError>;
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ReviewQueryFilter {
    pub status: Option<ReviewStatus>,
}

#[derive(Debug, Clone)]
pub struct CreateReviewParams {
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub rating: i16,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateReviewParams {
    pub status: Option<ReviewStatus>,
    pub is_visible: Option<bool>,
}

#[async_trait]
pub trait ReviewsRepo: Send + Sync {
    /// Reviews eligible for public pages: status approved AND visible.
    async fn list_public_reviews(&self) -> Result<Vec<ReviewRecord>, RepoError>;

    async fn list_reviews(
        &self,
        filter: &ReviewQueryFilter,
        page: PageRequest,
    ) -> Result<Paged<ReviewRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ReviewRecord>, RepoError>;

    async fn create_review(&self, params: CreateReviewParams) -> Result<ReviewRecord, RepoError>;

    async fn update_review(
        &self,
        id: Uuid,
        params: UpdateReviewParams,
    ) -> Result<Option<ReviewRecord>, RepoError>;

    async fn delete_review(&self, id: Uuid) -> Result<bool, RepoError>;
}

// ---------------------------------------------------------------------------
// Enquiries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct EnquiryQueryFilter {
    pub status: Option<EnquiryStatus>,
    pub priority: Option<EnquiryPriority>,
    /// Case-insensitive substring match over name/company/email/phone.
    pub search: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateEnquiryParams {
    pub clothing_type_id: Option<Uuid>,
    pub fabric_id: Option<Uuid>,
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
    pub priority: EnquiryPriority,
    pub deadline: Option<Date>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEnquiryParams {
    pub status: Option<EnquiryStatus>,
    pub priority: Option<EnquiryPriority>,
    /// `Some(None)` clears the deadline; `None` leaves it untouched.
    pub deadline: Option<Option<Date>>,
    pub admin_notes: Option<Option<String>>,
}

/// Grouped enquiry counts reshaped into named totals; statuses with no rows
/// default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct EnquiryStats {
    pub total: u64,
    pub pending: u64,
    pub contacted: u64,
    pub quoted: u64,
    pub closed: u64,
}

impl EnquiryStats {
    pub fn from_counts(counts: &[(EnquiryStatus, u64)]) -> Self {
        let mut stats = EnquiryStats::default();
        for (status, count) in counts {
            stats.total += count;
            match status {
                EnquiryStatus::Pending => stats.pending += count,
                EnquiryStatus::Contacted => stats.contacted += count,
                EnquiryStatus::Quoted => stats.quoted += count,
                EnquiryStatus::Closed => stats.closed += count,
            }
        }
        stats
    }
}

#[async_trait]
pub trait EnquiriesRepo: Send + Sync {
    async fn create_enquiry(&self, params: CreateEnquiryParams)
    -> Result<EnquiryRecord, RepoError>;

    async fn list_enquiries(
        &self,
        filter: &EnquiryQueryFilter,
        page: PageRequest,
    ) -> Result<Paged<EnquiryRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<EnquiryRecord>, RepoError>;

    async fn update_enquiry(
        &self,
        id: Uuid,
        params: UpdateEnquiryParams,
    ) -> Result<Option<EnquiryRecord>, RepoError>;

    async fn delete_enquiry(&self, id: Uuid) -> Result<bool, RepoError>;

    async fn delete_all_enquiries(&self) -> Result<u64, RepoError>;

    async fn status_counts(&self) -> Result<Vec<(EnquiryStatus, u64)>, RepoError>;
}

// ---------------------------------------------------------------------------
// Design enquiries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CreateDesignEnquiryParams {
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
    pub priority: EnquiryPriority,
    pub deadline: Option<Date>,
}

#[async_trait]
pub trait DesignEnquiriesRepo: Send + Sync {
    async fn create_design_enquiry(
        &self,
        params: CreateDesignEnquiryParams,
    ) -> Result<DesignEnquiryRecord, RepoError>;

    async fn list_design_enquiries(
        &self,
        filter: &EnquiryQueryFilter,
        page: PageRequest,
    ) -> Result<Paged<DesignEnquiryRecord>, RepoError>;

    /// Every stored design enquiry; used for media cleanup before bulk delete.
    async fn list_all_design_enquiries(&self) -> Result<Vec<DesignEnquiryRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DesignEnquiryRecord>, RepoError>;

    async fn update_design_enquiry(
        &self,
        id: Uuid,
        params: UpdateEnquiryParams,
    ) -> Result<Option<DesignEnquiryRecord>, RepoError>;

    async fn delete_design_enquiry(&self, id: Uuid) -> Result<bool, RepoError>;

    async fn delete_all_design_enquiries(&self) -> Result<u64, RepoError>;

    async fn status_counts(&self) -> Result<Vec<(EnquiryStatus, u64)>, RepoError>;
}

// ---------------------------------------------------------------------------
// Settings and sections
// ---------------------------------------------------------------------------

#[async_trait]
pub trait SettingsRepo: Send + Sync {
    async fn get_setting(&self, key: &str) -> Result<Option<SiteSettingRecord>, RepoError>;

    async fn upsert_setting(
        &self,
        key: &str,
        value: serde_json::Value,
    ) -> Result<SiteSettingRecord, RepoError>;

    async fn list_sections(&self, visible_only: bool) -> Result<Vec<SiteSectionRecord>, RepoError>;

    async fn get_section(&self, key: &str) -> Result<Option<SiteSectionRecord>, RepoError>;

    async fn upsert_section(
        &self,
        key: &str,
        value: serde_json::Value,
        visible: bool,
        sort_order: i32,
    ) -> Result<SiteSectionRecord, RepoError>;

    async fn delete_section(&self, key: &str) -> Result<bool, RepoError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_default_missing_statuses_to_zero() {
        let stats = EnquiryStats::from_counts(&[
            (EnquiryStatus::Pending, 4),
            (EnquiryStatus::Closed, 1),
        ]);
        assert_eq!(
            stats,
            EnquiryStats {
                total: 5,
                pending: 4,
                contacted: 0,
                quoted: 0,
                closed: 1,
            }
        );
    }
}
