//! Request/response bodies for the JSON API.
//!
//! Every handler answers with the uniform envelope
//! `{success, data?, error?, pagination?}`. Request bodies are validated
//! before any service or repository call; partial-update bodies distinguish
//! "field absent" from "field set to null" with a double `Option`.

use axum::Json;
use axum::http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};
use time::Date;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::application::enquiries::{NewDesignEnquiry, NewEnquiry};
use crate::application::pagination::{PageRequest, Paged};
use crate::application::repos::{
    CatalogueImageParams, CatalogueQueryFilter, ColorVariantParams, CreateCatalogueItemParams,
    CreateClothingTypeParams, CreateDesignTemplateParams, CreateFabricParams,
    CreateFactoryPhotoParams, CreateReviewParams, EnquiryQueryFilter, ReviewQueryFilter,
    UpdateCatalogueItemParams, UpdateClothingTypeParams, UpdateDesignTemplateParams,
    UpdateEnquiryParams, UpdateFabricParams, UpdateFactoryPhotoParams, UpdateReviewParams,
};
use crate::domain::types::{EnquiryPriority, EnquiryStatus, ReviewStatus};
use crate::infra::http::api::error::ApiErrorMessage;

/// Distinguishes an omitted field from an explicit `null` in patch bodies.
/// Use together with `#[serde(default)]`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct PageInfo {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageInfo>,
}

pub fn data_response<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data: Some(data),
        error: None,
        pagination: None,
    })
}

pub fn created_response<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::CREATED, data_response(data))
}

pub fn paged_response<T: Serialize>(paged: Paged<T>) -> Json<Envelope<Vec<T>>> {
    let pagination = PageInfo {
        page: paged.page,
        limit: paged.limit,
        total: paged.total,
        total_pages: paged.total_pages,
    };
    Json(Envelope {
        success: true,
        data: Some(paged.items),
        error: None,
        pagination: Some(pagination),
    })
}

pub fn empty_response() -> Json<Envelope<()>> {
    Json(Envelope {
        success: true,
        data: None,
        error: None,
        pagination: None,
    })
}

/// Body of bulk-delete responses.
#[derive(Debug, Serialize)]
pub struct BulkDeleted {
    pub deleted: u64,
}

// ---------------------------------------------------------------------------
// Shared query parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogueListQuery {
    pub clothing_type: Option<Uuid>,
    pub customizable: Option<bool>,
}

impl CatalogueListQuery {
    pub fn filter(&self) -> CatalogueQueryFilter {
        CatalogueQueryFilter {
            clothing_type_id: self.clothing_type,
            customizable: self.customizable,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FactoryPhotoListQuery {
    pub category: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct SectionListQuery {
    #[serde(default)]
    pub include_hidden: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewListQuery {
    pub status: Option<ReviewStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ReviewListQuery {
    pub fn filter(&self) -> ReviewQueryFilter {
        ReviewQueryFilter {
            status: self.status,
        }
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EnquiryListQuery {
    pub status: Option<EnquiryStatus>,
    pub priority: Option<EnquiryPriority>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl EnquiryListQuery {
    pub fn filter(&self) -> EnquiryQueryFilter {
        EnquiryQueryFilter {
            status: self.status,
            priority: self.priority,
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|term| !term.is_empty())
                .map(ToString::to_string),
        }
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

// ---------------------------------------------------------------------------
// Clothing types
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}

fn default_moq() -> i32 {
    50
}

fn default_json_object() -> serde_json::Value {
    serde_json::json!({})
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClothingTypeRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 200))]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    pub image_url: Option<String>,
    #[serde(default = "default_moq")]
    #[validate(range(min = 1))]
    pub default_moq: i32,
    #[serde(default)]
    pub lead_time: String,
    #[serde(default)]
    pub size_range: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl CreateClothingTypeRequest {
    pub fn into_params(self, slug: String) -> CreateClothingTypeParams {
        CreateClothingTypeParams {
            slug,
            name: self.name,
            description: self.description,
            image_url: self.image_url,
            default_moq: self.default_moq,
            lead_time: self.lead_time,
            size_range: self.size_range,
            sort_order: self.sort_order,
            active: self.active,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateClothingTypeRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub slug: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
    #[validate(range(min = 1))]
    pub default_moq: Option<i32>,
    pub lead_time: Option<String>,
    pub size_range: Option<String>,
    pub sort_order: Option<i32>,
    pub active: Option<bool>,
}

impl UpdateClothingTypeRequest {
    pub fn into_params(self, slug: Option<String>) -> UpdateClothingTypeParams {
        UpdateClothingTypeParams {
            name: self.name,
            slug,
            description: self.description,
            image_url: self.image_url,
            default_moq: self.default_moq,
            lead_time: self.lead_time,
            size_range: self.size_range,
            sort_order: self.sort_order,
            active: self.active,
        }
    }
}

// ---------------------------------------------------------------------------
// Fabrics
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFabricRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 200))]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub composition: String,
    #[validate(range(min = 1))]
    pub weight_gsm: Option<i32>,
    #[serde(default = "default_json_object")]
    pub properties: serde_json::Value,
    pub image_url: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl CreateFabricRequest {
    pub fn into_params(self, slug: String) -> CreateFabricParams {
        CreateFabricParams {
            slug,
            name: self.name,
            description: self.description,
            composition: self.composition,
            weight_gsm: self.weight_gsm,
            properties: self.properties,
            image_url: self.image_url,
            sort_order: self.sort_order,
            active: self.active,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateFabricRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub slug: Option<String>,
    pub description: Option<String>,
    pub composition: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub weight_gsm: Option<Option<i32>>,
    pub properties: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
    pub sort_order: Option<i32>,
    pub active: Option<bool>,
}

impl UpdateFabricRequest {
    pub fn into_params(self, slug: Option<String>) -> UpdateFabricParams {
        UpdateFabricParams {
            name: self.name,
            slug,
            description: self.description,
            composition: self.composition,
            weight_gsm: self.weight_gsm,
            properties: self.properties,
            image_url: self.image_url,
            sort_order: self.sort_order,
            active: self.active,
        }
    }
}

// ---------------------------------------------------------------------------
// Catalogue items and their nested images/colors
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCatalogueItemRequest {
    pub clothing_type_id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 200))]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_moq")]
    #[validate(range(min = 1))]
    pub moq: i32,
    #[serde(default)]
    pub lead_time: String,
    #[serde(default)]
    pub size_range: String,
    #[serde(default)]
    pub fabric_ids: Vec<Uuid>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default = "default_json_object")]
    pub specifications: serde_json::Value,
    #[serde(default)]
    pub customizable: bool,
}

impl CreateCatalogueItemRequest {
    pub fn into_params(self, slug: String) -> CreateCatalogueItemParams {
        CreateCatalogueItemParams {
            clothing_type_id: self.clothing_type_id,
            slug,
            name: self.name,
            description: self.description,
            moq: self.moq,
            lead_time: self.lead_time,
            size_range: self.size_range,
            fabric_ids: self.fabric_ids,
            features: self.features,
            specifications: self.specifications,
            customizable: self.customizable,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCatalogueItemRequest {
    pub clothing_type_id: Option<Uuid>,
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub slug: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub moq: Option<i32>,
    pub lead_time: Option<String>,
    pub size_range: Option<String>,
    pub fabric_ids: Option<Vec<Uuid>>,
    pub features: Option<Vec<String>>,
    pub specifications: Option<serde_json::Value>,
    pub customizable: Option<bool>,
}

impl UpdateCatalogueItemRequest {
    pub fn into_params(self, slug: Option<String>) -> UpdateCatalogueItemParams {
        UpdateCatalogueItemParams {
            clothing_type_id: self.clothing_type_id,
            name: self.name,
            slug,
            description: self.description,
            moq: self.moq,
            lead_time: self.lead_time,
            size_range: self.size_range,
            fabric_ids: self.fabric_ids,
            features: self.features,
            specifications: self.specifications,
            customizable: self.customizable,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CatalogueImageRequest {
    #[validate(length(min = 1, max = 2048))]
    pub url: String,
    pub alt_text: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub is_primary: bool,
}

impl From<CatalogueImageRequest> for CatalogueImageParams {
    fn from(request: CatalogueImageRequest) -> Self {
        Self {
            url: request.url,
            alt_text: request.alt_text,
            sort_order: request.sort_order,
            is_primary: request.is_primary,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReplaceImagesRequest {
    #[validate(nested, custom(function = "single_primary_image"))]
    pub images: Vec<CatalogueImageRequest>,
}

/// A non-empty image list must flag exactly one image as primary.
fn single_primary_image(images: &[CatalogueImageRequest]) -> Result<(), ValidationError> {
    let primaries = images.iter().filter(|image| image.is_primary).count();
    if images.is_empty() || primaries == 1 {
        Ok(())
    } else {
        let mut error = ValidationError::new("single_primary");
        error.message = Some("exactly one image must be marked primary".into());
        Err(error)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ColorVariantRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 4, max = 9))]
    pub hex: String,
    pub front_image_url: Option<String>,
    pub back_image_url: Option<String>,
    pub side_image_url: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

impl From<ColorVariantRequest> for ColorVariantParams {
    fn from(request: ColorVariantRequest) -> Self {
        Self {
            name: request.name,
            hex: request.hex,
            front_image_url: request.front_image_url,
            back_image_url: request.back_image_url,
            side_image_url: request.side_image_url,
            sort_order: request.sort_order,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReplaceColorsRequest {
    #[validate(nested)]
    pub colors: Vec<ColorVariantRequest>,
}

// ---------------------------------------------------------------------------
// Factory photos and design templates
// ---------------------------------------------------------------------------

fn default_category() -> String {
    "general".to_string()
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFactoryPhotoRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 2048))]
    pub image_url: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl From<CreateFactoryPhotoRequest> for CreateFactoryPhotoParams {
    fn from(request: CreateFactoryPhotoRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            image_url: request.image_url,
            category: request.category,
            sort_order: request.sort_order,
            active: request.active,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateFactoryPhotoRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[validate(length(min = 1, max = 2048))]
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub sort_order: Option<i32>,
    pub active: Option<bool>,
}

impl From<UpdateFactoryPhotoRequest> for UpdateFactoryPhotoParams {
    fn from(request: UpdateFactoryPhotoRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            image_url: request.image_url,
            category: request.category,
            sort_order: request.sort_order,
            active: request.active,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDesignTemplateRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 4, max = 9))]
    pub hex: String,
    #[validate(length(min = 1, max = 2048))]
    pub front_image_url: String,
    #[validate(length(min = 1, max = 2048))]
    pub back_image_url: String,
    #[validate(length(min = 1, max = 2048))]
    pub side_image_url: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl From<CreateDesignTemplateRequest> for CreateDesignTemplateParams {
    fn from(request: CreateDesignTemplateRequest) -> Self {
        Self {
            name: request.name,
            hex: request.hex,
            front_image_url: request.front_image_url,
            back_image_url: request.back_image_url,
            side_image_url: request.side_image_url,
            active: request.active,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateDesignTemplateRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 4, max = 9))]
    pub hex: Option<String>,
    pub front_image_url: Option<String>,
    pub back_image_url: Option<String>,
    pub side_image_url: Option<String>,
    pub active: Option<bool>,
}

impl From<UpdateDesignTemplateRequest> for UpdateDesignTemplateParams {
    fn from(request: UpdateDesignTemplateRequest) -> Self {
        Self {
            name: request.name,
            hex: request.hex,
            front_image_url: request.front_image_url,
            back_image_url: request.back_image_url,
            side_image_url: request.side_image_url,
            active: request.active,
        }
    }
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub company: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub rating: i16,
    #[validate(length(min = 1, max = 4000))]
    pub message: String,
}

impl From<CreateReviewRequest> for CreateReviewParams {
    fn from(request: CreateReviewRequest) -> Self {
        Self {
            name: request.name,
            company: request.company,
            email: request.email,
            rating: request.rating,
            message: request.message,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ModerateReviewRequest {
    pub status: Option<ReviewStatus>,
    pub is_visible: Option<bool>,
}

impl From<ModerateReviewRequest> for UpdateReviewParams {
    fn from(request: ModerateReviewRequest) -> Self {
        Self {
            status: request.status,
            is_visible: request.is_visible,
        }
    }
}

// ---------------------------------------------------------------------------
// Enquiries
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEnquiryRequest {
    pub clothing_type_id: Option<Uuid>,
    pub fabric_id: Option<Uuid>,
    pub clothing_type_name: Option<String>,
    pub fabric_name: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub company: Option<String>,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    /// Zero is legal: sample requests carry no production quantity.
    #[serde(default)]
    #[validate(range(min = 0))]
    pub quantity: i32,
    #[serde(default)]
    pub is_sample_request: bool,
    pub size_range: Option<String>,
    pub notes: Option<String>,
    pub priority: Option<EnquiryPriority>,
    pub deadline: Option<Date>,
}

impl From<CreateEnquiryRequest> for NewEnquiry {
    fn from(request: CreateEnquiryRequest) -> Self {
        Self {
            clothing_type_id: request.clothing_type_id,
            fabric_id: request.fabric_id,
            clothing_type_name: request.clothing_type_name,
            fabric_name: request.fabric_name,
            name: request.name,
            company: request.company,
            email: request.email,
            phone: request.phone,
            quantity: request.quantity,
            is_sample_request: request.is_sample_request,
            size_range: request.size_range,
            notes: request.notes,
            priority: request.priority,
            deadline: request.deadline,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDesignEnquiryRequest {
    pub fabric_id: Option<Uuid>,
    pub fabric_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub print_type: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub company: Option<String>,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    /// Design runs always carry a production quantity; samples go through
    /// the standard enquiry form instead.
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[validate(length(min = 1, max = 2048))]
    pub front_image_url: String,
    #[validate(length(min = 1, max = 2048))]
    pub back_image_url: String,
    #[validate(length(min = 1, max = 2048))]
    pub side_image_url: String,
    #[serde(default, deserialize_with = "one_or_many_urls")]
    pub logo_urls: Vec<String>,
    pub notes: Option<String>,
    pub priority: Option<EnquiryPriority>,
    pub deadline: Option<Date>,
}

/// Logo artwork arrives as a JSON array of URLs, one bare URL, or a string
/// holding a JSON-encoded array (older client form posts).
fn one_or_many_urls<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawUrls {
        Many(Vec<String>),
        One(String),
    }

    match RawUrls::deserialize(deserializer)? {
        RawUrls::Many(urls) => Ok(urls),
        RawUrls::One(raw) => {
            let trimmed = raw.trim();
            if trimmed.starts_with('[') {
                serde_json::from_str(trimmed).map_err(serde::de::Error::custom)
            } else {
                Ok(vec![raw])
            }
        }
    }
}

impl From<CreateDesignEnquiryRequest> for NewDesignEnquiry {
    fn from(request: CreateDesignEnquiryRequest) -> Self {
        Self {
            fabric_id: request.fabric_id,
            fabric_name: request.fabric_name,
            print_type: request.print_type,
            name: request.name,
            company: request.company,
            email: request.email,
            phone: request.phone,
            quantity: request.quantity,
            front_image_url: request.front_image_url,
            back_image_url: request.back_image_url,
            side_image_url: request.side_image_url,
            logo_urls: request.logo_urls,
            notes: request.notes,
            priority: request.priority,
            deadline: request.deadline,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateEnquiryRequest {
    pub status: Option<EnquiryStatus>,
    pub priority: Option<EnquiryPriority>,
    #[serde(default, deserialize_with = "double_option")]
    pub deadline: Option<Option<Date>>,
    #[serde(default, deserialize_with = "double_option")]
    pub admin_notes: Option<Option<String>>,
}

impl From<UpdateEnquiryRequest> for UpdateEnquiryParams {
    fn from(request: UpdateEnquiryRequest) -> Self {
        Self {
            status: request.status,
            priority: request.priority,
            deadline: request.deadline,
            admin_notes: request.admin_notes,
        }
    }
}

// ---------------------------------------------------------------------------
// Settings and sections
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct UpsertSettingRequest {
    pub value: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct UpsertSectionRequest {
    pub value: serde_json::Value,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub sort_order: i32,
}

// ---------------------------------------------------------------------------
// Uploads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadKind {
    Image,
    Logo,
}

#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    pub kind: Option<UploadKind>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub stored_path: String,
    pub checksum: String,
    pub size_bytes: i64,
}
