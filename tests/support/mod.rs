#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tower::ServiceExt;
use uuid::Uuid;

use filato::application::catalogue::CatalogueReadService;
use filato::application::content::ContentService;
use filato::application::enquiries::{DesignEnquiryService, EnquiryService};
use filato::application::media::{MediaDeleteError, MediaPurge};
use filato::application::notify::{EnquiryNotification, Notifier, NotifyError};
use filato::application::pagination::{PageRequest, Paged};
use filato::application::repos::{
    CatalogueImageParams, CatalogueQueryFilter, CatalogueRepo, ClothingTypesRepo,
    ColorVariantParams, CreateCatalogueItemParams, CreateClothingTypeParams,
    CreateDesignEnquiryParams, CreateDesignTemplateParams, CreateEnquiryParams,
    CreateFabricParams, CreateFactoryPhotoParams, CreateReviewParams, DesignEnquiriesRepo,
    DesignTemplatesRepo, EnquiriesRepo, EnquiryQueryFilter, FabricsRepo, FactoryPhotosRepo,
    RepoError, ReviewQueryFilter, ReviewsRepo, SettingsRepo, UpdateCatalogueItemParams,
    UpdateClothingTypeParams, UpdateDesignTemplateParams, UpdateEnquiryParams, UpdateFabricParams,
    UpdateFactoryPhotoParams, UpdateReviewParams,
};
use filato::application::reviews::ReviewService;
use filato::cache::{CacheConfig, CacheTrigger, ContentCache};
use filato::config::MediaSettings;
use filato::domain::entities::{
    CatalogueImageRecord, CatalogueItemRecord, ClothingTypeRecord, ColorVariantRecord,
    DesignEnquiryRecord, DesignTemplateRecord, EnquiryRecord, FabricRecord, FactoryPhotoRecord,
    ReviewRecord, SiteSectionRecord, SiteSettingRecord,
};
use filato::domain::types::{EnquiryPriority, EnquiryStatus, ReviewStatus};
use filato::infra::http::api::state::{ApiState, HealthProbe};
use filato::infra::http::build_api_router;
use filato::infra::media::MediaStorage;

fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

// ---------------------------------------------------------------------------
// In-memory repositories
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryStore {
    pub clothing_types: Mutex<Vec<ClothingTypeRecord>>,
    pub fabrics: Mutex<Vec<FabricRecord>>,
    pub catalogue: Mutex<Vec<CatalogueItemRecord>>,
    pub factory_photos: Mutex<Vec<FactoryPhotoRecord>>,
    pub design_templates: Mutex<Vec<DesignTemplateRecord>>,
    pub reviews: Mutex<Vec<ReviewRecord>>,
    pub enquiries: Mutex<Vec<EnquiryRecord>>,
    pub design_enquiries: Mutex<Vec<DesignEnquiryRecord>>,
    pub settings: Mutex<Vec<SiteSettingRecord>>,
    pub sections: Mutex<Vec<SiteSectionRecord>>,
}

#[async_trait]
impl HealthProbe for MemoryStore {
    async fn ping(&self) -> bool {
        true
    }
}

#[async_trait]
impl ClothingTypesRepo for MemoryStore {
    async fn list_clothing_types(
        &self,
        include_inactive: bool,
    ) -> Result<Vec<ClothingTypeRecord>, RepoError> {
        let mut types: Vec<_> = self
            .clothing_types
            .lock()
            .await
            .iter()
            .filter(|record| include_inactive || record.active)
            .cloned()
            .collect();
        types.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.name.cmp(&b.name)));
        Ok(types)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ClothingTypeRecord>, RepoError> {
        Ok(self
            .clothing_types
            .lock()
            .await
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ClothingTypeRecord>, RepoError> {
        Ok(self
            .clothing_types
            .lock()
            .await
            .iter()
            .find(|record| record.slug == slug)
            .cloned())
    }

    async fn create_clothing_type(
        &self,
        params: CreateClothingTypeParams,
    ) -> Result<ClothingTypeRecord, RepoError> {
        let mut types = self.clothing_types.lock().await;
        if types.iter().any(|record| record.slug == params.slug) {
            return Err(RepoError::Duplicate {
                constraint: "clothing_types_slug_key".to_string(),
            });
        }
        let record = ClothingTypeRecord {
            id: Uuid::new_v4(),
            slug: params.slug,
            name: params.name,
            description: params.description,
            image_url: params.image_url,
            default_moq: params.default_moq,
            lead_time: params.lead_time,
            size_range: params.size_range,
            sort_order: params.sort_order,
            active: params.active,
            created_at: now(),
            updated_at: now(),
        };
        types.push(record.clone());
        Ok(record)
    }

    async fn update_clothing_type(
        &self,
        id: Uuid,
        params: UpdateClothingTypeParams,
    ) -> Result<Option<ClothingTypeRecord>, RepoError> {
        let mut types = self.clothing_types.lock().await;
        let Some(record) = types.iter_mut().find(|record| record.id == id) else {
            return Ok(None);
        };
        if let Some(name) = params.name {
            record.name = name;
        }
        if let Some(slug) = params.slug {
            record.slug = slug;
        }
        if let Some(description) = params.description {
            record.description = description;
        }
        if let Some(image_url) = params.image_url {
            record.image_url = image_url;
        }
        if let Some(default_moq) = params.default_moq {
            record.default_moq = default_moq;
        }
        if let Some(lead_time) = params.lead_time {
            record.lead_time = lead_time;
        }
        if let Some(size_range) = params.size_range {
            record.size_range = size_range;
        }
        if let Some(sort_order) = params.sort_order {
            record.sort_order = sort_order;
        }
        if let Some(active) = params.active {
            record.active = active;
        }
        record.updated_at = now();
        Ok(Some(record.clone()))
    }

    async fn delete_clothing_type(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut types = self.clothing_types.lock().await;
        let before = types.len();
        types.retain(|record| record.id != id);
        Ok(types.len() < before)
    }
}

#[async_trait]
impl FabricsRepo for MemoryStore {
    async fn list_fabrics(&self, include_inactive: bool) -> Result<Vec<FabricRecord>, RepoError> {
        let mut fabrics: Vec<_> = self
            .fabrics
            .lock()
            .await
            .iter()
            .filter(|record| include_inactive || record.active)
            .cloned()
            .collect();
        fabrics.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.name.cmp(&b.name)));
        Ok(fabrics)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FabricRecord>, RepoError> {
        Ok(self
            .fabrics
            .lock()
            .await
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<FabricRecord>, RepoError> {
        Ok(self
            .fabrics
            .lock()
            .await
            .iter()
            .find(|record| record.slug == slug)
            .cloned())
    }

    async fn create_fabric(&self, params: CreateFabricParams) -> Result<FabricRecord, RepoError> {
        let mut fabrics = self.fabrics.lock().await;
        if fabrics.iter().any(|record| record.slug == params.slug) {
            return Err(RepoError::Duplicate {
                constraint: "fabrics_slug_key".to_string(),
            });
        }
        let record = FabricRecord {
            id: Uuid::new_v4(),
            slug: params.slug,
            name: params.name,
            description: params.description,
            composition: params.composition,
            weight_gsm: params.weight_gsm,
            properties: params.properties,
            image_url: params.image_url,
            sort_order: params.sort_order,
            active: params.active,
            created_at: now(),
            updated_at: now(),
        };
        fabrics.push(record.clone());
        Ok(record)
    }

    async fn update_fabric(
        &self,
        id: Uuid,
        params: UpdateFabricParams,
    ) -> Result<Option<FabricRecord>, RepoError> {
        let mut fabrics = self.fabrics.lock().await;
        let Some(record) = fabrics.iter_mut().find(|record| record.id == id) else {
            return Ok(None);
        };
        if let Some(name) = params.name {
            record.name = name;
        }
        if let Some(slug) = params.slug {
            record.slug = slug;
        }
        if let Some(description) = params.description {
            record.description = description;
        }
        if let Some(composition) = params.composition {
            record.composition = composition;
        }
        if let Some(weight_gsm) = params.weight_gsm {
            record.weight_gsm = weight_gsm;
        }
        if let Some(properties) = params.properties {
            record.properties = properties;
        }
        if let Some(image_url) = params.image_url {
            record.image_url = image_url;
        }
        if let Some(sort_order) = params.sort_order {
            record.sort_order = sort_order;
        }
        if let Some(active) = params.active {
            record.active = active;
        }
        record.updated_at = now();
        Ok(Some(record.clone()))
    }

    async fn delete_fabric(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut fabrics = self.fabrics.lock().await;
        let before = fabrics.len();
        fabrics.retain(|record| record.id != id);
        Ok(fabrics.len() < before)
    }
}

#[async_trait]
impl CatalogueRepo for MemoryStore {
    async fn list_catalogue_items(
        &self,
        filter: &CatalogueQueryFilter,
    ) -> Result<Vec<CatalogueItemRecord>, RepoError> {
        Ok(self
            .catalogue
            .lock()
            .await
            .iter()
            .filter(|record| {
                filter
                    .clothing_type_id
                    .is_none_or(|id| record.clothing_type_id == id)
                    && filter
                        .customizable
                        .is_none_or(|flag| record.customizable == flag)
            })
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CatalogueItemRecord>, RepoError> {
        Ok(self
            .catalogue
            .lock()
            .await
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CatalogueItemRecord>, RepoError> {
        Ok(self
            .catalogue
            .lock()
            .await
            .iter()
            .find(|record| record.slug == slug)
            .cloned())
    }

    async fn create_catalogue_item(
        &self,
        params: CreateCatalogueItemParams,
    ) -> Result<CatalogueItemRecord, RepoError> {
        let mut items = self.catalogue.lock().await;
        if items.iter().any(|record| record.slug == params.slug) {
            return Err(RepoError::Duplicate {
                constraint: "catalogue_items_slug_key".to_string(),
            });
        }
        let record = CatalogueItemRecord {
            id: Uuid::new_v4(),
            clothing_type_id: params.clothing_type_id,
            slug: params.slug,
            name: params.name,
            description: params.description,
            moq: params.moq,
            lead_time: params.lead_time,
            size_range: params.size_range,
            fabric_ids: params.fabric_ids,
            features: params.features,
            specifications: params.specifications,
            customizable: params.customizable,
            images: Vec::new(),
            colors: Vec::new(),
            created_at: now(),
            updated_at: now(),
        };
        items.push(record.clone());
        Ok(record)
    }

    async fn update_catalogue_item(
        &self,
        id: Uuid,
        params: UpdateCatalogueItemParams,
    ) -> Result<Option<CatalogueItemRecord>, RepoError> {
        let mut items = self.catalogue.lock().await;
        let Some(record) = items.iter_mut().find(|record| record.id == id) else {
            return Ok(None);
        };
        if let Some(clothing_type_id) = params.clothing_type_id {
            record.clothing_type_id = clothing_type_id;
        }
        if let Some(name) = params.name {
            record.name = name;
        }
        if let Some(slug) = params.slug {
            record.slug = slug;
        }
        if let Some(description) = params.description {
            record.description = description;
        }
        if let Some(moq) = params.moq {
            record.moq = moq;
        }
        if let Some(lead_time) = params.lead_time {
            record.lead_time = lead_time;
        }
        if let Some(size_range) = params.size_range {
            record.size_range = size_range;
        }
        if let Some(fabric_ids) = params.fabric_ids {
            record.fabric_ids = fabric_ids;
        }
        if let Some(features) = params.features {
            record.features = features;
        }
        if let Some(specifications) = params.specifications {
            record.specifications = specifications;
        }
        if let Some(customizable) = params.customizable {
            record.customizable = customizable;
        }
        record.updated_at = now();
        Ok(Some(record.clone()))
    }

    async fn delete_catalogue_item(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut items = self.catalogue.lock().await;
        let before = items.len();
        items.retain(|record| record.id != id);
        Ok(items.len() < before)
    }

    async fn replace_images(
        &self,
        item_id: Uuid,
        images: Vec<CatalogueImageParams>,
    ) -> Result<Option<Vec<CatalogueImageRecord>>, RepoError> {
        let mut items = self.catalogue.lock().await;
        let Some(record) = items.iter_mut().find(|record| record.id == item_id) else {
            return Ok(None);
        };
        record.images = images
            .into_iter()
            .map(|image| CatalogueImageRecord {
                id: Uuid::new_v4(),
                catalogue_item_id: item_id,
                url: image.url,
                alt_text: image.alt_text,
                sort_order: image.sort_order,
                is_primary: image.is_primary,
            })
            .collect();
        Ok(Some(record.images.clone()))
    }

    async fn replace_colors(
        &self,
        item_id: Uuid,
        colors: Vec<ColorVariantParams>,
    ) -> Result<Option<Vec<ColorVariantRecord>>, RepoError> {
        let mut items = self.catalogue.lock().await;
        let Some(record) = items.iter_mut().find(|record| record.id == item_id) else {
            return Ok(None);
        };
        record.colors = colors
            .into_iter()
            .map(|color| ColorVariantRecord {
                id: Uuid::new_v4(),
                catalogue_item_id: item_id,
                name: color.name,
                hex: color.hex,
                front_image_url: color.front_image_url,
                back_image_url: color.back_image_url,
                side_image_url: color.side_image_url,
                sort_order: color.sort_order,
            })
            .collect();
        Ok(Some(record.colors.clone()))
    }
}

#[async_trait]
impl FactoryPhotosRepo for MemoryStore {
    async fn list_factory_photos(
        &self,
        include_inactive: bool,
        category: Option<&str>,
    ) -> Result<Vec<FactoryPhotoRecord>, RepoError> {
        Ok(self
            .factory_photos
            .lock()
            .await
            .iter()
            .filter(|record| include_inactive || record.active)
            .filter(|record| category.is_none_or(|category| record.category == category))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FactoryPhotoRecord>, RepoError> {
        Ok(self
            .factory_photos
            .lock()
            .await
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }

    async fn create_factory_photo(
        &self,
        params: CreateFactoryPhotoParams,
    ) -> Result<FactoryPhotoRecord, RepoError> {
        let record = FactoryPhotoRecord {
            id: Uuid::new_v4(),
            title: params.title,
            description: params.description,
            image_url: params.image_url,
            category: params.category,
            sort_order: params.sort_order,
            active: params.active,
            created_at: now(),
            updated_at: now(),
        };
        self.factory_photos.lock().await.push(record.clone());
        Ok(record)
    }

    async fn update_factory_photo(
        &self,
        id: Uuid,
        params: UpdateFactoryPhotoParams,
    ) -> Result<Option<FactoryPhotoRecord>, RepoError> {
        let mut photos = self.factory_photos.lock().await;
        let Some(record) = photos.iter_mut().find(|record| record.id == id) else {
            return Ok(None);
        };
        if let Some(title) = params.title {
            record.title = title;
        }
        if let Some(description) = params.description {
            record.description = description;
        }
        if let Some(image_url) = params.image_url {
            record.image_url = image_url;
        }
        if let Some(category) = params.category {
            record.category = category;
        }
        if let Some(sort_order) = params.sort_order {
            record.sort_order = sort_order;
        }
        if let Some(active) = params.active {
            record.active = active;
        }
        record.updated_at = now();
        Ok(Some(record.clone()))
    }

    async fn delete_factory_photo(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut photos = self.factory_photos.lock().await;
        let before = photos.len();
        photos.retain(|record| record.id != id);
        Ok(photos.len() < before)
    }
}

#[async_trait]
impl DesignTemplatesRepo for MemoryStore {
    async fn list_design_templates(
        &self,
        include_inactive: bool,
    ) -> Result<Vec<DesignTemplateRecord>, RepoError> {
        Ok(self
            .design_templates
            .lock()
            .await
            .iter()
            .filter(|record| include_inactive || record.active)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DesignTemplateRecord>, RepoError> {
        Ok(self
            .design_templates
            .lock()
            .await
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }

    async fn create_design_template(
        &self,
        params: CreateDesignTemplateParams,
    ) -> Result<DesignTemplateRecord, RepoError> {
        let record = DesignTemplateRecord {
            id: Uuid::new_v4(),
            name: params.name,
            hex: params.hex,
            front_image_url: params.front_image_url,
            back_image_url: params.back_image_url,
            side_image_url: params.side_image_url,
            active: params.active,
            created_at: now(),
            updated_at: now(),
        };
        self.design_templates.lock().await.push(record.clone());
        Ok(record)
    }

    async fn update_design_template(
        &self,
        id: Uuid,
        params: UpdateDesignTemplateParams,
    ) -> Result<Option<DesignTemplateRecord>, RepoError> {
        let mut templates = self.design_templates.lock().await;
        let Some(record) = templates.iter_mut().find(|record| record.id == id) else {
            return Ok(None);
        };
        if let Some(name) = params.name {
            record.name = name;
        }
        if let Some(hex) = params.hex {
            record.hex = hex;
        }
        if let Some(front_image_url) = params.front_image_url {
            record.front_image_url = front_image_url;
        }
        if let Some(back_image_url) = params.back_image_url {
            record.back_image_url = back_image_url;
        }
        if let Some(side_image_url) = params.side_image_url {
            record.side_image_url = side_image_url;
        }
        if let Some(active) = params.active {
            record.active = active;
        }
        record.updated_at = now();
        Ok(Some(record.clone()))
    }

    async fn delete_design_template(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut templates = self.design_templates.lock().await;
        let before = templates.len();
        templates.retain(|record| record.id != id);
        Ok(templates.len() < before)
    }
}

#[async_trait]
impl ReviewsRepo for MemoryStore {
    async fn list_public_reviews(&self) -> Result<Vec<ReviewRecord>, RepoError> {
        Ok(self
            .reviews
            .lock()
            .await
            .iter()
            .filter(|record| record.is_public())
            .cloned()
            .collect())
    }

    async fn list_reviews(
        &self,
        filter: &ReviewQueryFilter,
        page: PageRequest,
    ) -> Result<Paged<ReviewRecord>, RepoError> {
        let reviews: Vec<_> = self
            .reviews
            .lock()
            .await
            .iter()
            .filter(|record| filter.status.is_none_or(|status| record.status == status))
            .cloned()
            .collect();
        Ok(page_slice(reviews, page))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ReviewRecord>, RepoError> {
        Ok(self
            .reviews
            .lock()
            .await
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }

    async fn create_review(&self, params: CreateReviewParams) -> Result<ReviewRecord, RepoError> {
        let record = ReviewRecord {
            id: Uuid::new_v4(),
            name: params.name,
            company: params.company,
            email: params.email,
            rating: params.rating,
            message: params.message,
            status: ReviewStatus::Pending,
            is_visible: true,
            created_at: now(),
            updated_at: now(),
        };
        self.reviews.lock().await.push(record.clone());
        Ok(record)
    }

    async fn update_review(
        &self,
        id: Uuid,
        params: UpdateReviewParams,
    ) -> Result<Option<ReviewRecord>, RepoError> {
        let mut reviews = self.reviews.lock().await;
        let Some(record) = reviews.iter_mut().find(|record| record.id == id) else {
            return Ok(None);
        };
        if let Some(status) = params.status {
            record.status = status;
        }
        if let Some(is_visible) = params.is_visible {
            record.is_visible = is_visible;
        }
        record.updated_at = now();
        Ok(Some(record.clone()))
    }

    async fn delete_review(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut reviews = self.reviews.lock().await;
        let before = reviews.len();
        reviews.retain(|record| record.id != id);
        Ok(reviews.len() < before)
    }
}

fn enquiry_matches(record: &EnquiryRecord, filter: &EnquiryQueryFilter) -> bool {
    filter.status.is_none_or(|status| record.status == status)
        && filter
            .priority
            .is_none_or(|priority| record.priority == priority)
        && filter.search.as_deref().is_none_or(|term| {
            let term = term.to_lowercase();
            record.name.to_lowercase().contains(&term)
                || record
                    .company
                    .as_deref()
                    .is_some_and(|company| company.to_lowercase().contains(&term))
                || record.email.to_lowercase().contains(&term)
                || record
                    .phone
                    .as_deref()
                    .is_some_and(|phone| phone.to_lowercase().contains(&term))
        })
}

fn page_slice<T: Clone>(items: Vec<T>, page: PageRequest) -> Paged<T> {
    let total = items.len() as u64;
    let start = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let slice = items
        .into_iter()
        .skip(start)
        .take(page.limit() as usize)
        .collect();
    Paged::new(slice, total, page)
}

#[async_trait]
impl EnquiriesRepo for MemoryStore {
    async fn create_enquiry(
        &self,
        params: CreateEnquiryParams,
    ) -> Result<EnquiryRecord, RepoError> {
        let record = EnquiryRecord {
            id: Uuid::new_v4(),
            clothing_type_id: params.clothing_type_id,
            fabric_id: params.fabric_id,
            clothing_type_name: params.clothing_type_name,
            fabric_name: params.fabric_name,
            name: params.name,
            company: params.company,
            email: params.email,
            phone: params.phone,
            quantity: params.quantity,
            is_sample_request: params.is_sample_request,
            size_range: params.size_range,
            notes: params.notes,
            status: EnquiryStatus::Pending,
            priority: params.priority,
            deadline: params.deadline,
            admin_notes: None,
            created_at: now(),
            updated_at: now(),
        };
        self.enquiries.lock().await.push(record.clone());
        Ok(record)
    }

    async fn list_enquiries(
        &self,
        filter: &EnquiryQueryFilter,
        page: PageRequest,
    ) -> Result<Paged<EnquiryRecord>, RepoError> {
        let mut enquiries: Vec<_> = self
            .enquiries
            .lock()
            .await
            .iter()
            .filter(|record| enquiry_matches(record, filter))
            .cloned()
            .collect();
        enquiries.reverse();
        Ok(page_slice(enquiries, page))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<EnquiryRecord>, RepoError> {
        Ok(self
            .enquiries
            .lock()
            .await
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }

    async fn update_enquiry(
        &self,
        id: Uuid,
        params: UpdateEnquiryParams,
    ) -> Result<Option<EnquiryRecord>, RepoError> {
        let mut enquiries = self.enquiries.lock().await;
        let Some(record) = enquiries.iter_mut().find(|record| record.id == id) else {
            return Ok(None);
        };
        if let Some(status) = params.status {
            record.status = status;
        }
        if let Some(priority) = params.priority {
            record.priority = priority;
        }
        if let Some(deadline) = params.deadline {
            record.deadline = deadline;
        }
        if let Some(admin_notes) = params.admin_notes {
            record.admin_notes = admin_notes;
        }
        record.updated_at = now();
        Ok(Some(record.clone()))
    }

    async fn delete_enquiry(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut enquiries = self.enquiries.lock().await;
        let before = enquiries.len();
        enquiries.retain(|record| record.id != id);
        Ok(enquiries.len() < before)
    }

    async fn delete_all_enquiries(&self) -> Result<u64, RepoError> {
        let mut enquiries = self.enquiries.lock().await;
        let deleted = enquiries.len() as u64;
        enquiries.clear();
        Ok(deleted)
    }

    async fn status_counts(&self) -> Result<Vec<(EnquiryStatus, u64)>, RepoError> {
        let enquiries = self.enquiries.lock().await;
        Ok(EnquiryStatus::ALL
            .iter()
            .map(|status| {
                let count = enquiries
                    .iter()
                    .filter(|record| record.status == *status)
                    .count() as u64;
                (*status, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect())
    }
}

#[async_trait]
impl DesignEnquiriesRepo for MemoryStore {
    async fn create_design_enquiry(
        &self,
        params: CreateDesignEnquiryParams,
    ) -> Result<DesignEnquiryRecord, RepoError> {
        let record = DesignEnquiryRecord {
            id: Uuid::new_v4(),
            fabric_id: params.fabric_id,
            fabric_name: params.fabric_name,
            print_type: params.print_type,
            name: params.name,
            company: params.company,
            email: params.email,
            phone: params.phone,
            quantity: params.quantity,
            front_image_url: params.front_image_url,
            back_image_url: params.back_image_url,
            side_image_url: params.side_image_url,
            logo_urls: params.logo_urls,
            notes: params.notes,
            status: EnquiryStatus::Pending,
            priority: params.priority,
            deadline: params.deadline,
            admin_notes: None,
            created_at: now(),
            updated_at: now(),
        };
        self.design_enquiries.lock().await.push(record.clone());
        Ok(record)
    }

    async fn list_design_enquiries(
        &self,
        filter: &EnquiryQueryFilter,
        page: PageRequest,
    ) -> Result<Paged<DesignEnquiryRecord>, RepoError> {
        let mut matches: Vec<_> = self
            .design_enquiries
            .lock()
            .await
            .iter()
            .filter(|record| {
                filter.status.is_none_or(|status| record.status == status)
                    && filter
                        .priority
                        .is_none_or(|priority| record.priority == priority)
                    && filter.search.as_deref().is_none_or(|term| {
                        let term = term.to_lowercase();
                        record.name.to_lowercase().contains(&term)
                            || record.email.to_lowercase().contains(&term)
                    })
            })
            .cloned()
            .collect();
        matches.reverse();
        Ok(page_slice(matches, page))
    }

    async fn list_all_design_enquiries(&self) -> Result<Vec<DesignEnquiryRecord>, RepoError> {
        Ok(self.design_enquiries.lock().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DesignEnquiryRecord>, RepoError> {
        Ok(self
            .design_enquiries
            .lock()
            .await
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }

    async fn update_design_enquiry(
        &self,
        id: Uuid,
        params: UpdateEnquiryParams,
    ) -> Result<Option<DesignEnquiryRecord>, RepoError> {
        let mut enquiries = self.design_enquiries.lock().await;
        let Some(record) = enquiries.iter_mut().find(|record| record.id == id) else {
            return Ok(None);
        };
        if let Some(status) = params.status {
            record.status = status;
        }
        if let Some(priority) = params.priority {
            record.priority = priority;
        }
        if let Some(deadline) = params.deadline {
            record.deadline = deadline;
        }
        if let Some(admin_notes) = params.admin_notes {
            record.admin_notes = admin_notes;
        }
        record.updated_at = now();
        Ok(Some(record.clone()))
    }

    async fn delete_design_enquiry(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut enquiries = self.design_enquiries.lock().await;
        let before = enquiries.len();
        enquiries.retain(|record| record.id != id);
        Ok(enquiries.len() < before)
    }

    async fn delete_all_design_enquiries(&self) -> Result<u64, RepoError> {
        let mut enquiries = self.design_enquiries.lock().await;
        let deleted = enquiries.len() as u64;
        enquiries.clear();
        Ok(deleted)
    }

    async fn status_counts(&self) -> Result<Vec<(EnquiryStatus, u64)>, RepoError> {
        let enquiries = self.design_enquiries.lock().await;
        Ok(EnquiryStatus::ALL
            .iter()
            .map(|status| {
                let count = enquiries
                    .iter()
                    .filter(|record| record.status == *status)
                    .count() as u64;
                (*status, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect())
    }
}

#[async_trait]
impl SettingsRepo for MemoryStore {
    async fn get_setting(&self, key: &str) -> Result<Option<SiteSettingRecord>, RepoError> {
        Ok(self
            .settings
            .lock()
            .await
            .iter()
            .find(|record| record.key == key)
            .cloned())
    }

    async fn upsert_setting(
        &self,
        key: &str,
        value: serde_json::Value,
    ) -> Result<SiteSettingRecord, RepoError> {
        let mut settings = self.settings.lock().await;
        if let Some(record) = settings.iter_mut().find(|record| record.key == key) {
            record.value = value;
            record.updated_at = now();
            return Ok(record.clone());
        }
        let record = SiteSettingRecord {
            key: key.to_string(),
            value,
            updated_at: now(),
        };
        settings.push(record.clone());
        Ok(record)
    }

    async fn list_sections(&self, visible_only: bool) -> Result<Vec<SiteSectionRecord>, RepoError> {
        let mut sections: Vec<_> = self
            .sections
            .lock()
            .await
            .iter()
            .filter(|record| !visible_only || record.visible)
            .cloned()
            .collect();
        sections.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.key.cmp(&b.key)));
        Ok(sections)
    }

    async fn get_section(&self, key: &str) -> Result<Option<SiteSectionRecord>, RepoError> {
        Ok(self
            .sections
            .lock()
            .await
            .iter()
            .find(|record| record.key == key)
            .cloned())
    }

    async fn upsert_section(
        &self,
        key: &str,
        value: serde_json::Value,
        visible: bool,
        sort_order: i32,
    ) -> Result<SiteSectionRecord, RepoError> {
        let mut sections = self.sections.lock().await;
        if let Some(record) = sections.iter_mut().find(|record| record.key == key) {
            record.value = value;
            record.visible = visible;
            record.sort_order = sort_order;
            record.updated_at = now();
            return Ok(record.clone());
        }
        let record = SiteSectionRecord {
            key: key.to_string(),
            value,
            visible,
            sort_order,
            updated_at: now(),
        };
        sections.push(record.clone());
        Ok(record)
    }

    async fn delete_section(&self, key: &str) -> Result<bool, RepoError> {
        let mut sections = self.sections.lock().await;
        let before = sections.len();
        sections.retain(|record| record.key != key);
        Ok(sections.len() < before)
    }
}

// ---------------------------------------------------------------------------
// Recording side-effect doubles
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: std::sync::Mutex<Vec<EnquiryNotification>>,
    pub fail: bool,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn enquiry_received(&self, notification: &EnquiryNotification) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError {
                reason: "smtp unreachable".to_string(),
            });
        }
        self.sent
            .lock()
            .expect("notifier lock")
            .push(notification.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingPurge {
    pub deleted: std::sync::Mutex<Vec<String>>,
    pub fail: bool,
}

#[async_trait]
impl MediaPurge for RecordingPurge {
    async fn delete_by_url(&self, url: &str) -> Result<(), MediaDeleteError> {
        if self.fail {
            return Err(MediaDeleteError {
                url: url.to_string(),
                reason: "bucket offline".to_string(),
            });
        }
        self.deleted
            .lock()
            .expect("purge lock")
            .push(url.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Harness assembly
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub cache: Arc<ContentCache>,
    pub media: Arc<MediaStorage>,
    pub media_root: std::path::PathBuf,
}

pub fn media_settings(root: std::path::PathBuf) -> MediaSettings {
    MediaSettings {
        directory: root,
        base_url: "/uploads".to_string(),
        max_image_bytes: std::num::NonZeroU64::new(5 * 1024 * 1024).expect("non-zero"),
        max_logo_bytes: std::num::NonZeroU64::new(2 * 1024 * 1024).expect("non-zero"),
    }
}

pub fn build_app() -> TestApp {
    let store = Arc::new(MemoryStore::default());
    let cache = Arc::new(ContentCache::new(&CacheConfig::default()));
    let trigger = Arc::new(CacheTrigger::new(cache.clone()));

    let media_root = std::env::temp_dir().join(format!("filato-test-{}", Uuid::new_v4()));
    let media = Arc::new(MediaStorage::new(&media_settings(media_root.clone())).expect("media root"));

    let notifier: Arc<dyn Notifier> = Arc::new(RecordingNotifier::default());

    let reads = Arc::new(CatalogueReadService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        cache.clone(),
    ));
    let content = Arc::new(ContentService::new(store.clone(), cache.clone()));
    let reviews = Arc::new(ReviewService::new(store.clone(), cache.clone()));
    let enquiries = Arc::new(EnquiryService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        notifier.clone(),
    ));
    let design_enquiries = Arc::new(DesignEnquiryService::new(
        store.clone(),
        store.clone(),
        media.clone(),
        notifier,
    ));

    let state = ApiState {
        clothing_types: store.clone(),
        fabrics: store.clone(),
        catalogue: store.clone(),
        factory_photos: store.clone(),
        design_templates: store.clone(),
        reviews_repo: store.clone(),
        settings_repo: store.clone(),
        reads,
        content,
        reviews,
        enquiries,
        design_enquiries,
        media: media.clone(),
        trigger,
        health: store.clone(),
    };

    TestApp {
        router: build_api_router(state),
        store,
        cache,
        media,
        media_root,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("request"),
    };

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Method::GET, uri, None).await
}

pub async fn post(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(router, Method::POST, uri, Some(body)).await
}

pub async fn patch(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(router, Method::PATCH, uri, Some(body)).await
}

pub async fn put(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(router, Method::PUT, uri, Some(body)).await
}

pub async fn delete(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Method::DELETE, uri, None).await
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

pub async fn seed_clothing_type(
    store: &MemoryStore,
    name: &str,
    slug: &str,
    active: bool,
) -> ClothingTypeRecord {
    ClothingTypesRepo::create_clothing_type(
        store,
        CreateClothingTypeParams {
            slug: slug.to_string(),
            name: name.to_string(),
            description: String::new(),
            image_url: None,
            default_moq: 50,
            lead_time: "4-6 weeks".to_string(),
            size_range: "XS-XXL".to_string(),
            sort_order: 0,
            active,
        },
    )
    .await
    .expect("seed clothing type")
}

pub async fn seed_fabric(store: &MemoryStore, name: &str, slug: &str) -> FabricRecord {
    FabricsRepo::create_fabric(
        store,
        CreateFabricParams {
            slug: slug.to_string(),
            name: name.to_string(),
            description: String::new(),
            composition: "100% cotton".to_string(),
            weight_gsm: Some(240),
            properties: serde_json::json!({"breathable": true}),
            image_url: None,
            sort_order: 0,
            active: true,
        },
    )
    .await
    .expect("seed fabric")
}

pub async fn seed_enquiry(store: &MemoryStore, name: &str, email: &str) -> EnquiryRecord {
    EnquiriesRepo::create_enquiry(
        store,
        CreateEnquiryParams {
            clothing_type_id: None,
            fabric_id: None,
            clothing_type_name: "Hoodies".to_string(),
            fabric_name: "Cotton".to_string(),
            name: name.to_string(),
            company: None,
            email: email.to_string(),
            phone: None,
            quantity: 100,
            is_sample_request: false,
            size_range: None,
            notes: None,
            priority: EnquiryPriority::Medium,
            deadline: None,
        },
    )
    .await
    .expect("seed enquiry")
}
