use std::sync::Arc;

use async_trait::async_trait;

use crate::application::catalogue::CatalogueReadService;
use crate::application::content::ContentService;
use crate::application::enquiries::{DesignEnquiryService, EnquiryService};
use crate::application::repos::{
    CatalogueRepo, ClothingTypesRepo, DesignTemplatesRepo, FabricsRepo, FactoryPhotosRepo,
    ReviewsRepo, SettingsRepo,
};
use crate::application::reviews::ReviewService;
use crate::cache::CacheTrigger;
use crate::infra::db::PostgresRepositories;
use crate::infra::media::MediaStorage;

/// Liveness check behind the health endpoint; the Postgres pool answers it in
/// production, test harnesses substitute their own.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> bool;
}

#[async_trait]
impl HealthProbe for PostgresRepositories {
    async fn ping(&self) -> bool {
        self.health_check().await.is_ok()
    }
}

/// Everything the API handlers need, behind trait objects so integration
/// tests can drive the router with in-memory repositories.
#[derive(Clone)]
pub struct ApiState {
    pub clothing_types: Arc<dyn ClothingTypesRepo>,
    pub fabrics: Arc<dyn FabricsRepo>,
    pub catalogue: Arc<dyn CatalogueRepo>,
    pub factory_photos: Arc<dyn FactoryPhotosRepo>,
    pub design_templates: Arc<dyn DesignTemplatesRepo>,
    pub reviews_repo: Arc<dyn ReviewsRepo>,
    pub settings_repo: Arc<dyn SettingsRepo>,
    pub reads: Arc<CatalogueReadService>,
    pub content: Arc<ContentService>,
    pub reviews: Arc<ReviewService>,
    pub enquiries: Arc<EnquiryService>,
    pub design_enquiries: Arc<DesignEnquiryService>,
    pub media: Arc<MediaStorage>,
    pub trigger: Arc<CacheTrigger>,
    pub health: Arc<dyn HealthProbe>,
}
