pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

pub use state::ApiState;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
};

use crate::infra::http::middleware::{log_responses, set_request_context};
use crate::infra::media::MediaKind;

/// Headroom on top of the raw file ceiling for multipart framing.
const UPLOAD_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_api_router(state: ApiState) -> Router {
    let upload_limit = state.media.max_bytes(MediaKind::Image) as usize + UPLOAD_OVERHEAD_BYTES;

    Router::new()
        .route("/api/health", get(handlers::health))
        .route(
            "/api/clothing-types",
            get(handlers::list_clothing_types).post(handlers::create_clothing_type),
        )
        .route(
            "/api/clothing-types/{key}",
            get(handlers::get_clothing_type)
                .patch(handlers::update_clothing_type)
                .delete(handlers::delete_clothing_type),
        )
        .route(
            "/api/fabrics",
            get(handlers::list_fabrics).post(handlers::create_fabric),
        )
        .route(
            "/api/fabrics/{key}",
            get(handlers::get_fabric)
                .patch(handlers::update_fabric)
                .delete(handlers::delete_fabric),
        )
        .route(
            "/api/catalogue-items",
            get(handlers::list_catalogue_items).post(handlers::create_catalogue_item),
        )
        .route(
            "/api/catalogue-items/{key}",
            get(handlers::get_catalogue_item)
                .patch(handlers::update_catalogue_item)
                .delete(handlers::delete_catalogue_item),
        )
        .route(
            "/api/catalogue-items/{key}/images",
            put(handlers::replace_catalogue_images),
        )
        .route(
            "/api/catalogue-items/{key}/colors",
            put(handlers::replace_catalogue_colors),
        )
        .route(
            "/api/factory-photos",
            get(handlers::list_factory_photos).post(handlers::create_factory_photo),
        )
        .route(
            "/api/factory-photos/{key}",
            get(handlers::get_factory_photo)
                .patch(handlers::update_factory_photo)
                .delete(handlers::delete_factory_photo),
        )
        .route(
            "/api/design-templates",
            get(handlers::list_design_templates).post(handlers::create_design_template),
        )
        .route(
            "/api/design-templates/{key}",
            get(handlers::get_design_template)
                .patch(handlers::update_design_template)
                .delete(handlers::delete_design_template),
        )
        .route(
            "/api/reviews",
            get(handlers::list_public_reviews).post(handlers::submit_review),
        )
        .route("/api/reviews/all", get(handlers::list_all_reviews))
        .route(
            "/api/reviews/{key}",
            patch(handlers::moderate_review).delete(handlers::delete_review),
        )
        .route(
            "/api/enquiries",
            get(handlers::list_enquiries)
                .post(handlers::create_enquiry)
                .delete(handlers::delete_all_enquiries),
        )
        .route("/api/enquiries/stats", get(handlers::enquiry_stats))
        .route(
            "/api/enquiries/{key}",
            get(handlers::get_enquiry)
                .patch(handlers::update_enquiry)
                .delete(handlers::delete_enquiry),
        )
        .route(
            "/api/design-enquiries",
            get(handlers::list_design_enquiries)
                .post(handlers::create_design_enquiry)
                .delete(handlers::delete_all_design_enquiries),
        )
        .route(
            "/api/design-enquiries/stats",
            get(handlers::design_enquiry_stats),
        )
        .route(
            "/api/design-enquiries/{key}",
            get(handlers::get_design_enquiry)
                .patch(handlers::update_design_enquiry)
                .delete(handlers::delete_design_enquiry),
        )
        .route(
            "/api/settings/{key}",
            get(handlers::get_setting).put(handlers::put_setting),
        )
        .route("/api/sections", get(handlers::list_sections))
        .route(
            "/api/sections/{key}",
            put(handlers::put_section).delete(handlers::delete_section),
        )
        .route(
            "/api/uploads",
            post(handlers::upload_media).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/uploads/{*stored_path}", delete(handlers::delete_media))
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}
