use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use validator::Validate;

use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{
    BulkDeleted, CreateDesignEnquiryRequest, EnquiryListQuery, UpdateEnquiryRequest, data_response,
    created_response, empty_response, paged_response,
};
use crate::infra::http::api::state::ApiState;

use super::parse_id;

pub async fn create_design_enquiry(
    State(state): State<ApiState>,
    Json(payload): Json<CreateDesignEnquiryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let record = state.design_enquiries.create(payload.into()).await?;
    Ok(created_response(record))
}

pub async fn list_design_enquiries(
    State(state): State<ApiState>,
    Query(query): Query<EnquiryListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .design_enquiries
        .list(&query.filter(), query.page_request())
        .await?;
    Ok(paged_response(page))
}

pub async fn design_enquiry_stats(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = state.design_enquiries.stats().await?;
    Ok(data_response(stats))
}

pub async fn get_design_enquiry(
    State(state): State<ApiState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&key)?;
    let record = state.design_enquiries.get(id).await?;
    Ok(data_response(record))
}

pub async fn update_design_enquiry(
    State(state): State<ApiState>,
    Path(key): Path<String>,
    Json(payload): Json<UpdateEnquiryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&key)?;
    let record = state.design_enquiries.update(id, payload.into()).await?;
    Ok(data_response(record))
}

/// Purges the enquiry's stored mockup and logo images before the row delete;
/// storage failures are logged by the service, never surfaced here.
pub async fn delete_design_enquiry(
    State(state): State<ApiState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&key)?;
    state.design_enquiries.delete(id).await?;
    Ok(empty_response())
}

pub async fn delete_all_design_enquiries(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.design_enquiries.delete_all().await?;
    Ok(data_response(BulkDeleted { deleted }))
}
