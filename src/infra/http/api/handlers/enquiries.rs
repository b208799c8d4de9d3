use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use validator::Validate;

use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{
    BulkDeleted, CreateEnquiryRequest, EnquiryListQuery, UpdateEnquiryRequest, data_response,
    created_response, empty_response, paged_response,
};
use crate::infra::http::api::state::ApiState;

use super::parse_id;

pub async fn create_enquiry(
    State(state): State<ApiState>,
    Json(payload): Json<CreateEnquiryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let record = state.enquiries.create(payload.into()).await?;
    Ok(created_response(record))
}

pub async fn list_enquiries(
    State(state): State<ApiState>,
    Query(query): Query<EnquiryListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .enquiries
        .list(&query.filter(), query.page_request())
        .await?;
    Ok(paged_response(page))
}

pub async fn enquiry_stats(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let stats = state.enquiries.stats().await?;
    Ok(data_response(stats))
}

pub async fn get_enquiry(
    State(state): State<ApiState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&key)?;
    let record = state.enquiries.get(id).await?;
    Ok(data_response(record))
}

pub async fn update_enquiry(
    State(state): State<ApiState>,
    Path(key): Path<String>,
    Json(payload): Json<UpdateEnquiryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&key)?;
    let record = state.enquiries.update(id, payload.into()).await?;
    Ok(data_response(record))
}

pub async fn delete_enquiry(
    State(state): State<ApiState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&key)?;
    state.enquiries.delete(id).await?;
    Ok(empty_response())
}

pub async fn delete_all_enquiries(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.enquiries.delete_all().await?;
    Ok(data_response(BulkDeleted { deleted }))
}
