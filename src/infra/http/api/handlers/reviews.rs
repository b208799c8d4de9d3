use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use validator::Validate;

use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{
    CreateReviewRequest, ModerateReviewRequest, ReviewListQuery, data_response, created_response,
    empty_response, paged_response,
};
use crate::infra::http::api::state::ApiState;

use super::parse_id;

/// Approved-and-visible reviews only; this is the public feed.
pub async fn list_public_reviews(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let reviews = state.reviews.public_reviews().await?;
    Ok(data_response(reviews))
}

pub async fn submit_review(
    State(state): State<ApiState>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let record = state.reviews.submit(payload.into()).await?;
    Ok(created_response(record))
}

/// Moderation view: every review regardless of status, paged.
pub async fn list_all_reviews(
    State(state): State<ApiState>,
    Query(query): Query<ReviewListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .reviews_repo
        .list_reviews(&query.filter(), query.page_request())
        .await?;
    Ok(paged_response(page))
}

pub async fn moderate_review(
    State(state): State<ApiState>,
    Path(key): Path<String>,
    Json(payload): Json<ModerateReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&key)?;
    let record = state
        .reviews_repo
        .update_review(id, payload.into())
        .await?
        .ok_or_else(|| ApiError::not_found("review not found"))?;
    state.trigger.reviews_changed();
    Ok(data_response(record))
}

pub async fn delete_review(
    State(state): State<ApiState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&key)?;
    if !state.reviews_repo.delete_review(id).await? {
        return Err(ApiError::not_found("review not found"));
    }
    state.trigger.reviews_changed();
    Ok(empty_response())
}
