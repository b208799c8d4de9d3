use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use validator::Validate;

use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{
    CreateFactoryPhotoRequest, FactoryPhotoListQuery, UpdateFactoryPhotoRequest, data_response,
    created_response, empty_response,
};
use crate::infra::http::api::state::ApiState;

use super::parse_id;

pub async fn list_factory_photos(
    State(state): State<ApiState>,
    Query(query): Query<FactoryPhotoListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let photos = if query.include_inactive {
        state
            .factory_photos
            .list_factory_photos(true, query.category.as_deref())
            .await?
    } else {
        state.reads.factory_photos(query.category.as_deref()).await?
    };
    Ok(data_response(photos))
}

pub async fn get_factory_photo(
    State(state): State<ApiState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&key)?;
    let record = state
        .factory_photos
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("factory photo not found"))?;
    Ok(data_response(record))
}

pub async fn create_factory_photo(
    State(state): State<ApiState>,
    Json(payload): Json<CreateFactoryPhotoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let record = state
        .factory_photos
        .create_factory_photo(payload.into())
        .await?;
    state.trigger.factory_changed();
    Ok(created_response(record))
}

pub async fn update_factory_photo(
    State(state): State<ApiState>,
    Path(key): Path<String>,
    Json(payload): Json<UpdateFactoryPhotoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let id = parse_id(&key)?;
    let record = state
        .factory_photos
        .update_factory_photo(id, payload.into())
        .await?
        .ok_or_else(|| ApiError::not_found("factory photo not found"))?;
    state.trigger.factory_changed();
    Ok(data_response(record))
}

pub async fn delete_factory_photo(
    State(state): State<ApiState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&key)?;
    if !state.factory_photos.delete_factory_photo(id).await? {
        return Err(ApiError::not_found("factory photo not found"));
    }
    state.trigger.factory_changed();
    Ok(empty_response())
}
