use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use validator::Validate;

use crate::domain::lookup::LookupKey;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{
    CatalogueListQuery, CreateCatalogueItemRequest, ReplaceColorsRequest, ReplaceImagesRequest,
    UpdateCatalogueItemRequest, data_response, created_response, empty_response,
};
use crate::infra::http::api::state::ApiState;

use super::{normalize_slug, parse_id, resolve_slug};

pub async fn list_catalogue_items(
    State(state): State<ApiState>,
    Query(query): Query<CatalogueListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let items = state.reads.catalogue_items(&query.filter()).await?;
    Ok(data_response(items))
}

pub async fn get_catalogue_item(
    State(state): State<ApiState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .reads
        .catalogue_item(&LookupKey::parse(&key))
        .await?;
    Ok(data_response(item))
}

pub async fn create_catalogue_item(
    State(state): State<ApiState>,
    Json(payload): Json<CreateCatalogueItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let repo = state.catalogue.clone();
    let slug = resolve_slug(payload.slug.clone(), &payload.name, move |candidate| {
        let repo = repo.clone();
        let candidate = candidate.to_string();
        async move { Ok(repo.find_by_slug(&candidate).await?.is_none()) }
    })
    .await?;

    let record = state
        .catalogue
        .create_catalogue_item(payload.into_params(slug))
        .await?;
    state.trigger.catalogue_changed();
    Ok(created_response(record))
}

pub async fn update_catalogue_item(
    State(state): State<ApiState>,
    Path(key): Path<String>,
    Json(payload): Json<UpdateCatalogueItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let id = parse_id(&key)?;
    let slug = normalize_slug(payload.slug.clone())?;

    let record = state
        .catalogue
        .update_catalogue_item(id, payload.into_params(slug))
        .await?
        .ok_or_else(|| ApiError::not_found("catalogue item not found"))?;
    state.trigger.catalogue_changed();
    Ok(data_response(record))
}

pub async fn delete_catalogue_item(
    State(state): State<ApiState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&key)?;
    if !state.catalogue.delete_catalogue_item(id).await? {
        return Err(ApiError::not_found("catalogue item not found"));
    }
    state.trigger.catalogue_changed();
    Ok(empty_response())
}

/// Replace the full image list of one item in a single write.
pub async fn replace_catalogue_images(
    State(state): State<ApiState>,
    Path(key): Path<String>,
    Json(payload): Json<ReplaceImagesRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let id = parse_id(&key)?;

    let images = payload.images.into_iter().map(Into::into).collect();
    let stored = state
        .catalogue
        .replace_images(id, images)
        .await?
        .ok_or_else(|| ApiError::not_found("catalogue item not found"))?;
    state.trigger.catalogue_changed();
    Ok(data_response(stored))
}

pub async fn replace_catalogue_colors(
    State(state): State<ApiState>,
    Path(key): Path<String>,
    Json(payload): Json<ReplaceColorsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let id = parse_id(&key)?;

    let colors = payload.colors.into_iter().map(Into::into).collect();
    let stored = state
        .catalogue
        .replace_colors(id, colors)
        .await?
        .ok_or_else(|| ApiError::not_found("catalogue item not found"))?;
    state.trigger.catalogue_changed();
    Ok(data_response(stored))
}
