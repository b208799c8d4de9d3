use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use validator::Validate;

use crate::domain::lookup::LookupKey;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{
    CreateClothingTypeRequest, ListQuery, UpdateClothingTypeRequest, data_response,
    created_response, empty_response,
};
use crate::infra::http::api::state::ApiState;

use super::{normalize_slug, parse_id, resolve_slug};

pub async fn list_clothing_types(
    State(state): State<ApiState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let types = if query.include_inactive {
        state.clothing_types.list_clothing_types(true).await?
    } else {
        state.reads.navigation().await?
    };
    Ok(data_response(types))
}

pub async fn get_clothing_type(
    State(state): State<ApiState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .reads
        .clothing_type(&LookupKey::parse(&key))
        .await?;
    Ok(data_response(record))
}

pub async fn create_clothing_type(
    State(state): State<ApiState>,
    Json(payload): Json<CreateClothingTypeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let repo = state.clothing_types.clone();
    let slug = resolve_slug(payload.slug.clone(), &payload.name, move |candidate| {
        let repo = repo.clone();
        let candidate = candidate.to_string();
        async move { Ok(repo.find_by_slug(&candidate).await?.is_none()) }
    })
    .await?;

    let record = state
        .clothing_types
        .create_clothing_type(payload.into_params(slug))
        .await?;
    state.trigger.catalogue_changed();
    Ok(created_response(record))
}

pub async fn update_clothing_type(
    State(state): State<ApiState>,
    Path(key): Path<String>,
    Json(payload): Json<UpdateClothingTypeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let id = parse_id(&key)?;
    let slug = normalize_slug(payload.slug.clone())?;

    let record = state
        .clothing_types
        .update_clothing_type(id, payload.into_params(slug))
        .await?
        .ok_or_else(|| ApiError::not_found("clothing type not found"))?;
    state.trigger.catalogue_changed();
    Ok(data_response(record))
}

pub async fn delete_clothing_type(
    State(state): State<ApiState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&key)?;
    if !state.clothing_types.delete_clothing_type(id).await? {
        return Err(ApiError::not_found("clothing type not found"));
    }
    state.trigger.catalogue_changed();
    Ok(empty_response())
}
