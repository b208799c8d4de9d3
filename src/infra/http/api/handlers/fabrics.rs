use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use validator::Validate;

use crate::domain::lookup::LookupKey;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{
    CreateFabricRequest, ListQuery, UpdateFabricRequest, data_response, created_response,
    empty_response,
};
use crate::infra::http::api::state::ApiState;

use super::{normalize_slug, parse_id, resolve_slug};

pub async fn list_fabrics(
    State(state): State<ApiState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let fabrics = if query.include_inactive {
        state.fabrics.list_fabrics(true).await?
    } else {
        state.reads.fabrics().await?
    };
    Ok(data_response(fabrics))
}

pub async fn get_fabric(
    State(state): State<ApiState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state.reads.fabric(&LookupKey::parse(&key)).await?;
    Ok(data_response(record))
}

pub async fn create_fabric(
    State(state): State<ApiState>,
    Json(payload): Json<CreateFabricRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let repo = state.fabrics.clone();
    let slug = resolve_slug(payload.slug.clone(), &payload.name, move |candidate| {
        let repo = repo.clone();
        let candidate = candidate.to_string();
        async move { Ok(repo.find_by_slug(&candidate).await?.is_none()) }
    })
    .await?;

    let record = state.fabrics.create_fabric(payload.into_params(slug)).await?;
    state.trigger.fabrics_changed();
    Ok(created_response(record))
}

pub async fn update_fabric(
    State(state): State<ApiState>,
    Path(key): Path<String>,
    Json(payload): Json<UpdateFabricRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let id = parse_id(&key)?;
    let slug = normalize_slug(payload.slug.clone())?;

    let record = state
        .fabrics
        .update_fabric(id, payload.into_params(slug))
        .await?
        .ok_or_else(|| ApiError::not_found("fabric not found"))?;
    state.trigger.fabrics_changed();
    Ok(data_response(record))
}

pub async fn delete_fabric(
    State(state): State<ApiState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&key)?;
    if !state.fabrics.delete_fabric(id).await? {
        return Err(ApiError::not_found("fabric not found"));
    }
    state.trigger.fabrics_changed();
    Ok(empty_response())
}
