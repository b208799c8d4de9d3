use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;

use crate::cache::CacheTag;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{
    SectionListQuery, UpsertSectionRequest, UpsertSettingRequest, data_response, empty_response,
};
use crate::infra::http::api::state::ApiState;

/// Well-known keys fall back to a baseline value when never written; unknown
/// keys read as not found.
pub async fn get_setting(
    State(state): State<ApiState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let value = state.content.setting(&key).await?;
    Ok(data_response(value))
}

pub async fn put_setting(
    State(state): State<ApiState>,
    Path(key): Path<String>,
    Json(payload): Json<UpsertSettingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .settings_repo
        .upsert_setting(&key, payload.value)
        .await?;
    state.trigger.setting_changed(&key);
    Ok(data_response(record))
}

pub async fn list_sections(
    State(state): State<ApiState>,
    Query(query): Query<SectionListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let sections = if query.include_hidden {
        state.settings_repo.list_sections(false).await?
    } else {
        state.content.visible_sections().await?
    };
    Ok(data_response(sections))
}

pub async fn put_section(
    State(state): State<ApiState>,
    Path(key): Path<String>,
    Json(payload): Json<UpsertSectionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .settings_repo
        .upsert_section(&key, payload.value, payload.visible, payload.sort_order)
        .await?;
    state.trigger.invalidate(CacheTag::Settings);
    Ok(data_response(record))
}

pub async fn delete_section(
    State(state): State<ApiState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.settings_repo.delete_section(&key).await? {
        return Err(ApiError::not_found("section not found"));
    }
    state.trigger.invalidate(CacheTag::Settings);
    Ok(empty_response())
}
