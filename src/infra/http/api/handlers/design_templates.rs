use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use validator::Validate;

use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{
    CreateDesignTemplateRequest, ListQuery, UpdateDesignTemplateRequest, data_response,
    created_response, empty_response,
};
use crate::infra::http::api::state::ApiState;

use super::parse_id;

pub async fn list_design_templates(
    State(state): State<ApiState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let templates = state
        .design_templates
        .list_design_templates(query.include_inactive)
        .await?;
    Ok(data_response(templates))
}

pub async fn get_design_template(
    State(state): State<ApiState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&key)?;
    let record = state
        .design_templates
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("design template not found"))?;
    Ok(data_response(record))
}

pub async fn create_design_template(
    State(state): State<ApiState>,
    Json(payload): Json<CreateDesignTemplateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let record = state
        .design_templates
        .create_design_template(payload.into())
        .await?;
    Ok(created_response(record))
}

pub async fn update_design_template(
    State(state): State<ApiState>,
    Path(key): Path<String>,
    Json(payload): Json<UpdateDesignTemplateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let id = parse_id(&key)?;
    let record = state
        .design_templates
        .update_design_template(id, payload.into())
        .await?
        .ok_or_else(|| ApiError::not_found("design template not found"))?;
    Ok(data_response(record))
}

pub async fn delete_design_template(
    State(state): State<ApiState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&key)?;
    if !state.design_templates.delete_design_template(id).await? {
        return Err(ApiError::not_found("design template not found"));
    }
    Ok(empty_response())
}
