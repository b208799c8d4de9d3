use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use crate::infra::http::api::error::{ApiError, codes};
use crate::infra::http::api::models::data_response;
use crate::infra::http::api::state::ApiState;

pub async fn health(State(state): State<ApiState>) -> axum::response::Response {
    if state.health.ping().await {
        data_response(json!({"status": "ok"})).into_response()
    } else {
        ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::UNAVAILABLE,
            "database unreachable",
        )
        .into_response()
    }
}
