use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use validator::ValidationErrors;

use crate::application::error::{AppError, ErrorReport};
use crate::application::repos::RepoError;
use crate::infra::media::MediaStorageError;

pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const NOT_FOUND: &str = "not_found";
    pub const VALIDATION: &str = "validation_failed";
    pub const DUPLICATE: &str = "duplicate";
    pub const INTEGRITY: &str = "integrity_error";
    pub const UNAVAILABLE: &str = "service_unavailable";
    pub const PAYLOAD_TOO_LARGE: &str = "payload_too_large";
    pub const UNSUPPORTED_MEDIA: &str = "unsupported_media_type";
    pub const INTERNAL: &str = "internal_error";
}

/// The `error` member of the response envelope. Validation failures carry a
/// per-field breakdown in `details`.
#[derive(Debug, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// `{"success": false, "error": {...}}`; the failure half of the envelope.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub success: bool,
    pub error: ApiErrorMessage,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Option<serde_json::Value>,
    report: Option<ErrorReport>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
            report: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, codes::INTERNAL, message)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).ok();
        Self {
            status: StatusCode::BAD_REQUEST,
            code: codes::VALIDATION,
            message: "Request body failed validation".to_string(),
            details,
            report: Some(ErrorReport::from_error(
                "infra::http::api::validation",
                StatusCode::BAD_REQUEST,
                &errors,
            )),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let status = err.status_code();
        let code = match status {
            StatusCode::NOT_FOUND => codes::NOT_FOUND,
            StatusCode::BAD_REQUEST => codes::BAD_REQUEST,
            StatusCode::CONFLICT => match &err {
                AppError::Repo(RepoError::Integrity { .. }) => codes::INTEGRITY,
                _ => codes::DUPLICATE,
            },
            StatusCode::SERVICE_UNAVAILABLE => codes::UNAVAILABLE,
            _ => codes::INTERNAL,
        };
        let mut mapped = Self::new(status, code, err.presentation_message());
        mapped.report = Some(ErrorReport::from_error("infra::http::api", status, &err));
        mapped
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        Self::from(AppError::from(err))
    }
}

impl From<MediaStorageError> for ApiError {
    fn from(err: MediaStorageError) -> Self {
        match err {
            MediaStorageError::UnsupportedType { content_type } => Self::new(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                codes::UNSUPPORTED_MEDIA,
                format!("content type `{content_type}` is not an accepted image format"),
            ),
            MediaStorageError::PayloadTooLarge { limit_bytes } => Self::new(
                StatusCode::PAYLOAD_TOO_LARGE,
                codes::PAYLOAD_TOO_LARGE,
                format!("uploaded file exceeds the {limit_bytes} byte limit"),
            ),
            MediaStorageError::EmptyPayload => Self::bad_request("uploaded file is empty"),
            MediaStorageError::InvalidPath => Self::bad_request("invalid stored path"),
            MediaStorageError::Io(_) => Self::internal("media storage failure"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let report_detail = format!("{}: {}", self.code, self.message);
        let body = ApiErrorBody {
            success: false,
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message,
                details: self.details,
            },
        };
        let mut response = (self.status, Json(body)).into_response();
        // Attach a structured report so shared logging middleware can emit rich diagnostics.
        let report = self.report.unwrap_or_else(|| {
            ErrorReport::from_message("infra::http::api", self.status, report_detail)
        });
        report.attach(&mut response);
        response
    }
}
