use axum::extract::{Multipart, Path, Query, State};
use axum::response::IntoResponse;

use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{
    UploadKind, UploadQuery, UploadResponse, created_response, empty_response,
};
use crate::infra::http::api::state::ApiState;
use crate::infra::media::MediaKind;

/// Accepts one multipart `file` field. The `kind` query parameter picks the
/// bucket and size ceiling; logos get the tighter limit.
pub async fn upload_media(
    State(state): State<ApiState>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let kind = match query.kind {
        Some(UploadKind::Logo) => MediaKind::Logo,
        Some(UploadKind::Image) | None => MediaKind::Image,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(err.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .map(ToString::to_string)
            .or_else(|| {
                mime_guess::from_path(&file_name)
                    .first()
                    .map(|mime| mime.essence_str().to_string())
            })
            .ok_or_else(|| ApiError::bad_request("upload is missing a content type"))?;
        let data = field
            .bytes()
            .await
            .map_err(|err| ApiError::bad_request(err.to_string()))?;

        let stored = state.media.store(kind, &file_name, &content_type, data).await?;
        return Ok(created_response(UploadResponse {
            url: stored.url,
            stored_path: stored.stored_path,
            checksum: stored.checksum,
            size_bytes: stored.size_bytes,
        }));
    }

    Err(ApiError::bad_request(
        "multipart body must contain a `file` field",
    ))
}

/// Removes a stored object by its path under the media root. Deleting an
/// object that is already gone succeeds.
pub async fn delete_media(
    State(state): State<ApiState>,
    Path(stored_path): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.media.delete(&stored_path).await?;
    Ok(empty_response())
}
