mod catalogue;
mod clothing_types;
mod design_enquiries;
mod design_templates;
mod enquiries;
mod fabrics;
mod factory_photos;
mod health;
mod reviews;
mod settings;
mod uploads;

pub use catalogue::*;
pub use clothing_types::*;
pub use design_enquiries::*;
pub use design_templates::*;
pub use enquiries::*;
pub use fabrics::*;
pub use factory_photos::*;
pub use health::*;
pub use reviews::*;
pub use settings::*;
pub use uploads::*;

use std::future::Future;

use uuid::Uuid;

use crate::application::repos::RepoError;
use crate::domain::slug::{SlugAsyncError, derive_slug, generate_unique_slug_async};
use crate::infra::http::api::error::ApiError;

/// Mutating routes address rows by id only; slugs are a read-side affordance.
pub(super) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::try_parse(raw).map_err(|_| ApiError::bad_request("identifier must be a UUID"))
}

/// Slug for a new row: the requested slug (or the display name) normalized,
/// then suffixed until it clears the uniqueness predicate.
pub(super) async fn resolve_slug<F, Fut>(
    requested: Option<String>,
    name: &str,
    is_unique: F,
) -> Result<String, ApiError>
where
    F: FnMut(&str) -> Fut,
    Fut: Future<Output = Result<bool, RepoError>>,
{
    let source = requested.as_deref().unwrap_or(name);
    generate_unique_slug_async(source, is_unique)
        .await
        .map_err(|err| match err {
            SlugAsyncError::Slug(err) => ApiError::bad_request(err.to_string()),
            SlugAsyncError::Predicate(err) => ApiError::from(err),
        })
}

/// Normalize an explicitly requested slug on update; collisions surface from
/// the unique index as a conflict.
pub(super) fn normalize_slug(requested: Option<String>) -> Result<Option<String>, ApiError> {
    requested
        .map(|raw| derive_slug(&raw).map_err(|err| ApiError::bad_request(err.to_string())))
        .transpose()
}
