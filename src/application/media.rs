//! Media storage seam used by workflows that purge stored files.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("media delete failed for `{url}`: {reason}")]
pub struct MediaDeleteError {
    pub url: String,
    pub reason: String,
}

/// Deletion side of media storage. Uploads stay on the concrete storage type;
/// only cleanup flows go through this trait so they can be exercised without
/// a filesystem.
#[async_trait]
pub trait MediaPurge: Send + Sync {
    /// Delete the stored object a public URL points at. Deleting an object
    /// that is already gone is a success.
    async fn delete_by_url(&self, url: &str) -> Result<(), MediaDeleteError>;
}
