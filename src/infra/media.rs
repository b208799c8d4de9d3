//! Filesystem-backed media storage for catalogue, factory, and design images.

use std::fmt::Write as FmtWrite;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use metrics::counter;
use sha2::{Digest, Sha256};
use slug::slugify;
use thiserror::Error;
use tokio::{fs, io::AsyncWriteExt};
use tracing::debug;
use uuid::Uuid;

use crate::application::media::{MediaDeleteError, MediaPurge};
use crate::config::MediaSettings;

const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Errors that can occur while interacting with the media storage backend.
#[derive(Debug, Error)]
pub enum MediaStorageError {
    #[error("invalid stored path")]
    InvalidPath,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("unsupported media type `{content_type}`")]
    UnsupportedType { content_type: String },
    #[error("uploaded file exceeds the {limit_bytes} byte limit")]
    PayloadTooLarge { limit_bytes: u64 },
    #[error("uploaded file is empty")]
    EmptyPayload,
}

/// What is being uploaded; each kind has its own size ceiling and bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Catalogue, fabric, factory, and design mockup images.
    Image,
    /// Customer logo artwork attached to design enquiries.
    Logo,
}

impl MediaKind {
    pub fn bucket(self) -> &'static str {
        match self {
            MediaKind::Image => "images",
            MediaKind::Logo => "logos",
        }
    }
}

/// Result of storing an upload payload.
#[derive(Debug, Clone)]
pub struct StoredMedia {
    pub stored_path: String,
    pub url: String,
    pub checksum: String,
    pub size_bytes: i64,
}

/// Filesystem-backed media storage rooted at the configured directory.
#[derive(Debug)]
pub struct MediaStorage {
    root: PathBuf,
    base_url: String,
    max_image_bytes: u64,
    max_logo_bytes: u64,
}

impl MediaStorage {
    /// Initialise storage, creating the root directory if necessary.
    pub fn new(settings: &MediaSettings) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&settings.directory)?;
        Ok(Self {
            root: settings.directory.clone(),
            base_url: settings.base_url.clone(),
            max_image_bytes: settings.max_image_bytes.get(),
            max_logo_bytes: settings.max_logo_bytes.get(),
        })
    }

    /// Validate and store a payload, returning metadata describing the asset.
    pub async fn store(
        &self,
        kind: MediaKind,
        original_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<StoredMedia, MediaStorageError> {
        if !ALLOWED_IMAGE_TYPES.contains(&content_type) {
            return Err(MediaStorageError::UnsupportedType {
                content_type: content_type.to_string(),
            });
        }
        if data.is_empty() {
            return Err(MediaStorageError::EmptyPayload);
        }
        let limit = self.limit_for(kind);
        if data.len() as u64 > limit {
            return Err(MediaStorageError::PayloadTooLarge { limit_bytes: limit });
        }

        let stored_path = self.build_stored_path(kind, original_name);
        let absolute = self.resolve(&stored_path)?;
        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut hasher = Sha256::new();
        hasher.update(&data);
        let checksum = hex_from_bytes(&hasher.finalize());
        let size_bytes = data.len() as i64;

        let mut file = fs::File::create(&absolute).await?;
        file.write_all(&data).await?;
        file.flush().await?;

        counter!("filato_media_upload_total", "kind" => kind.bucket()).increment(1);

        Ok(StoredMedia {
            url: self.url_for(&stored_path),
            stored_path,
            checksum,
            size_bytes,
        })
    }

    /// Remove a stored payload. Missing files are treated as success.
    pub async fn delete(&self, stored_path: &str) -> Result<(), MediaStorageError> {
        let absolute = self.resolve(stored_path)?;
        match fs::remove_file(&absolute).await {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(MediaStorageError::Io(err)),
        }
    }

    /// Public URL for a stored path.
    pub fn url_for(&self, stored_path: &str) -> String {
        format!("{}/{stored_path}", self.base_url)
    }

    /// Map a public URL back to its stored path. `None` for URLs this
    /// storage does not serve.
    pub fn stored_path_from_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.base_url)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|path| !path.is_empty())
            .map(ToString::to_string)
    }

    pub fn max_bytes(&self, kind: MediaKind) -> u64 {
        self.limit_for(kind)
    }

    fn limit_for(&self, kind: MediaKind) -> u64 {
        match kind {
            MediaKind::Image => self.max_image_bytes,
            MediaKind::Logo => self.max_logo_bytes,
        }
    }

    /// Reject absolute paths and parent-directory components so a stored
    /// path can never escape the storage root.
    fn resolve(&self, stored_path: &str) -> Result<PathBuf, MediaStorageError> {
        let relative = Path::new(stored_path);
        if relative.is_absolute()
            || relative
                .components()
                .any(|component| matches!(component, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(MediaStorageError::InvalidPath);
        }

        Ok(self.root.join(relative))
    }

    fn build_stored_path(&self, kind: MediaKind, original_name: &str) -> String {
        let (year, month, day) = time::OffsetDateTime::now_utc().to_calendar_date();
        let directory = format!("{}/{year}/{:02}/{:02}", kind.bucket(), month as u8, day);
        let identifier = Uuid::new_v4();
        let filename = sanitize_filename(original_name);
        format!("{directory}/{identifier}-{filename}")
    }
}

#[async_trait]
impl MediaPurge for MediaStorage {
    async fn delete_by_url(&self, url: &str) -> Result<(), MediaDeleteError> {
        let Some(stored_path) = self.stored_path_from_url(url) else {
            debug!(url, "URL is not served from media storage; nothing to delete");
            return Ok(());
        };
        self.delete(&stored_path)
            .await
            .map_err(|err| MediaDeleteError {
                url: url.to_string(),
                reason: err.to_string(),
            })
    }
}

fn sanitize_filename(original: &str) -> String {
    let path = Path::new(original);
    let stem = path
        .file_stem()
        .and_then(|value| value.to_str())
        .unwrap_or("upload");
    let mut base = slugify(stem);
    if base.is_empty() {
        base = "upload".to_string();
    }

    let extension = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.trim_matches('.').to_ascii_lowercase())
        .filter(|value| !value.is_empty());

    match extension {
        Some(ext) => format!("{base}.{ext}"),
        None => base,
    }
}

fn hex_from_bytes(bytes: &[u8]) -> String {
    let mut output = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = FmtWrite::write_fmt(&mut output, format_args!("{byte:02x}"));
    }
    output
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU64;

    use super::*;

    fn settings(root: PathBuf) -> MediaSettings {
        MediaSettings {
            directory: root,
            base_url: "/uploads".to_string(),
            max_image_bytes: NonZeroU64::new(5 * 1024 * 1024).expect("non-zero"),
            max_logo_bytes: NonZeroU64::new(2 * 1024 * 1024).expect("non-zero"),
        }
    }

    fn temp_storage() -> MediaStorage {
        let root = std::env::temp_dir().join(format!("filato-media-{}", Uuid::new_v4()));
        MediaStorage::new(&settings(root)).expect("storage root created")
    }

    #[tokio::test]
    async fn store_and_delete_roundtrip() {
        let storage = temp_storage();
        let stored = storage
            .store(
                MediaKind::Image,
                "Hoodie Front.PNG",
                "image/png",
                Bytes::from_static(b"fake png bytes"),
            )
            .await
            .expect("stored");

        assert!(stored.stored_path.starts_with("images/"));
        assert!(stored.stored_path.ends_with("hoodie-front.png"));
        assert!(stored.url.starts_with("/uploads/images/"));
        assert_eq!(stored.size_bytes, 14);
        assert_eq!(stored.checksum.len(), 64);

        storage.delete(&stored.stored_path).await.expect("deleted");
        // Second delete: already gone, still success.
        storage.delete(&stored.stored_path).await.expect("idempotent");
    }

    #[tokio::test]
    async fn rejects_unsupported_content_type() {
        let storage = temp_storage();
        let result = storage
            .store(
                MediaKind::Image,
                "payload.svg",
                "image/svg+xml",
                Bytes::from_static(b"<svg/>"),
            )
            .await;
        assert!(matches!(
            result,
            Err(MediaStorageError::UnsupportedType { .. })
        ));
    }

    #[tokio::test]
    async fn rejects_oversized_logo() {
        let root = std::env::temp_dir().join(format!("filato-media-{}", Uuid::new_v4()));
        let mut settings = settings(root);
        settings.max_logo_bytes = NonZeroU64::new(8).expect("non-zero");
        let storage = MediaStorage::new(&settings).expect("storage root created");

        let result = storage
            .store(
                MediaKind::Logo,
                "logo.png",
                "image/png",
                Bytes::from_static(b"way more than eight bytes"),
            )
            .await;
        assert!(matches!(
            result,
            Err(MediaStorageError::PayloadTooLarge { limit_bytes: 8 })
        ));
    }

    #[tokio::test]
    async fn rejects_empty_payload() {
        let storage = temp_storage();
        let result = storage
            .store(MediaKind::Image, "empty.png", "image/png", Bytes::new())
            .await;
        assert!(matches!(result, Err(MediaStorageError::EmptyPayload)));
    }

    #[test]
    fn traversal_paths_are_rejected() {
        let storage = temp_storage();
        assert!(matches!(
            storage.resolve("../../etc/passwd"),
            Err(MediaStorageError::InvalidPath)
        ));
        assert!(matches!(
            storage.resolve("/etc/passwd"),
            Err(MediaStorageError::InvalidPath)
        ));
    }

    #[test]
    fn url_mapping_roundtrips() {
        let storage = temp_storage();
        let url = storage.url_for("images/2026/03/10/abc-front.png");
        assert_eq!(
            storage.stored_path_from_url(&url).as_deref(),
            Some("images/2026/03/10/abc-front.png")
        );
        assert_eq!(
            storage.stored_path_from_url("https://cdn.example.com/x.png"),
            None
        );
    }

    #[tokio::test]
    async fn delete_by_url_ignores_foreign_urls() {
        let storage = temp_storage();
        storage
            .delete_by_url("https://cdn.example.com/x.png")
            .await
            .expect("foreign URL is a no-op");
    }
}
