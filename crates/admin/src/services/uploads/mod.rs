//! Image uploads for dashboard content.
//!
//! [`UploadService`] checks every upload (signed-in admin, non-empty, a
//! raster `image/*` content type, within the size limit) before the
//! [`ObjectStore`] is called, names the object, and returns its public URL.
//!
//! # Backends
//!
//! - [`LocalObjectStore`] - files on disk, served by the admin binary
//! - [`RemoteObjectStore`] - HTTP object storage with a service key
//! - [`MemoryObjectStore`] - in-process, for tests

mod local;
mod memory;
mod remote;

pub use local::LocalObjectStore;
pub use memory::MemoryObjectStore;
pub use remote::RemoteObjectStore;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::models::CurrentAdmin;

/// Default upload limit: 5 MiB.
pub const DEFAULT_MAX_BYTES: usize = 5 * 1024 * 1024;

const KEY_SUFFIX_LEN: usize = 12;
const KEY_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Accepted `image/*` subtypes. Scriptable formats such as `svg+xml` are refused.
const RASTER_SUBTYPES: &[&str] = &["png", "jpeg", "gif", "webp", "avif"];

/// Extensions a stored object may carry.
const RASTER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "avif"];

/// Storage bucket for an uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetBucket {
    ProgramImages,
    StoryImages,
    GalleryImages,
    EventImages,
}

impl AssetBucket {
    /// Every bucket.
    pub const ALL: [Self; 4] = [
        Self::ProgramImages,
        Self::StoryImages,
        Self::GalleryImages,
        Self::EventImages,
    ];

    /// Bucket name as used in paths and URLs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProgramImages => "program-images",
            Self::StoryImages => "story-images",
            Self::GalleryImages => "gallery-images",
            Self::EventImages => "event-images",
        }
    }
}

impl fmt::Display for AssetBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetBucket {
    type Err = UploadRejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| UploadRejection::UnknownBucket(s.to_owned()))
    }
}

/// Why an upload was refused before reaching storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    /// No file content.
    #[error("file is empty")]
    Empty,

    /// Content type is not a supported raster `image/*` type.
    #[error("only PNG, JPEG, GIF, WebP or AVIF images are accepted (got {0})")]
    NotAnImage(String),

    /// File exceeds the configured limit.
    #[error("file is {size} bytes; the limit is {max} bytes")]
    TooLarge {
        /// Size of the submitted file.
        size: usize,
        /// Configured limit.
        max: usize,
    },

    /// Bucket name not recognised.
    #[error("unknown bucket: {0}")]
    UnknownBucket(String),
}

/// Errors from object storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Local filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote storage answered with a non-success status.
    #[error("storage API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// Errors from [`UploadService::upload`].
#[derive(Debug, Error)]
pub enum UploadError {
    /// Upload attempted without a signed-in admin.
    #[error("authentication required")]
    AuthRequired,

    /// Upload refused before storage was called.
    #[error(transparent)]
    Rejected(#[from] UploadRejection),

    /// Storage backend failed; nothing was stored.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A stored upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredAsset {
    pub bucket: AssetBucket,
    pub key: String,
    pub url: String,
}

/// Somewhere to put uploaded objects.
///
/// `put` is all-or-nothing: on error no object exists under `key`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` and return the object's public URL.
    async fn put(
        &self,
        bucket: AssetBucket,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, StorageError>;
}

/// Validates and stores image uploads.
#[derive(Clone)]
pub struct UploadService {
    store: Arc<dyn ObjectStore>,
    max_bytes: usize,
}

impl UploadService {
    /// Create an upload service with a size limit.
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, max_bytes: usize) -> Self {
        Self { store, max_bytes }
    }

    /// The configured size limit.
    #[must_use]
    pub const fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Check an upload without storing it.
    ///
    /// # Errors
    ///
    /// Returns the first [`UploadRejection`] that applies.
    pub fn check(&self, content_type: Option<&str>, bytes: &[u8]) -> Result<(), UploadRejection> {
        if bytes.is_empty() {
            return Err(UploadRejection::Empty);
        }
        let content_type = content_type.unwrap_or_default();
        if raster_subtype(content_type).is_none() {
            return Err(UploadRejection::NotAnImage(if content_type.is_empty() {
                "no content type".to_string()
            } else {
                content_type.to_string()
            }));
        }
        if bytes.len() > self.max_bytes {
            return Err(UploadRejection::TooLarge {
                size: bytes.len(),
                max: self.max_bytes,
            });
        }
        Ok(())
    }

    /// Validate and store an image as `actor`.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` or `Rejected` without calling storage, and
    /// `Storage` if the backend fails.
    pub async fn upload(
        &self,
        actor: Option<&CurrentAdmin>,
        bucket: AssetBucket,
        file_name: Option<&str>,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<StoredAsset, UploadError> {
        let actor = actor.ok_or(UploadError::AuthRequired)?;
        if let Err(rejection) = self.check(content_type, bytes) {
            warn!(%bucket, %rejection, "upload rejected");
            return Err(rejection.into());
        }
        let content_type = content_type.unwrap_or_default();

        let key = object_key(file_name, content_type);
        let url = self.store.put(bucket, &key, bytes, content_type).await?;

        info!(%bucket, %key, size = bytes.len(), admin_id = %actor.id, "image uploaded");
        Ok(StoredAsset { bucket, key, url })
    }
}

/// The subtype of an `image/*` content type, lowercased, without parameters.
fn image_subtype(content_type: &str) -> Option<String> {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    let (kind, subtype) = essence.split_once('/')?;
    (kind.eq_ignore_ascii_case("image") && !subtype.is_empty())
        .then(|| subtype.to_ascii_lowercase())
}

/// The subtype of a content type [`UploadService`] accepts.
fn raster_subtype(content_type: &str) -> Option<String> {
    image_subtype(content_type).filter(|subtype| RASTER_SUBTYPES.contains(&subtype.as_str()))
}

/// File extension for the stored object.
///
/// Taken from the file name when it is a known raster extension, otherwise
/// derived from the image subtype. Files are served by extension, so nothing
/// outside [`RASTER_EXTENSIONS`] is ever produced.
fn extension(file_name: Option<&str>, content_type: &str) -> String {
    let from_name = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| RASTER_EXTENSIONS.contains(&ext.as_str()));
    if let Some(ext) = from_name {
        return ext;
    }

    match raster_subtype(content_type).as_deref() {
        Some("jpeg") | None => "jpg".to_string(),
        Some(other) => other.to_string(),
    }
}

/// `{unix_millis}-{12 random lowercase alphanumerics}.{ext}`.
fn object_key(file_name: Option<&str>, content_type: &str) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..KEY_SUFFIX_LEN)
        .filter_map(|_| KEY_CHARSET.choose(&mut rng).map(|&b| char::from(b)))
        .collect();
    format!(
        "{}-{suffix}.{}",
        Utc::now().timestamp_millis(),
        extension(file_name, content_type)
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_names() {
        for bucket in AssetBucket::ALL {
            assert_eq!(bucket.as_str().parse::<AssetBucket>().unwrap(), bucket);
        }
        assert!("avatars".parse::<AssetBucket>().is_err());
    }

    #[test]
    fn test_image_subtype() {
        assert_eq!(image_subtype("image/PNG").as_deref(), Some("png"));
        assert_eq!(image_subtype("image/jpeg; q=1").as_deref(), Some("jpeg"));
        assert_eq!(image_subtype("application/pdf"), None);
        assert_eq!(image_subtype("image/"), None);
    }

    #[test]
    fn test_extension_prefers_file_name() {
        assert_eq!(extension(Some("Temple Gate.JPG"), "image/jpeg"), "jpg");
        assert_eq!(extension(Some("no-extension"), "image/jpeg"), "jpg");
        assert_eq!(extension(Some("evil.p/h?p"), "image/webp"), "webp");
        assert_eq!(extension(Some("banner.html"), "image/png"), "png");
        assert_eq!(extension(Some("logo.svg"), "image/gif"), "gif");
    }

    #[test]
    fn test_check_refuses_scriptable_images() {
        let service = UploadService::new(Arc::new(MemoryObjectStore::new()), DEFAULT_MAX_BYTES);
        let svg = b"<svg xmlns='http://www.w3.org/2000/svg'><script>alert(1)</script></svg>";
        assert!(matches!(
            service.check(Some("image/svg+xml"), svg),
            Err(UploadRejection::NotAnImage(_))
        ));
        assert!(matches!(
            service.check(Some("image/x-icon"), b"ico"),
            Err(UploadRejection::NotAnImage(_))
        ));
        assert!(service.check(Some("image/webp"), b"RIFF").is_ok());
    }

    #[test]
    fn test_object_key_shape() {
        let key = object_key(Some("cow.png"), "image/png");
        let (millis, rest) = key.split_once('-').unwrap();
        let (suffix, ext) = rest.split_once('.').unwrap();

        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), KEY_SUFFIX_LEN);
        assert!(suffix.bytes().all(|b| KEY_CHARSET.contains(&b)));
        assert_eq!(ext, "png");
    }

    #[test]
    fn test_check_order() {
        let service = UploadService::new(Arc::new(MemoryObjectStore::new()), 4);
        assert_eq!(service.check(Some("image/png"), b""), Err(UploadRejection::Empty));
        assert!(matches!(
            service.check(Some("text/plain"), b"hi"),
            Err(UploadRejection::NotAnImage(_))
        ));
        assert_eq!(
            service.check(Some("image/png"), b"12345"),
            Err(UploadRejection::TooLarge { size: 5, max: 4 })
        );
        assert!(service.check(Some("image/png"), b"1234").is_ok());
    }
}
