//! Filesystem object store.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::{AssetBucket, ObjectStore, StorageError};

/// Stores objects under `{root}/{bucket}/{key}`.
///
/// Objects are written to a hidden temporary file and renamed into place, so
/// a failed write leaves nothing under the final key.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    public_url: String,
}

impl LocalObjectStore {
    /// Create a store rooted at `root`, served at `public_url`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, public_url: &str) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(
        &self,
        bucket: AssetBucket,
        key: &str,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<String, StorageError> {
        let dir = self.root.join(bucket.as_str());
        fs::create_dir_all(&dir).await?;

        let target = dir.join(key);
        let staging = dir.join(format!(".{key}.partial"));

        if let Err(e) = fs::write(&staging, bytes).await {
            let _ = fs::remove_file(&staging).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&staging, &target).await {
            let _ = fs::remove_file(&staging).await;
            return Err(e.into());
        }

        Ok(format!("{}/{bucket}/{key}", self.public_url))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_writes_file_and_returns_url() {
        let root = std::env::temp_dir().join(format!("gd-uploads-{}", uuid::Uuid::new_v4()));
        let store = LocalObjectStore::new(&root, "https://admin.example.org/uploads/");

        let url = store
            .put(AssetBucket::GalleryImages, "1-abc.png", b"png", "image/png")
            .await
            .unwrap();

        assert_eq!(url, "https://admin.example.org/uploads/gallery-images/1-abc.png");
        let written = fs::read(root.join("gallery-images/1-abc.png")).await.unwrap();
        assert_eq!(written, b"png");
        assert!(!root.join("gallery-images/.1-abc.png.partial").exists());

        fs::remove_dir_all(&root).await.unwrap();
    }
}
