//! HTTP object storage client.
//!
//! Speaks the storage API used by hosted Postgres platforms:
//!
//! - Upload: `PUT {endpoint}/object/{bucket}/{key}` with a bearer service key
//! - Public URL: `{endpoint}/object/public/{bucket}/{key}`

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::{AssetBucket, ObjectStore, StorageError};

/// Remote object store client.
#[derive(Clone)]
pub struct RemoteObjectStore {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteObjectStore {
    /// Create a client for `endpoint` authenticated with `service_key`.
    ///
    /// # Errors
    ///
    /// Returns error if the key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(endpoint: &Url, service_key: &SecretString) -> Result<Self, StorageError> {
        let mut headers = HeaderMap::new();

        let mut auth_value = HeaderValue::from_str(&format!(
            "Bearer {}",
            service_key.expose_secret()
        ))
        .map_err(|e| StorageError::Api {
            status: 0,
            message: format!("invalid service key format: {e}"),
        })?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn object_url(&self, bucket: AssetBucket, key: &str) -> String {
        format!("{}/object/{bucket}/{key}", self.endpoint)
    }

    fn public_url(&self, bucket: AssetBucket, key: &str) -> String {
        format!("{}/object/public/{bucket}/{key}", self.endpoint)
    }
}

#[async_trait]
impl ObjectStore for RemoteObjectStore {
    async fn put(
        &self,
        bucket: AssetBucket,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, StorageError> {
        let response = self
            .client
            .put(self.object_url(bucket, key))
            .header(CONTENT_TYPE, content_type)
            .body(bytes.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StorageError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(self.public_url(bucket, key))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let endpoint = Url::parse("https://storage.example.org/storage/v1/").unwrap();
        let store = RemoteObjectStore::new(&endpoint, &SecretString::from("service-key")).unwrap();

        assert_eq!(
            store.object_url(AssetBucket::EventImages, "1-a.jpg"),
            "https://storage.example.org/storage/v1/object/event-images/1-a.jpg"
        );
        assert_eq!(
            store.public_url(AssetBucket::EventImages, "1-a.jpg"),
            "https://storage.example.org/storage/v1/object/public/event-images/1-a.jpg"
        );
    }
}
