use async_trait::async_trait;
use bytes::Bytes;

use super::{ObjectStorage, RemoveFailure, StorageError};

/// Hosted bucket storage over its HTTP API. Uploads land at
/// `{base}/storage/v1/object/{bucket}/{key}` and are publicly readable at
/// `{base}/storage/v1/object/public/{bucket}/{key}`.
pub struct BucketStorage {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl BucketStorage {
    pub fn new(base_url: &str, service_key: &str, bucket: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build reqwest client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
            bucket: bucket.to_string(),
        }
    }

    fn object_endpoint(&self, key: &str) -> String {
        format!("{}/storage/v1/object/{}/{key}", self.base_url, self.bucket)
    }
}

#[async_trait]
impl ObjectStorage for BucketStorage {
    async fn upload(
        &self,
        key: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<String, StorageError> {
        let resp = self
            .client
            .post(self.object_endpoint(key))
            .bearer_auth(&self.service_key)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| StorageError::new(format!("upload request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(StorageError::new(format!(
                "upload rejected with {status}: {body}"
            )));
        }

        Ok(self.public_url(key))
    }

    async fn remove(&self, keys: &[String]) -> Vec<RemoveFailure> {
        let mut failures = Vec::new();
        for key in keys {
            let result = self
                .client
                .delete(self.object_endpoint(key))
                .bearer_auth(&self.service_key)
                .send()
                .await;

            match result {
                Ok(resp) if resp.status().is_success() => {}
                Ok(resp) => failures.push(RemoveFailure {
                    key: key.clone(),
                    reason: format!("delete rejected with {}", resp.status()),
                }),
                Err(e) => failures.push(RemoveFailure {
                    key: key.clone(),
                    reason: format!("delete request failed: {e}"),
                }),
            }
        }
        failures
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{key}",
            self.base_url, self.bucket
        )
    }
}
