use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;

use super::{ObjectStorage, RemoveFailure, StorageError};

/// Filesystem-backed storage for development and tests. Files live under a
/// root directory and are served by the app at `/uploads/{key}`, so public
/// URLs are site-relative.
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a key to a path under the root, rejecting traversal segments.
    fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key
            .split('/')
            .any(|seg| seg.is_empty() || seg == "." || seg == "..")
        {
            return Err(StorageError::new(format!("invalid object key: {key}")));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn upload(
        &self,
        key: &str,
        _content_type: &str,
        bytes: Bytes,
    ) -> Result<String, StorageError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::new(format!("create dir failed: {e}")))?;
        }
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| StorageError::new(format!("write failed: {e}")))?;

        Ok(self.public_url(key))
    }

    async fn remove(&self, keys: &[String]) -> Vec<RemoveFailure> {
        let mut failures = Vec::new();
        for key in keys {
            let path = match self.resolve(key) {
                Ok(p) => p,
                Err(e) => {
                    failures.push(RemoveFailure {
                        key: key.clone(),
                        reason: e.message,
                    });
                    continue;
                }
            };
            if let Err(e) = tokio::fs::remove_file(&path).await {
                failures.push(RemoveFailure {
                    key: key.clone(),
                    reason: e.to_string(),
                });
            }
        }
        failures
    }

    fn public_url(&self, key: &str) -> String {
        format!("/uploads/{key}")
    }
}
