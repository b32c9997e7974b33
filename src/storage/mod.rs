pub mod bucket;
pub mod local;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

#[derive(Debug)]
pub struct StorageError {
    pub message: String,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for StorageError {}

/// A removal that failed for one key. Removals are best-effort: callers log
/// these and carry on.
#[derive(Debug)]
pub struct RemoveFailure {
    pub key: String,
    pub reason: String,
}

/// Binary image storage. Objects are publicly retrievable immediately after
/// a successful upload.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload an object and return its public URL.
    async fn upload(
        &self,
        key: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<String, StorageError>;

    /// Remove a set of objects. Per-key failures are returned, not raised.
    async fn remove(&self, keys: &[String]) -> Vec<RemoveFailure>;

    fn public_url(&self, key: &str) -> String;
}

/// Derive an object key for an image, namespaced by project id with a
/// timestamp plus the sanitized original filename to avoid overwrites.
pub fn object_key(project_id: Uuid, filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{project_id}/{}_{sanitized}", Utc::now().timestamp_millis())
}

/// Log removal failures; used wherever removal is best-effort.
pub fn log_remove_failures(context: &str, failures: &[RemoveFailure]) {
    for failure in failures {
        tracing::warn!(
            key = %failure.key,
            "{context}: failed to remove storage object: {}",
            failure.reason
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_key_sanitizes_filename() {
        let id = Uuid::now_v7();
        let key = object_key(id, "übergröße photo (1).png");
        let (prefix, rest) = key.split_once('/').expect("key is namespaced");
        assert_eq!(prefix, id.to_string());
        let (_, name) = rest.split_once('_').expect("key carries a timestamp");
        assert!(
            name.chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        );
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn object_keys_do_not_collide_for_same_name() {
        let id = Uuid::now_v7();
        let a = object_key(id, "a.png");
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = object_key(id, "a.png");
        assert_ne!(a, b);
    }
}
