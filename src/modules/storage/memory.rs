use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{encode_key, ObjectStorage, StorageError};

/// An object held by [`MemoryStorage`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// In-process object storage with switchable upload/remove failures
pub struct MemoryStorage {
    base_url: String,
    objects: RwLock<HashMap<(String, String), StoredBlob>>,
    fail_uploads: AtomicBool,
    fail_removals: AtomicBool,
}

impl MemoryStorage {
    pub const DEFAULT_BASE_URL: &'static str = "https://storage.test";

    pub fn new() -> Self {
        Self::with_base_url(Self::DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: RwLock::new(HashMap::new()),
            fail_uploads: AtomicBool::new(false),
            fail_removals: AtomicBool::new(false),
        }
    }

    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_removals(&self, fail: bool) {
        self.fail_removals.store(fail, Ordering::SeqCst);
    }

    pub async fn get(&self, bucket: &str, key: &str) -> Option<StoredBlob> {
        self.objects
            .read()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Keys currently stored in `bucket`, sorted
    pub async fn keys(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .read()
            .await
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        keys
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::Upload {
                key: key.to_string(),
                reason: "memory storage is in failure mode".to_string(),
            });
        }

        self.objects.write().await.insert(
            (bucket.to_string(), key.to_string()),
            StoredBlob {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}/{}", self.base_url, bucket, encode_key(key))
    }

    async fn remove(&self, bucket: &str, keys: &[String]) -> Result<(), StorageError> {
        if self.fail_removals.load(Ordering::SeqCst) {
            return Err(StorageError::Remove {
                key: keys.join(","),
                reason: "memory storage is in failure mode".to_string(),
            });
        }

        let mut objects = self.objects.write().await;
        for key in keys {
            objects.remove(&(bucket.to_string(), key.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_then_remove() {
        let storage = MemoryStorage::new();
        storage
            .upload("announcements", "news/a.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();

        let blob = storage.get("announcements", "news/a.png").await.unwrap();
        assert_eq!(blob.data, vec![1, 2, 3]);
        assert_eq!(
            storage.public_url("announcements", "news/a.png"),
            "https://storage.test/announcements/news/a.png"
        );

        storage
            .remove("announcements", &["news/a.png".to_string()])
            .await
            .unwrap();
        assert!(storage.keys("announcements").await.is_empty());
    }

    #[tokio::test]
    async fn test_upload_failure_mode_stores_nothing() {
        let storage = MemoryStorage::new();
        storage.set_fail_uploads(true);
        let err = storage
            .upload("members", "photos/a.png", vec![0], "image/png")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Upload { .. }));
        assert!(storage.keys("members").await.is_empty());
    }
}
