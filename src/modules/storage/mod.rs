//! Object storage for media attachments
//!
//! Provides the [`ObjectStorage`] seam plus a MinIO/S3-compatible client and
//! an in-process implementation for tests.

mod memory;
mod minio_client;

pub use memory::MemoryStorage;
pub use minio_client::MinIOClient;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage client error: {0}")]
    Client(String),

    #[error("Failed to upload '{key}': {reason}")]
    Upload { key: String, reason: String },

    #[error("Failed to remove '{key}': {reason}")]
    Remove { key: String, reason: String },
}

/// Bucketed blob store that can hand out public URLs
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Publicly resolvable URL for an object. Does not check existence.
    fn public_url(&self, bucket: &str, key: &str) -> String;

    async fn remove(&self, bucket: &str, keys: &[String]) -> Result<(), StorageError>;
}

/// Percent-encode each path segment of an object key, keeping the slashes
pub(crate) fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
