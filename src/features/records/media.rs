use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::features::records::model::MediaFile;
use crate::features::records::schema::MediaSpec;
use crate::modules::storage::{ObjectStorage, StorageError};

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    pub url: String,
    pub key: String,
    /// The caller's original filename
    pub filename: String,
}

/// Puts media binaries into object storage under generated keys
#[derive(Clone)]
pub struct MediaUploader {
    storage: Arc<dyn ObjectStorage>,
}

impl MediaUploader {
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self { storage }
    }

    /// `{folder}/{unix_millis}-{random8}.{ext}`
    pub fn generate_key(folder: &str, file: &MediaFile) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!(
            "{}/{}-{}.{}",
            folder,
            Utc::now().timestamp_millis(),
            &suffix[..8],
            extension_for(file)
        )
    }

    pub async fn upload(&self, spec: &MediaSpec, file: MediaFile) -> Result<StoredMedia, StorageError> {
        let key = Self::generate_key(spec.folder, &file);
        debug!(
            "Uploading media '{}' ({} bytes) to {}/{}",
            file.filename,
            file.data.len(),
            spec.bucket,
            key
        );

        self.storage
            .upload(spec.bucket, &key, file.data, &file.content_type)
            .await?;

        Ok(StoredMedia {
            url: self.storage.public_url(spec.bucket, &key),
            key,
            filename: file.filename,
        })
    }

    pub async fn remove(&self, bucket: &str, keys: &[String]) -> Result<(), StorageError> {
        self.storage.remove(bucket, keys).await.inspect_err(|e| {
            warn!("Failed to remove media {:?} from '{}': {}", keys, bucket, e);
        })
    }
}

/// File extension, from the filename or else the content type
fn extension_for(file: &MediaFile) -> String {
    file.filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| extension_for_content_type(&file.content_type).to_string())
}

pub fn extension_for_content_type(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "bin",
    }
}

/// Last path segment of a media URL, used as the stored filename when the
/// caller supplies a URL rather than a binary
pub fn filename_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segment = path.rsplit('/').next().unwrap_or(path);
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}
