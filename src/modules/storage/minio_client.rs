//! MinIO/S3-compatible storage client
//!
//! Media is written to a handful of buckets (one per media family) that are
//! publicly readable, so stored objects are addressed by plain URLs.
//!
//! Uses rust-s3 crate for lightweight S3 operations.

use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{Client, Url};
use s3::creds::Credentials;
use s3::request::ResponseData;
use s3::{Bucket, BucketConfiguration, Region};
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use super::{encode_key, ObjectStorage, StorageError};
use crate::core::config::MinIOConfig;

type HmacSha256 = Hmac<Sha256>;

/// MinIO/S3-compatible storage client
pub struct MinIOClient {
    region: Region,
    credentials: Credentials,
    endpoint: String,
    public_endpoint: String,
    /// Access key for AWS Signature v4 signing
    access_key: String,
    /// Secret key for AWS Signature v4 signing
    secret_key: String,
    /// Region name for AWS Signature v4 signing
    region_name: String,
    /// HTTP client for bucket policy operations
    http_client: Client,
}

impl MinIOClient {
    /// Create a new MinIO client from configuration
    pub fn new(config: MinIOConfig) -> Result<Self, StorageError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Client(format!("Failed to create MinIO credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let http_client = Client::builder()
            .build()
            .map_err(|e| StorageError::Client(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "MinIO client initialized for endpoint: {}, public endpoint: {}",
            config.endpoint, config.public_endpoint
        );

        Ok(Self {
            region,
            credentials,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            public_endpoint: config.public_endpoint.trim_end_matches('/').to_string(),
            access_key: config.access_key,
            secret_key: config.secret_key,
            region_name: config.region,
            http_client,
        })
    }

    /// Handle for one bucket, using path-style URLs
    /// (http://endpoint/bucket instead of http://bucket.endpoint)
    fn bucket(&self, name: &str) -> Result<Box<Bucket>, StorageError> {
        let mut bucket = Bucket::new(name, self.region.clone(), self.credentials.clone())
            .map_err(|e| StorageError::Client(format!("Failed to open bucket '{}': {}", name, e)))?;
        bucket.set_path_style();
        Ok(bucket)
    }

    /// Create each bucket if missing and make it publicly readable.
    ///
    /// Policy failures are logged, not fatal: the policy can be set by hand.
    pub async fn ensure_buckets(&self, names: &[&str]) -> Result<(), StorageError> {
        for name in names {
            self.ensure_bucket_exists(name).await?;
            if let Err(e) = self.set_public_read_policy(name).await {
                warn!(
                    "Failed to set bucket policy for '{}': {}. \
                    You may need to set it manually: mc anonymous set download minio/{}",
                    name, e, name
                );
            }
        }
        Ok(())
    }

    async fn ensure_bucket_exists(&self, name: &str) -> Result<(), StorageError> {
        let result = Bucket::create_with_path_style(
            name,
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        match result {
            Ok(response) if response.success() => {
                info!("Bucket '{}' created", name);
                Ok(())
            }
            Ok(response) => {
                if response.response_text.contains("BucketAlreadyOwnedByYou")
                    || response.response_text.contains("BucketAlreadyExists")
                {
                    debug!("Bucket '{}' already exists", name);
                } else {
                    warn!(
                        "Could not create bucket '{}' (HTTP {}). Assuming it exists.",
                        name, response.response_code
                    );
                }
                Ok(())
            }
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                    || error_str.contains("already own it")
                {
                    debug!("Bucket '{}' already exists", name);
                } else {
                    warn!("Could not create bucket '{}': {}. Assuming it exists.", name, e);
                }
                Ok(())
            }
        }
    }

    /// Grant anonymous `s3:GetObject` on the whole bucket
    async fn set_public_read_policy(&self, bucket_name: &str) -> Result<(), StorageError> {
        let policy = json!({
            "Version": "2012-10-17",
            "Statement": [
                {
                    "Effect": "Allow",
                    "Principal": {"AWS": "*"},
                    "Action": ["s3:GetObject"],
                    "Resource": [format!("arn:aws:s3:::{bucket_name}/*")]
                }
            ]
        })
        .to_string();

        self.put_bucket_policy_with_sigv4(bucket_name, &policy).await?;
        info!("Set public read policy for {}/*", bucket_name);
        Ok(())
    }

    /// Put bucket policy using AWS Signature v4
    async fn put_bucket_policy_with_sigv4(
        &self,
        bucket_name: &str,
        policy: &str,
    ) -> Result<(), StorageError> {
        let now = Utc::now();
        let date_stamp = now.format("%Y%m%d").to_string();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();

        let endpoint_url = Url::parse(&self.endpoint)
            .map_err(|e| StorageError::Client(format!("Invalid endpoint URL: {}", e)))?;
        let host = endpoint_url
            .host_str()
            .ok_or_else(|| StorageError::Client("Endpoint URL has no host".to_string()))?;
        let host_header = match endpoint_url.port() {
            Some(p) => format!("{}:{}", host, p),
            None => host.to_string(),
        };

        let url = format!("{}/{}?policy", self.endpoint, bucket_name);
        let payload_hash = hex::encode(Sha256::digest(policy.as_bytes()));

        let canonical_headers = format!(
            "host:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n",
            host_header, payload_hash, amz_date
        );
        let signed_headers = "host;x-amz-content-sha256;x-amz-date";
        let canonical_request = format!(
            "PUT\n/{}\npolicy=\n{}\n{}\n{}",
            bucket_name, canonical_headers, signed_headers, payload_hash
        );

        let algorithm = "AWS4-HMAC-SHA256";
        let credential_scope = format!("{}/{}/s3/aws4_request", date_stamp, self.region_name);
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            algorithm,
            amz_date,
            credential_scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let signature = self.calculate_signature(&date_stamp, &string_to_sign)?;
        let authorization_header = format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            algorithm, self.access_key, credential_scope, signed_headers, signature
        );

        let response = self
            .http_client
            .put(&url)
            .header("Host", &host_header)
            .header("x-amz-date", &amz_date)
            .header("x-amz-content-sha256", &payload_hash)
            .header("Authorization", &authorization_header)
            .header("Content-Type", "application/json")
            .body(policy.to_string())
            .send()
            .await
            .map_err(|e| StorageError::Client(format!("Failed to send policy request: {}", e)))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(StorageError::Client(format!(
                "Failed to set bucket policy: {} - {}",
                status, body
            )))
        }
    }

    /// Calculate AWS Signature v4 signature
    fn calculate_signature(
        &self,
        date_stamp: &str,
        string_to_sign: &str,
    ) -> Result<String, StorageError> {
        let k_date = Self::hmac_sha256(
            format!("AWS4{}", self.secret_key).as_bytes(),
            date_stamp.as_bytes(),
        )?;
        let k_region = Self::hmac_sha256(&k_date, self.region_name.as_bytes())?;
        let k_service = Self::hmac_sha256(&k_region, b"s3")?;
        let k_signing = Self::hmac_sha256(&k_service, b"aws4_request")?;

        let signature = Self::hmac_sha256(&k_signing, string_to_sign.as_bytes())?;
        Ok(hex::encode(signature))
    }

    fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, StorageError> {
        let mut mac = HmacSha256::new_from_slice(key)
            .map_err(|e| StorageError::Client(format!("HMAC key error: {}", e)))?;
        mac.update(data);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

#[async_trait]
impl ObjectStorage for MinIOClient {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let response = self
            .bucket(bucket)?
            .put_object_with_content_type(key, &data, content_type)
            .await
            .map_err(|e| StorageError::Upload {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        check_status(&response).map_err(|reason| StorageError::Upload {
            key: key.to_string(),
            reason,
        })?;

        debug!("Uploaded '{}' to bucket '{}'", key, bucket);
        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}/{}", self.public_endpoint, bucket, encode_key(key))
    }

    async fn remove(&self, bucket: &str, keys: &[String]) -> Result<(), StorageError> {
        let handle = self.bucket(bucket)?;
        for key in keys {
            let response = handle
                .delete_object(key)
                .await
                .map_err(|e| StorageError::Remove {
                    key: key.clone(),
                    reason: e.to_string(),
                })?;
            check_status(&response).map_err(|reason| StorageError::Remove {
                key: key.clone(),
                reason,
            })?;
            debug!("Removed '{}' from bucket '{}'", key, bucket);
        }
        Ok(())
    }
}

/// rust-s3 hands back error responses as `Ok`; only 2xx counts as done
fn check_status(response: &ResponseData) -> Result<(), String> {
    let status = response.status_code();
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "HTTP {}: {}",
            status,
            String::from_utf8_lossy(response.bytes()).trim()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    fn config() -> MinIOConfig {
        MinIOConfig {
            endpoint: "http://localhost:9000/".to_string(),
            public_endpoint: "https://media.example.org".to_string(),
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin".to_string(),
            region: "us-east-1".to_string(),
        }
    }

    const ACCESS_DENIED: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
        <Error><Code>AccessDenied</Code><Message>Access Denied.</Message></Error>";

    /// Read one HTTP request (headers plus `Content-Length` body)
    async fn read_request(socket: &mut TcpStream) -> std::io::Result<()> {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await?;
            if n == 0 {
                return Ok(());
            }
            buf.extend_from_slice(&chunk[..n]);

            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
                let length = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    return Ok(());
                }
            }
        }
    }

    /// S3 endpoint that answers every request with 403 AccessDenied
    async fn denying_endpoint() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let _ = read_request(&mut socket).await;
                    let response = format!(
                        "HTTP/1.1 403 Forbidden\r\nContent-Type: application/xml\r\n\
                         Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                        ACCESS_DENIED.len(),
                        ACCESS_DENIED
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_upload_refused_by_server_is_an_error() {
        let client = MinIOClient::new(MinIOConfig {
            endpoint: denying_endpoint().await,
            ..config()
        })
        .unwrap();

        let err = client
            .upload("announcements", "news/1-ab12cd34.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap_err();
        assert!(
            matches!(&err, StorageError::Upload { key, .. } if key == "news/1-ab12cd34.png"),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn test_remove_refused_by_server_is_an_error() {
        let client = MinIOClient::new(MinIOConfig {
            endpoint: denying_endpoint().await,
            ..config()
        })
        .unwrap();

        let err = client
            .remove("members", &["photos/1-ab12cd34.png".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Remove { .. }), "{err:?}");
    }

    #[test]
    fn test_public_url_uses_public_endpoint() {
        let client = MinIOClient::new(config()).unwrap();
        assert_eq!(
            client.public_url("announcements", "news/1700000000000-ab12cd34.jpg"),
            "https://media.example.org/announcements/news/1700000000000-ab12cd34.jpg"
        );
    }

    #[test]
    fn test_signature_is_hex_sha256() {
        let client = MinIOClient::new(config()).unwrap();
        let signature = client
            .calculate_signature("20240501", "AWS4-HMAC-SHA256\n...")
            .unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
