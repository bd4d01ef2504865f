//! Content-addressed object storage (C4, spec §4.4).
//!
//! Mirrors the Supabase Storage REST surface from spec §6: `HEAD`/`PUT`
//! against `{base}/storage/v1/object/{bucket}/{key}`, with a bucket-create
//! endpoint for provisioning. The object key is always
//! `SHA256(bytes) + extension`, which makes uploads idempotent across retries
//! and across documents that happen to share identical bytes (duplicate
//! images, re-ingested PDFs).

use sha2::{Digest, Sha256};

use crate::error::{Result, StorageError};

/// Result of a successful (or idempotently-skipped) upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    /// Public/authenticated object URL.
    pub url: String,
    /// Hex-encoded SHA-256 of the uploaded bytes.
    pub hash: String,
    /// Size of the uploaded bytes.
    pub size: u64,
}

/// Configuration for bucket provisioning (spec §4.4 `ensure_buckets`).
#[derive(Debug, Clone)]
pub struct BucketSpec {
    /// Bucket name/id.
    pub name: String,
    /// Maximum object size in bytes.
    pub file_size_limit: u64,
    /// Allowed MIME types for objects in this bucket.
    pub allowed_mime_types: Vec<String>,
}

impl BucketSpec {
    /// A bucket capped at 100 MiB accepting PDFs and common raster image
    /// types, matching the teacher prototype's default bucket policy.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_size_limit: 100 * 1024 * 1024,
            allowed_mime_types: vec![
                "application/pdf".to_string(),
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/gif".to_string(),
                "image/webp".to_string(),
            ],
        }
    }
}

/// HTTP client over the content-addressed object store.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    client: reqwest::Client,
    base_url: String,
    bearer_token: String,
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

impl ObjectStore {
    /// Builds a client against `base_url` (e.g. `SUPABASE_URL`), authorizing
    /// with `bearer_token` (e.g. `SUPABASE_SERVICE_ROLE_KEY`).
    #[must_use]
    pub fn new(base_url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            bearer_token: bearer_token.into(),
        }
    }

    fn object_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/storage/v1/object/{bucket}/{key}", self.base_url)
    }

    /// Creates every bucket in `specs`, treating "already exists" as success
    /// (spec §4.4).
    pub async fn ensure_buckets(&self, specs: &[BucketSpec]) -> Result<()> {
        for spec in specs {
            let response = self
                .client
                .post(format!("{}/storage/v1/bucket", self.base_url))
                .bearer_auth(&self.bearer_token)
                .json(&serde_json::json!({
                    "id": spec.name,
                    "name": spec.name,
                    "public": false,
                    "file_size_limit": spec.file_size_limit,
                    "allowed_mime_types": spec.allowed_mime_types,
                }))
                .send()
                .await?;

            let status = response.status();
            if status.is_success() || status.as_u16() == 409 {
                tracing::debug!(bucket = %spec.name, "bucket ready");
                continue;
            }
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::ObjectStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// Uploads `bytes` to `bucket`, deriving the object key as
    /// `SHA256(bytes) + extension` (taken from `logical_path`'s extension, if
    /// any). `HEAD`s the key first; a 200 short-circuits the `PUT` and
    /// returns the existing object's URL, making this idempotent across
    /// retries and across documents sharing identical bytes.
    pub async fn upload(&self, bucket: &str, logical_path: &str, bytes: &[u8], content_type: &str) -> Result<UploadResult> {
        let hash = sha256_hex(bytes);
        let extension = std::path::Path::new(logical_path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();
        let key = format!("{hash}{extension}");
        let url = self.object_url(bucket, &key);

        let head = self.client.head(&url).bearer_auth(&self.bearer_token).send().await?;
        if head.status().as_u16() == 200 {
            tracing::debug!(%key, bucket, "object already present, skipping upload");
            return Ok(UploadResult {
                url,
                hash,
                size: bytes.len() as u64,
            });
        }

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.bearer_token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::ObjectStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(UploadResult {
            url,
            hash,
            size: bytes.len() as u64,
        })
    }
}

mod hex {
    /// Hex-encodes bytes in lowercase, avoiding a dependency on the `hex`
    /// crate for one call site.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        use std::fmt::Write;
        let mut out = String::with_capacity(bytes.as_ref().len() * 2);
        for byte in bytes.as_ref() {
            write!(out, "{byte:02x}").expect("writing to a String never fails");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hex_matches_known_vector() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn sha256_hex_is_stable_for_same_bytes() {
        assert_eq!(sha256_hex(b"hello world"), sha256_hex(b"hello world"));
        assert_ne!(sha256_hex(b"hello world"), sha256_hex(b"hello worlds"));
    }

    #[test]
    fn bucket_spec_default_allows_pdf_and_common_images() {
        let spec = BucketSpec::new("krai-documents");
        assert!(spec.allowed_mime_types.contains(&"application/pdf".to_string()));
        assert_eq!(spec.file_size_limit, 100 * 1024 * 1024);
    }
}
