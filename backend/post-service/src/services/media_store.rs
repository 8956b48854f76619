/// Client for the external media host
///
/// The host receives raw bytes, stores them durably, auto-detects whether
/// the content is an image or a video, and answers with a publicly
/// fetchable URL. Uploads are not retried here; a failed request leaves
/// nothing to clean up, and a failure after upload leaves an orphaned
/// binary upstream (accepted, see DESIGN.md).
use crate::config::MediaHostConfig;
use crate::error::{AppError, Result};
use crate::models::MediaKind;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;

/// Outcome of a successful upload
#[derive(Debug, Clone)]
pub struct StoredMedia {
    pub url: String,
    pub kind: MediaKind,
    pub original_name: Option<String>,
    pub size_bytes: i64,
}

/// Seam between the ingestion pipeline and the external host, so tests
/// can substitute an in-process implementation.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store raw bytes under a logical folder; returns the canonical URL
    /// and the detected media kind.
    async fn store(&self, content: Bytes, folder: &str) -> Result<StoredMedia>;
}

/// HTTP implementation talking to the configured media host
pub struct HttpMediaStore {
    http_client: HttpClient,
    upload_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadReply {
    secure_url: String,
    resource_type: String,
    #[serde(default)]
    original_filename: Option<String>,
    #[serde(default)]
    bytes: i64,
}

fn kind_from_resource_type(resource_type: &str) -> Option<MediaKind> {
    match resource_type {
        "image" => Some(MediaKind::Image),
        "video" => Some(MediaKind::Video),
        _ => None,
    }
}

impl HttpMediaStore {
    /// Create a new media host client from configuration
    pub fn from_config(cfg: &MediaHostConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {e}")))?;

        tracing::info!(upload_url = %cfg.upload_url, "media host client initialized");

        Ok(Self {
            http_client,
            upload_url: cfg.upload_url.clone(),
            api_key: cfg.api_key.clone(),
        })
    }
}

#[async_trait]
impl MediaStore for HttpMediaStore {
    async fn store(&self, content: Bytes, folder: &str) -> Result<StoredMedia> {
        let mut request = self
            .http_client
            .post(&self.upload_url)
            .query(&[("folder", folder)])
            .header("Content-Type", "application/octet-stream")
            .body(content);

        if let Some(ref api_key) = self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::MediaStore(format!("media host unreachable: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::MediaStore(format!(
                "media host rejected upload with status {}: {}",
                status, body
            )));
        }

        let reply: UploadReply = response
            .json()
            .await
            .map_err(|e| AppError::MediaStore(format!("invalid media host response: {e}")))?;

        let kind = kind_from_resource_type(&reply.resource_type).ok_or_else(|| {
            AppError::MediaStore(format!(
                "unsupported resource type: {}",
                reply.resource_type
            ))
        })?;

        tracing::debug!(url = %reply.secure_url, kind = %kind.as_str(), "binary stored");

        Ok(StoredMedia {
            url: reply.secure_url,
            kind,
            original_name: reply.original_filename,
            size_bytes: reply.bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_resource_type() {
        assert_eq!(kind_from_resource_type("image"), Some(MediaKind::Image));
        assert_eq!(kind_from_resource_type("video"), Some(MediaKind::Video));
        assert_eq!(kind_from_resource_type("raw"), None);
        assert_eq!(kind_from_resource_type(""), None);
    }

    #[test]
    fn test_upload_reply_tolerates_missing_optional_fields() {
        let reply: UploadReply = serde_json::from_str(
            r#"{"secure_url": "https://media.example.com/x.jpg", "resource_type": "image"}"#,
        )
        .unwrap();
        assert_eq!(reply.original_filename, None);
        assert_eq!(reply.bytes, 0);
    }
}
