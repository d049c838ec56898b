// ABOUTME: File intake adapter that forwards uploaded documents to remote object storage
// ABOUTME: Cloudinary signed uploads over reqwest, plus a disabled store for unconfigured deployments

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::CloudinaryCredentials;
use crate::entities::case_document::DocumentKind;
use crate::error::{AppError, Result};
use crate::storage::NewDocument;

/// Where an uploaded object ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub secure_url: String,
    pub public_id: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `bytes` under `folder`, letting the provider detect the resource type.
    async fn put(&self, folder: &str, file_name: &str, bytes: Bytes) -> Result<StoredObject>;
}

/// Size label shown next to documents: kilobytes with one decimal.
pub fn format_size(byte_len: usize) -> String {
    format!("{:.1} KB", byte_len as f64 / 1024.0)
}

/// Uploads a file and describes the resulting document. Storage errors come
/// back as `UploadFailed`, never as validation errors.
pub async fn intake_upload(
    store: &dyn ObjectStore,
    folder: &str,
    file_name: &str,
    bytes: Bytes,
) -> Result<NewDocument> {
    let size = format_size(bytes.len());
    let stored = store.put(folder, file_name, bytes).await?;

    Ok(NewDocument {
        name: file_name.to_string(),
        kind: DocumentKind::Upload,
        size,
        url: Some(stored.secure_url),
        public_id: Some(stored.public_id),
    })
}

pub struct CloudinaryStore {
    http: reqwest::Client,
    credentials: CloudinaryCredentials,
}

#[derive(Debug, Deserialize)]
struct CloudinaryUpload {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorBody {
    error: CloudinaryErrorMessage,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorMessage {
    message: String,
}

impl CloudinaryStore {
    pub fn new(credentials: CloudinaryCredentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            credentials,
        }
    }

    fn upload_url(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/auto/upload",
            self.credentials.cloud_name
        )
    }
}

/// Cloudinary request signature: the signed parameters sorted by name, joined
/// as `k=v&k=v`, with the API secret appended, hashed with SHA-256.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[async_trait]
impl ObjectStore for CloudinaryStore {
    async fn put(&self, folder: &str, file_name: &str, bytes: Bytes) -> Result<StoredObject> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[("folder", folder), ("timestamp", timestamp.as_str())],
            &self.credentials.api_secret,
        );

        let file = reqwest::multipart::Part::bytes(bytes.to_vec()).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("api_key", self.credentials.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder.to_string())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .http
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::UploadFailed(format!("request to object storage failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<CloudinaryErrorBody>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|_| "no error details".to_string());
            return Err(AppError::UploadFailed(format!(
                "object storage returned {}: {}",
                status, message
            )));
        }

        let uploaded: CloudinaryUpload = response
            .json()
            .await
            .map_err(|e| AppError::UploadFailed(format!("unreadable upload response: {}", e)))?;

        tracing::debug!(public_id = %uploaded.public_id, "Object stored");
        Ok(StoredObject {
            secure_url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }
}

/// Used when no storage credentials are configured; every upload fails.
pub struct DisabledStore;

#[async_trait]
impl ObjectStore for DisabledStore {
    async fn put(&self, _folder: &str, _file_name: &str, _bytes: Bytes) -> Result<StoredObject> {
        Err(AppError::UploadFailed(
            "object storage is not configured".to_string(),
        ))
    }
}
