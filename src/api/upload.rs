//! Document upload
//!
//! The only create operation that is not JSON: the file travels as a
//! multipart body with a single `file` field. The server queues extraction
//! and returns the new document in `pending` state; progress is only visible
//! by reading the document again later.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::path::Path;

use super::client::{ApiClient, Endpoint, ResourceApi};
use super::error::{ApiError, ApiResult};
use crate::models::UploadedDocument;

/// Multipart field carrying the file
pub const UPLOAD_FIELD: &str = "file";

/// A file picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_for(&file_name).to_string();
        Self {
            file_name,
            mime,
            bytes,
        }
    }

    /// Read a file from disk
    pub async fn from_path(path: &Path) -> ApiResult<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn into_form(self) -> ApiResult<Form> {
        let part = Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime)
            .map_err(|e| ApiError::Config(format!("invalid MIME type: {}", e)))?;
        Ok(Form::new().part(UPLOAD_FIELD, part))
    }
}

/// MIME type guessed from the file extension
pub fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

impl Endpoint<'_, UploadedDocument> {
    /// Create a document from a binary file
    pub async fn upload(&self, file: UploadFile) -> ApiResult<UploadedDocument> {
        if file.is_empty() {
            return Err(ApiError::EmptyUpload(file.file_name));
        }

        let url = self.client.collection_url::<UploadedDocument>();
        tracing::debug!(
            method = "POST",
            %url,
            file = %file.file_name,
            bytes = file.len(),
            "upload document"
        );

        let request = self.client.http().post(&url).multipart(file.into_form()?);
        let response = self
            .client
            .execute::<UploadedDocument>(request, None)
            .await?;
        ApiClient::decode(response).await
    }
}

/// Document access including the binary upload path
#[async_trait]
pub trait DocumentUpload: ResourceApi<UploadedDocument> {
    async fn upload(&self, file: UploadFile) -> ApiResult<UploadedDocument>;
}

#[async_trait]
impl DocumentUpload for ApiClient {
    async fn upload(&self, file: UploadFile) -> ApiResult<UploadedDocument> {
        self.documents().upload(file).await
    }
}
