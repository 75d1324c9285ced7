//! Uploaded documents (scanned timesheets, receipts)

use serde::{Deserialize, Serialize};

use super::{decimal, wire_enum, Id, Resource};

/// Extraction lifecycle of an uploaded document.
///
/// The server moves a document through these states asynchronously after
/// upload; clients only observe transitions by re-reading the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Pending,
    Processing,
    Extracted,
    Validated,
    Rejected,
    Invoiced,
    Error,
}

wire_enum!(DocumentStatus, "document status", {
    Pending => ("pending", "En attente"),
    Processing => ("processing", "En cours"),
    Extracted => ("extracted", "Extrait"),
    Validated => ("validated", "Validé"),
    Rejected => ("rejected", "Rejeté"),
    Invoiced => ("invoiced", "Facturé"),
    Error => ("error", "Erreur"),
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedDocument {
    pub id: Id,
    /// Storage path or URL of the uploaded file
    pub file: String,
    pub uploaded_at: String,
    /// Structured payload produced by extraction, shape owned by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_json: Option<serde_json::Value>,
    #[serde(
        default,
        deserialize_with = "decimal::option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub km_total: Option<String>,
    #[serde(
        default,
        deserialize_with = "decimal::option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub consumables: Option<String>,
    pub status: DocumentStatus,
}

impl UploadedDocument {
    /// Last path segment of `file`
    pub fn file_name(&self) -> &str {
        self.file.rsplit('/').next().unwrap_or(&self.file)
    }

    pub fn is_pdf(&self) -> bool {
        self.file.to_lowercase().ends_with(".pdf")
    }
}

/// JSON creation payload. Binary uploads go through
/// [`Endpoint::upload`](crate::api::Endpoint::upload) instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewDocument {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_json: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub km_total: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumables: Option<String>,
    pub status: DocumentStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_json: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub km_total: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumables: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DocumentStatus>,
}

impl Resource for UploadedDocument {
    type Draft = NewDocument;
    type Patch = DocumentPatch;

    const COLLECTION: &'static str = "documents";
    const LABEL: &'static str = "document";

    fn id(&self) -> Id {
        self.id
    }
}
