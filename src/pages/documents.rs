//! Documents page
//!
//! List of uploaded documents with a name search and the upload modal.

use std::ops::{Deref, DerefMut};

use crate::api::{DocumentUpload, UploadFile};
use crate::models::{DocumentStatus, UploadedDocument};
use crate::notify::Notifier;

use super::{Controller, PageError};

pub struct DocumentsPage<A> {
    controller: Controller<UploadedDocument, A>,
    search: String,
    selected_file: Option<UploadFile>,
    upload_open: bool,
}

impl<A: DocumentUpload> DocumentsPage<A> {
    pub fn new(api: A, notifier: Notifier) -> Self {
        Self {
            controller: Controller::new(api, notifier),
            search: String::new(),
            selected_file: None,
            upload_open: false,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Documents whose file path contains the search text, ignoring case
    pub fn visible(&self) -> Vec<&UploadedDocument> {
        let needle = self.search.trim().to_lowercase();
        self.controller
            .items()
            .iter()
            .filter(|doc| needle.is_empty() || doc.file.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.controller
            .items()
            .iter()
            .filter(|doc| doc.status == DocumentStatus::Pending)
            .count()
    }

    pub fn open_upload(&mut self) {
        self.upload_open = true;
    }

    pub fn close_upload(&mut self) {
        self.upload_open = false;
        self.selected_file = None;
    }

    pub fn is_upload_open(&self) -> bool {
        self.upload_open
    }

    pub fn select_file(&mut self, file: UploadFile) {
        self.selected_file = Some(file);
    }

    pub fn selected_file(&self) -> Option<&UploadFile> {
        self.selected_file.as_ref()
    }

    /// Upload the selected file. The selection survives a failed upload.
    pub async fn upload(&mut self) -> Result<UploadedDocument, PageError> {
        let Some(file) = self.selected_file.clone() else {
            return Err(PageError::NoFileSelected);
        };
        let file_name = file.file_name.clone();

        match self.controller.api().upload(file).await {
            Ok(doc) => {
                self.controller
                    .notifier()
                    .success(format!("Uploaded {} (#{})", file_name, doc.id));
                self.selected_file = None;
                self.upload_open = false;
                if let Err(err) = self.controller.refresh().await {
                    tracing::debug!(error = %err, "reload after upload failed");
                }
                Ok(doc)
            }
            Err(err) => {
                self.controller
                    .notifier()
                    .error(format!("Could not upload {}: {}", file_name, err));
                Err(err.into())
            }
        }
    }
}

impl<A> Deref for DocumentsPage<A> {
    type Target = Controller<UploadedDocument, A>;

    fn deref(&self) -> &Self::Target {
        &self.controller
    }
}

impl<A> DerefMut for DocumentsPage<A> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.controller
    }
}
