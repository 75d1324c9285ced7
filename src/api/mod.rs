//! Back-office REST API client
//!
//! Typed access to the remote store. Every operation maps to exactly one
//! request; nothing is cached and nested objects are passed through as-is.
//!
//! # Endpoints
//!
//! | Resource | List/Create | Item |
//! |---|---|---|
//! | Client | `GET/POST /clients/` | `GET/PUT/DELETE /clients/{id}/` |
//! | Document | `GET/POST /documents/` (POST also multipart) | `GET/PUT/DELETE /documents/{id}/` |
//! | Timesheet | `GET/POST /timesheets/` | `GET/PUT/DELETE /timesheets/{id}/` |
//! | Daily entry | `GET/POST /entries/` | `GET/PUT/DELETE /entries/{id}/` |
//! | Invoice | `GET/POST /invoices/` | `GET/PUT/DELETE /invoices/{id}/` |
//!
//! # Example
//!
//! ```rust,no_run
//! use backoffice::api::ApiClient;
//! use backoffice::config::ApiConfig;
//! use backoffice::models::NewClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = ApiClient::new(&ApiConfig::default())?;
//!
//!     let created = api.clients().create(&NewClient::new("Transports Martin")).await?;
//!     let all = api.clients().list().await?;
//!     println!("{} clients, newest is #{}", all.len(), created.id);
//!
//!     Ok(())
//! }
//! ```

mod client;
pub mod error;
mod upload;

pub use client::{ApiClient, Endpoint, ResourceApi};
pub use error::{ApiError, ApiResult, ErrorKind};
pub use upload::{mime_for, DocumentUpload, UploadFile, UPLOAD_FIELD};
