//! # Backoffice
//!
//! Data-access layer and console for a fleet back-office: uploaded documents,
//! weekly timesheets and their daily entries, clients and invoices, all kept
//! by a remote REST store.
//!
//! ## Modules
//!
//! - [`models`]: Wire types for the five resources
//! - [`api`]: Typed REST client, including multipart document upload
//! - [`pages`]: Page controllers (load, mutate, re-fetch)
//! - [`notify`]: Short-lived user notifications
//! - [`shell`]: Navigation, greeting and table output
//! - [`config`] / [`logging`]: Ambient setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use backoffice::{ApiClient, Config, Notifier, TimesheetsPage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let api = ApiClient::new(&config.api)?;
//!
//!     let mut page = TimesheetsPage::new(api, Notifier::new(&config.notifications));
//!     page.mount().await?;
//!
//!     page.open_create();
//!     if let Some(form) = page.form_mut() {
//!         form.name = "Tournée A".to_string();
//!         form.week_start = "2024-01-01".to_string();
//!         form.week_end = "2024-01-07".to_string();
//!     }
//!     let created = page.submit_create().await?;
//!     println!("timesheet #{} is {}", created.id, created.status.label());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod logging;
pub mod models;
pub mod notify;
pub mod pages;
pub mod shell;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiClient, ApiError, ApiResult, DocumentUpload, ErrorKind, ResourceApi, UploadFile};

pub use config::{Config, ConfigError};

pub use models::{
    Client, DailyEntry, DocumentStatus, Id, Invoice, InvoiceStatus, Related, Resource,
    TimesheetStatus, UploadedDocument, WeeklyTimesheet, Weekday,
};

pub use notify::{Level, Notification, Notifier};

pub use pages::{
    ClientsPage, Confirm, Controller, Dashboard, DashboardStats, DeleteOutcome, DocumentsPage,
    EntriesPage, InvoicesPage, PageError, TimesheetsPage,
};
