//! Page Controllers
//!
//! One controller per list page. Each owns its collection, a loading phase,
//! the overlay currently open (detail, create form or edit) and page-local
//! view state. Mutations always end with a full re-fetch of the collection.

mod controller;
mod dashboard;
mod documents;
mod timesheets;

pub use controller::{Confirm, Controller, DeleteOutcome, DetailView, Overlay, Phase, ViewState};
pub use dashboard::{Dashboard, DashboardStats};
pub use documents::DocumentsPage;
pub use timesheets::TimesheetsPage;

use thiserror::Error;

use crate::api::ApiError;
use crate::models::{Client, DailyEntry, Invoice};

pub type ClientsPage<A> = Controller<Client, A>;
pub type InvoicesPage<A> = Controller<Invoice, A>;
pub type EntriesPage<A> = Controller<DailyEntry, A>;

/// Errors returned by page actions
#[derive(Error, Debug)]
pub enum PageError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("No form is open")]
    NoForm,

    #[error("No file selected")]
    NoFileSelected,
}

impl PageError {
    /// The underlying API failure, if the server was involved
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            PageError::Api(err) => Some(err),
            _ => None,
        }
    }
}
