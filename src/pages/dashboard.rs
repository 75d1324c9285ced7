//! Home page counters

use serde::Serialize;

use crate::api::{ApiResult, ResourceApi};
use crate::models::{DocumentStatus, Invoice, UploadedDocument, WeeklyTimesheet};
use crate::notify::Notifier;

use super::{Phase, PageError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub documents: usize,
    pub pending_documents: usize,
    pub timesheets: usize,
    pub invoices: usize,
}

impl DashboardStats {
    /// Read the three collections; any failure fails the whole load
    pub async fn load<A>(api: &A) -> ApiResult<Self>
    where
        A: ResourceApi<UploadedDocument> + ResourceApi<WeeklyTimesheet> + ResourceApi<Invoice>,
    {
        let documents = ResourceApi::<UploadedDocument>::list(api).await?;
        let timesheets = ResourceApi::<WeeklyTimesheet>::list(api).await?;
        let invoices = ResourceApi::<Invoice>::list(api).await?;

        Ok(Self {
            documents: documents.len(),
            pending_documents: documents
                .iter()
                .filter(|d| d.status == DocumentStatus::Pending)
                .count(),
            timesheets: timesheets.len(),
            invoices: invoices.len(),
        })
    }

    /// Card label and value pairs, in display order
    pub fn cards(&self) -> [(&'static str, usize); 4] {
        [
            ("Documents", self.documents),
            ("En attente", self.pending_documents),
            ("Feuilles de temps", self.timesheets),
            ("Factures", self.invoices),
        ]
    }
}

pub struct Dashboard<A> {
    api: A,
    notifier: Notifier,
    phase: Phase,
    stats: DashboardStats,
}

impl<A> Dashboard<A>
where
    A: ResourceApi<UploadedDocument> + ResourceApi<WeeklyTimesheet> + ResourceApi<Invoice>,
{
    pub fn new(api: A, notifier: Notifier) -> Self {
        Self {
            api,
            notifier,
            phase: Phase::Loading,
            stats: DashboardStats::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    pub async fn mount(&mut self) -> Result<(), PageError> {
        self.phase = Phase::Loading;
        let result = DashboardStats::load(&self.api).await;
        self.phase = Phase::Ready;

        match result {
            Ok(stats) => {
                self.stats = stats;
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load dashboard");
                self.notifier
                    .error(format!("Could not load dashboard: {}", err));
                Err(err.into())
            }
        }
    }
}
