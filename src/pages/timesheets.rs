//! Timesheets page
//!
//! Weekly timesheet list with a status filter and a quick status action.
//! New timesheets start out pending.

use std::ops::{Deref, DerefMut};

use crate::api::ResourceApi;
use crate::models::{Id, NewTimesheet, TimesheetPatch, TimesheetStatus, WeeklyTimesheet};
use crate::notify::Notifier;

use super::{Controller, PageError};

pub struct TimesheetsPage<A> {
    controller: Controller<WeeklyTimesheet, A>,
    status_filter: Option<TimesheetStatus>,
}

impl<A: ResourceApi<WeeklyTimesheet>> TimesheetsPage<A> {
    pub fn new(api: A, notifier: Notifier) -> Self {
        let template = NewTimesheet {
            status: TimesheetStatus::Pending,
            ..Default::default()
        };
        Self {
            controller: Controller::new(api, notifier).with_template(template),
            status_filter: None,
        }
    }

    pub fn status_filter(&self) -> Option<TimesheetStatus> {
        self.status_filter
    }

    pub fn set_status_filter(&mut self, status: Option<TimesheetStatus>) {
        self.status_filter = status;
    }

    pub fn visible(&self) -> Vec<&WeeklyTimesheet> {
        self.controller
            .items()
            .iter()
            .filter(|t| self.status_filter.map_or(true, |s| t.status == s))
            .collect()
    }

    /// Move a timesheet to another status
    pub async fn set_status(
        &mut self,
        id: Id,
        status: TimesheetStatus,
    ) -> Result<WeeklyTimesheet, PageError> {
        tracing::info!(id, status = %status, "set timesheet status");
        self.controller
            .update(id, &TimesheetPatch::status(status))
            .await
    }
}

impl<A> Deref for TimesheetsPage<A> {
    type Target = Controller<WeeklyTimesheet, A>;

    fn deref(&self) -> &Self::Target {
        &self.controller
    }
}

impl<A> DerefMut for TimesheetsPage<A> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.controller
    }
}
