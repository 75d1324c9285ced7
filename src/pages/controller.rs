//! Generic list page controller
//!
//! Every list page works the same way: fetch the whole collection on mount,
//! mutate through the resource client, then fetch the whole collection again.
//! Nothing is patched locally.

use crate::api::{ApiError, ResourceApi};
use crate::models::{Id, Resource};
use crate::notify::Notifier;

use super::PageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
}

/// Detail view of a single record
#[derive(Debug, Clone, PartialEq)]
pub enum DetailView<R> {
    Open(R),
    /// The record no longer exists; the view stays closed to further reads
    Gone(Id),
}

/// What is shown on top of the list
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay<R: Resource> {
    None,
    Detail(DetailView<R>),
    Create(R::Draft),
    Edit { id: Id, patch: R::Patch },
}

/// Page-local presentation state, never sent to the server
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Row whose action menu is open
    pub menu_open: Option<Id>,
    pub selected: Option<Id>,
}

impl ViewState {
    pub fn toggle_menu(&mut self, id: Id) {
        self.menu_open = match self.menu_open {
            Some(open) if open == id => None,
            _ => Some(id),
        };
    }

    pub fn select(&mut self, id: Id) {
        self.selected = Some(id);
    }
}

/// Interactive yes/no question asked before destructive actions
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Cancelled,
    Deleted,
}

pub struct Controller<R: Resource, A> {
    api: A,
    notifier: Notifier,
    items: Vec<R>,
    phase: Phase,
    overlay: Overlay<R>,
    view: ViewState,
    template: R::Draft,
}

impl<R: Resource, A: ResourceApi<R>> Controller<R, A> {
    pub fn new(api: A, notifier: Notifier) -> Self {
        Self {
            api,
            notifier,
            items: Vec::new(),
            phase: Phase::Loading,
            overlay: Overlay::None,
            view: ViewState::default(),
            template: R::Draft::default(),
        }
    }

    /// Values a freshly opened creation form starts with
    pub fn with_template(mut self, template: R::Draft) -> Self {
        self.template = template;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn find(&self, id: Id) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn overlay(&self) -> &Overlay<R> {
        &self.overlay
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub fn close(&mut self) {
        self.overlay = Overlay::None;
    }

    /// Initial load
    pub async fn mount(&mut self) -> Result<(), PageError> {
        self.refresh().await
    }

    /// Replace the collection with the server's current view.
    ///
    /// A completed re-fetch clears the view state and closes an open detail,
    /// whose record may now be stale. On failure the previous collection is
    /// kept.
    pub async fn refresh(&mut self) -> Result<(), PageError> {
        self.phase = Phase::Loading;
        let result = self.api.list().await;
        self.phase = Phase::Ready;

        match result {
            Ok(items) => {
                tracing::debug!(collection = R::COLLECTION, count = items.len(), "loaded");
                self.items = items;
                self.view = ViewState::default();
                if matches!(self.overlay, Overlay::Detail(DetailView::Open(_))) {
                    self.overlay = Overlay::None;
                }
                Ok(())
            }
            Err(err) => {
                tracing::error!(collection = R::COLLECTION, error = %err, "failed to load");
                self.notifier
                    .error(format!("Could not load {}: {}", R::COLLECTION, err));
                Err(err.into())
            }
        }
    }

    /// Delete after confirmation. A failed delete is reported and the list is
    /// left as it was.
    pub async fn delete<C>(&mut self, id: Id, confirm: &C) -> Result<DeleteOutcome, PageError>
    where
        C: Confirm + ?Sized,
    {
        if !confirm.confirm(&format!("Delete {} #{}?", R::LABEL, id)) {
            tracing::debug!(resource = R::LABEL, id, "delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        self.view.menu_open = None;
        if let Err(err) = self.api.delete(id).await {
            self.notifier
                .error(format!("Could not delete {} #{}: {}", R::LABEL, id, err));
            return Err(err.into());
        }

        self.notifier.success(format!("Deleted {} #{}", R::LABEL, id));
        let targets_deleted = match &self.overlay {
            Overlay::Detail(DetailView::Open(record)) => record.id() == id,
            Overlay::Edit { id: editing, .. } => *editing == id,
            _ => false,
        };
        if targets_deleted {
            self.overlay = Overlay::None;
        }
        self.refresh_after_mutation().await;
        Ok(DeleteOutcome::Deleted)
    }

    /// Open the creation form with template values
    pub fn open_create(&mut self) {
        self.overlay = Overlay::Create(self.template.clone());
    }

    /// The open creation form, if any
    pub fn form_mut(&mut self) -> Option<&mut R::Draft> {
        match &mut self.overlay {
            Overlay::Create(draft) => Some(draft),
            _ => None,
        }
    }

    /// Send the creation form. On failure the form stays open with its values.
    pub async fn submit_create(&mut self) -> Result<R, PageError> {
        let Overlay::Create(draft) = &self.overlay else {
            return Err(PageError::NoForm);
        };

        match self.api.create(draft).await {
            Ok(created) => {
                self.notifier
                    .success(format!("Created {} #{}", R::LABEL, created.id()));
                self.overlay = Overlay::None;
                self.refresh_after_mutation().await;
                Ok(created)
            }
            Err(err) => {
                self.notifier
                    .error(format!("Could not create {}: {}", R::LABEL, err));
                Err(err.into())
            }
        }
    }

    /// Select a record for editing with an empty patch
    pub fn open_edit(&mut self, id: Id) {
        self.overlay = Overlay::Edit {
            id,
            patch: R::Patch::default(),
        };
    }

    pub fn patch_mut(&mut self) -> Option<&mut R::Patch> {
        match &mut self.overlay {
            Overlay::Edit { patch, .. } => Some(patch),
            _ => None,
        }
    }

    /// Send the pending edit. On failure the edit stays open.
    pub async fn submit_edit(&mut self) -> Result<R, PageError> {
        let Overlay::Edit { id, patch } = &self.overlay else {
            return Err(PageError::NoForm);
        };
        let (id, patch) = (*id, patch.clone());

        let updated = self.update(id, &patch).await?;
        self.overlay = Overlay::None;
        Ok(updated)
    }

    /// Apply a partial update directly, as row actions do
    pub async fn update(&mut self, id: Id, patch: &R::Patch) -> Result<R, PageError> {
        match self.api.update(id, patch).await {
            Ok(updated) => {
                self.notifier.success(format!("Updated {} #{}", R::LABEL, id));
                self.refresh_after_mutation().await;
                Ok(updated)
            }
            Err(err) => {
                self.notifier
                    .error(format!("Could not update {} #{}: {}", R::LABEL, id, err));
                Err(err.into())
            }
        }
    }

    /// Read one record into the detail view.
    ///
    /// A record the server reports missing turns the view into
    /// [`DetailView::Gone`], and later opens of that id fail without a request.
    pub async fn open_detail(&mut self, id: Id) -> Result<R, PageError> {
        if matches!(&self.overlay, Overlay::Detail(DetailView::Gone(gone)) if *gone == id) {
            return Err(ApiError::NotFound {
                resource: R::LABEL,
                id: Some(id),
            }
            .into());
        }

        match self.api.get(id).await {
            Ok(record) => {
                self.view.select(id);
                self.overlay = Overlay::Detail(DetailView::Open(record.clone()));
                Ok(record)
            }
            Err(err) if err.is_not_found() => {
                tracing::info!(resource = R::LABEL, id, "record gone");
                self.notifier.error(err.to_string());
                self.overlay = Overlay::Detail(DetailView::Gone(id));
                Err(err.into())
            }
            Err(err) => {
                self.notifier
                    .error(format!("Could not load {} #{}: {}", R::LABEL, id, err));
                Err(err.into())
            }
        }
    }

    // The mutation already succeeded; a failed reload is notified by refresh
    async fn refresh_after_mutation(&mut self) {
        if let Err(err) = self.refresh().await {
            tracing::debug!(collection = R::COLLECTION, error = %err, "reload after mutation failed");
        }
    }
}
