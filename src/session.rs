//! Application controller for one package-selection window
//!
//! A [`Session`] owns the [`Reconciler`], the rows of the current search and
//! the two external collaborators. Client callbacks and list-view input are
//! fed in as events; the session keeps the view in step with the pending
//! selection.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::backend::{Backend, BackendError};
use crate::config::SessionConfig;
use crate::events::{ClientEvent, ListEvent};
use crate::package_id::PackageId;
use crate::reconciler::{PackageRecord, PendingBatch, Reconciler, ToggleError};
use crate::search::{Accepted, Generation, NO_RESULTS_TEXT, SearchInput, SearchRequest, SearchResults};
use crate::types::{ActionAvailability, ActionMode, ExitStatus, PackageInfo, RowState};
use crate::view::{ListView, RowView};

/// Errors returned by session operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Input referenced a package that is not in the current rows
    #[error("Package {0} is not in the current search results")]
    NotFound(PackageId),

    /// Selection change refused by the reconciler
    #[error(transparent)]
    Rejected(#[from] ToggleError),

    /// Search text contains characters the backend refuses
    #[error("The search text '{0}' contains invalid characters")]
    InvalidSearchText(String),

    /// Apply requested with nothing queued
    #[error("No packages are queued")]
    NothingToApply,

    /// Apply requested while the previous batch is still running
    #[error("The previous {0} action has not finished yet")]
    ActionInProgress(ActionMode),

    /// The backend refused a search or batch
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Controller tying the reconciler to a list view and a backend
pub struct Session<V: ListView, B: Backend> {
    config: SessionConfig,
    reconciler: Reconciler,
    results: SearchResults,
    request: Option<SearchRequest>,
    /// Batch handed to the backend and not yet reported finished
    submitted: Option<PendingBatch>,
    view: V,
    backend: B,
}

impl<V: ListView, B: Backend> Session<V, B> {
    pub fn new(config: SessionConfig, view: V, backend: B) -> Self {
        let results = SearchResults::new(config.duplicate_policy);
        Self {
            config,
            reconciler: Reconciler::new(),
            results,
            request: None,
            submitted: None,
            view,
            backend,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn results(&self) -> &SearchResults {
        &self.results
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Generation of the current (or last) search
    pub fn generation(&self) -> Generation {
        self.results.generation()
    }

    /// Request of the current (or last) search
    pub fn current_request(&self) -> Option<&SearchRequest> {
        self.request.as_ref()
    }

    /// Batch submitted and awaiting its `ActionFinished`
    pub fn submitted(&self) -> Option<&PendingBatch> {
        self.submitted.as_ref()
    }

    /// Start a new search, superseding any running one.
    ///
    /// Returns the new generation, or `None` when the input was empty and no
    /// search was issued. Queued selections are kept.
    pub fn search(&mut self, request: SearchRequest) -> Result<Option<Generation>, SessionError> {
        match request.validate() {
            SearchInput::Ready => {}
            SearchInput::Empty => {
                debug!("no search input, not searching");
                return Ok(None);
            }
            SearchInput::Invalid(text) => {
                self.view.show_modal(
                    "Invalid search text",
                    "The search text contains invalid characters",
                );
                return Err(SessionError::InvalidSearchText(text));
            }
        }

        let generation = self.results.generation() + 1;
        if let Err(err) = self.backend.start_search(generation, &request) {
            // The running search is abandoned either way
            self.results.supersede();
            self.view
                .show_modal("The search could not be completed", &err.to_string());
            return Err(err.into());
        }

        debug!("search {} started: {:?}", generation, request);
        self.results.begin(generation);
        self.view.clear_rows();
        self.request = Some(request);
        Ok(Some(generation))
    }

    /// Stop listening to the running search. Rows received so far stay.
    pub fn cancel_search(&mut self) -> Generation {
        let generation = self.results.supersede();
        debug!("search cancelled, now at generation {}", generation);
        generation
    }

    /// Re-issue the current search, e.g. after packages changed
    pub fn refresh(&mut self) -> Result<Option<Generation>, SessionError> {
        match self.request.clone() {
            Some(request) => self.search(request),
            None => {
                debug!("no previous search, not refreshing");
                Ok(None)
            }
        }
    }

    /// Handle a callback from the package-management client
    pub fn on_client_event(&mut self, event: ClientEvent) -> Result<(), SessionError> {
        match event {
            ClientEvent::PackageFound {
                generation,
                info,
                id,
                summary,
            } => {
                self.package_found(generation, info, id, summary);
                Ok(())
            }
            ClientEvent::SearchFinished { generation, exit } => {
                if self.results.finish(generation, exit) {
                    self.view.show_placeholder(NO_RESULTS_TEXT);
                }
                Ok(())
            }
            ClientEvent::DetailsFound { id, details } => {
                self.view.show_details(&id, &details);
                Ok(())
            }
            ClientEvent::ErrorOccurred { code, message } => {
                if code.is_silent() {
                    debug!("not showing {} error: {}", code, message);
                } else {
                    warn!("client error {}: {}", code, message);
                    self.view.show_modal(code.title(), &message);
                }
                Ok(())
            }
            ClientEvent::ActionFinished { exit } => self.action_finished(exit),
        }
    }

    /// Handle a toggle or activation from the list view
    pub fn on_list_event(&mut self, event: ListEvent) -> Result<RowState, SessionError> {
        let id = event.id().clone();
        let Some(record) = self.results.find(&id) else {
            warn!("ignoring {:?} for {}: not in the current rows", event, id);
            return Err(SessionError::NotFound(id));
        };
        let installed = record.installed;

        match self.reconciler.toggle(&id, installed) {
            Ok(state) => {
                self.render_rows();
                Ok(state)
            }
            Err(err) => {
                warn!("ignoring selection of {}: {}", id, err);
                self.view.show_modal(&err.title(), &err.explanation());
                Err(err.into())
            }
        }
    }

    /// Which buttons apply to the selected row
    pub fn select_row(&self, id: &PackageId) -> Result<ActionAvailability, SessionError> {
        let record = self
            .results
            .find(id)
            .ok_or_else(|| SessionError::NotFound(id.clone()))?;
        let state = self.reconciler.record_arrived(record);
        Ok(self.reconciler.action_availability(state))
    }

    /// Drop every queued package and redraw
    pub fn clear_selection(&mut self) {
        // With nothing queued every checkbox is usable again
        for (index, record) in self.results.records().iter().enumerate() {
            let state = self.reconciler.record_arrived(record).unselected();
            self.view.update_row(index, &RowView::new(record, state, true));
        }
        self.reconciler.clear();
        self.view.set_apply_clear_sensitive(false);
    }

    /// Submit the pending batch to the backend.
    ///
    /// The queue stays intact until the backend reports success through
    /// `ActionFinished`, so a refused or failed batch can be retried. Only one
    /// batch runs at a time.
    pub fn apply(&mut self) -> Result<PendingBatch, SessionError> {
        if let Some(running) = &self.submitted {
            warn!("not applying, {} batch still running", running.mode);
            return Err(SessionError::ActionInProgress(running.mode));
        }
        if self.reconciler.is_empty() {
            return Err(SessionError::NothingToApply);
        }

        let batch = self.reconciler.apply();
        if let Err(err) = self.backend.submit(batch.mode, &batch.package_ids) {
            warn!("{} of {} package(s) refused: {}", batch.mode, batch.package_ids.len(), err);
            self.view.show_modal("The action could not be completed", &err.to_string());
            return Err(err.into());
        }

        info!("submitted {} of {} package(s)", batch.mode, batch.package_ids.len());
        self.submitted = Some(batch.clone());
        Ok(batch)
    }

    fn package_found(
        &mut self,
        generation: Generation,
        info: PackageInfo,
        id: PackageId,
        summary: String,
    ) {
        let Some(installed) = info.installed_flag() else {
            debug!("ignoring {} progress for {}", info, id);
            return;
        };

        let record = PackageRecord::new(id, summary, installed);
        let state = self.reconciler.record_arrived(&record);
        let row = RowView::new(&record, state, self.reconciler.checkbox_enabled(state));

        match self.results.accept(generation, record) {
            Accepted::Appended(_) => self.view.append_row(&row),
            Accepted::Replaced(index) => self.view.update_row(index, &row),
            Accepted::Stale => {}
        }
    }

    fn action_finished(&mut self, exit: ExitStatus) -> Result<(), SessionError> {
        let Some(batch) = self.submitted.take() else {
            warn!("action finished ({}) with no batch submitted", exit);
            return Ok(());
        };

        if !exit.is_success() {
            warn!("{} batch ended {}, keeping the queue", batch.mode, exit);
            return Ok(());
        }

        info!("{} of {} package(s) done", batch.mode, batch.package_ids.len());
        self.reconciler.complete(&batch);
        self.render_rows();
        if self.config.refresh_after_apply {
            self.refresh()?;
        }
        Ok(())
    }

    /// Redraw every row from the reconciler and resync button sensitivity
    fn render_rows(&mut self) {
        for (index, record) in self.results.records().iter().enumerate() {
            let state = self.reconciler.record_arrived(record);
            let row = RowView::new(record, state, self.reconciler.checkbox_enabled(state));
            self.view.update_row(index, &row);
        }
        self.view
            .set_apply_clear_sensitive(!self.reconciler.is_empty());
    }
}
