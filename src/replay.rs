//! Headless session replay
//!
//! Drives a [`Session`] from a JSON script of client callbacks and user
//! input, with a text list view and a recording backend standing in for the
//! toolkit and the package daemon.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::backend::{Backend, BackendError};
use crate::config::SessionConfig;
use crate::error::{GpkError, Result};
use crate::events::{ClientEvent, ListEvent, PackageDetails};
use crate::package_id::PackageId;
use crate::reconciler::PendingBatch;
use crate::search::{Generation, SearchRequest};
use crate::session::{Session, SessionError};
use crate::types::{ActionMode, ErrorCode, ExitStatus, PackageInfo, SearchKind};
use crate::view::{ListView, RowView};

/// One scripted step
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Free-text search; `kind` falls back to the configured default
    Search {
        #[serde(default)]
        kind: Option<SearchKind>,
        text: String,
    },
    SearchGroup { group: String },
    SearchAll,
    /// Stop listening to the running search
    Cancel,
    /// Search result; `generation` defaults to the current search
    PackageFound {
        #[serde(default)]
        generation: Option<Generation>,
        info: PackageInfo,
        id: PackageId,
        #[serde(default)]
        summary: String,
    },
    SearchFinished {
        #[serde(default)]
        generation: Option<Generation>,
        #[serde(default)]
        exit: ExitStatus,
    },
    Details {
        id: PackageId,
        #[serde(default)]
        details: PackageDetails,
    },
    Error { code: ErrorCode, message: String },
    Toggle { id: PackageId },
    Activate { id: PackageId },
    Select { id: PackageId },
    Clear,
    Apply,
    ActionFinished {
        #[serde(default)]
        exit: ExitStatus,
    },
    /// Make the backend refuse (or accept again) every request
    BackendOffline { offline: bool },
}

/// Read a replay script from a JSON file
pub fn load_script<P: AsRef<Path>>(path: P) -> Result<Vec<Step>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// A modal the session asked the view to show
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Modal {
    pub title: String,
    pub message: String,
}

/// List view that keeps rows in memory
#[derive(Debug, Clone, Default)]
pub struct TextView {
    pub rows: Vec<RowView>,
    pub placeholder: Option<String>,
    pub modals: Vec<Modal>,
    pub details: Vec<(PackageId, PackageDetails)>,
    pub apply_clear_sensitive: bool,
}

impl ListView for TextView {
    fn clear_rows(&mut self) {
        self.rows.clear();
        self.placeholder = None;
    }

    fn append_row(&mut self, row: &RowView) {
        self.placeholder = None;
        self.rows.push(row.clone());
    }

    fn update_row(&mut self, index: usize, row: &RowView) {
        match self.rows.get_mut(index) {
            Some(existing) => *existing = row.clone(),
            None => debug!("no row {} to update", index),
        }
    }

    fn show_placeholder(&mut self, text: &str) {
        self.placeholder = Some(text.to_string());
    }

    fn show_modal(&mut self, title: &str, message: &str) {
        self.modals.push(Modal {
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn show_details(&mut self, id: &PackageId, details: &PackageDetails) {
        self.details.push((id.clone(), details.clone()));
    }

    fn set_apply_clear_sensitive(&mut self, sensitive: bool) {
        self.apply_clear_sensitive = sensitive;
    }
}

/// Backend that records what it was asked to do
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    pub offline: bool,
    pub searches: Vec<(Generation, SearchRequest)>,
    pub submissions: Vec<PendingBatch>,
}

impl Backend for RecordingBackend {
    fn start_search(
        &mut self,
        generation: Generation,
        request: &SearchRequest,
    ) -> std::result::Result<(), BackendError> {
        if self.offline {
            return Err(BackendError::Disconnected);
        }
        self.searches.push((generation, request.clone()));
        Ok(())
    }

    fn submit(&mut self, mode: ActionMode, package_ids: &[PackageId]) -> std::result::Result<(), BackendError> {
        if self.offline {
            return Err(BackendError::Disconnected);
        }
        self.submissions.push(PendingBatch {
            mode,
            package_ids: package_ids.to_vec(),
        });
        Ok(())
    }
}

/// Final state after a replay
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub rows: Vec<RowView>,
    pub placeholder: Option<String>,
    pub mode: ActionMode,
    pub pending: Vec<PackageId>,
    pub modals: Vec<Modal>,
    pub submissions: Vec<PendingBatch>,
    /// Submitted batch still waiting for `action_finished`
    pub in_flight: Option<PendingBatch>,
    /// One line per step describing its outcome
    pub log: Vec<String>,
}

type ReplaySession = Session<TextView, RecordingBackend>;

/// What one step did, and the error it ran into if any
struct StepOutcome {
    line: String,
    error: Option<SessionError>,
}

impl StepOutcome {
    fn done(line: String) -> Self {
        Self { line, error: None }
    }

    fn failed(what: impl fmt::Display, err: SessionError) -> Self {
        Self {
            line: format!("{}: {}", what, err),
            error: Some(err),
        }
    }
}

/// Run `steps` against a fresh session. Failing steps are logged and the
/// replay carries on.
pub fn run(steps: &[Step], config: SessionConfig) -> ReplayReport {
    let mut session = new_session(config);
    let mut log = Vec::with_capacity(steps.len());

    for step in steps {
        let outcome = apply_step(&mut session, step);
        debug!("{}", outcome.line);
        log.push(outcome.line);
    }

    report(&session, log)
}

/// Like [`run`], but stop at the first step whose error is not recoverable
pub fn run_strict(steps: &[Step], config: SessionConfig) -> Result<ReplayReport> {
    let mut session = new_session(config);
    let mut log = Vec::with_capacity(steps.len());

    for (index, step) in steps.iter().enumerate() {
        let outcome = apply_step(&mut session, step);
        debug!("{}", outcome.line);
        if let Some(err) = outcome.error.map(GpkError::from) {
            if !err.is_recoverable() {
                warn!("replay stopped at step {}: {}", index + 1, outcome.line);
                return Err(err);
            }
        }
        log.push(outcome.line);
    }

    Ok(report(&session, log))
}

fn new_session(config: SessionConfig) -> ReplaySession {
    Session::new(config, TextView::default(), RecordingBackend::default())
}

fn report(session: &ReplaySession, log: Vec<String>) -> ReplayReport {
    let batch = session.reconciler().apply();
    let view = session.view();
    ReplayReport {
        rows: view.rows.clone(),
        placeholder: view.placeholder.clone(),
        mode: batch.mode,
        pending: batch.package_ids,
        modals: view.modals.clone(),
        submissions: session.backend().submissions.clone(),
        in_flight: session.submitted().cloned(),
        log,
    }
}

fn apply_step(session: &mut ReplaySession, step: &Step) -> StepOutcome {
    match step {
        Step::Search { kind, text } => {
            let kind = kind.unwrap_or(session.config().default_search_kind);
            search_line(session, SearchRequest::text(kind, text.clone()))
        }
        Step::SearchGroup { group } => search_line(
            session,
            SearchRequest::Group {
                group: group.clone(),
            },
        ),
        Step::SearchAll => search_line(session, SearchRequest::AllPackages),
        Step::Cancel => StepOutcome::done(format!(
            "cancel: now at generation {}",
            session.cancel_search()
        )),
        Step::PackageFound {
            generation,
            info,
            id,
            summary,
        } => {
            let generation = generation.unwrap_or(session.generation());
            let event = ClientEvent::PackageFound {
                generation,
                info: *info,
                id: id.clone(),
                summary: summary.clone(),
            };
            client_line(session, event, format!("package {} ({}, gen {})", id, info, generation))
        }
        Step::SearchFinished { generation, exit } => {
            let generation = generation.unwrap_or(session.generation());
            let event = ClientEvent::SearchFinished {
                generation,
                exit: *exit,
            };
            client_line(session, event, format!("search {} finished {}", generation, exit))
        }
        Step::Details { id, details } => {
            let event = ClientEvent::DetailsFound {
                id: id.clone(),
                details: details.clone(),
            };
            client_line(session, event, format!("details for {}", id))
        }
        Step::Error { code, message } => {
            let event = ClientEvent::ErrorOccurred {
                code: *code,
                message: message.clone(),
            };
            client_line(session, event, format!("error {}", code))
        }
        Step::ActionFinished { exit } => {
            let event = ClientEvent::ActionFinished { exit: *exit };
            client_line(session, event, format!("action finished {}", exit))
        }
        Step::Toggle { id } => {
            list_line(session, ListEvent::ToggleRequested { id: id.clone() }, "toggle")
        }
        Step::Activate { id } => {
            list_line(session, ListEvent::RowActivated { id: id.clone() }, "activate")
        }
        Step::Select { id } => match session.select_row(id) {
            Ok(availability) => {
                let label = session
                    .results()
                    .find(id)
                    .map(|record| id.format_oneline(&record.summary))
                    .unwrap_or_else(|| id.name_version());
                StepOutcome::done(format!(
                    "select {}: install {}, remove {}",
                    label,
                    if availability.install { "offered" } else { "withheld" },
                    if availability.remove { "offered" } else { "withheld" },
                ))
            }
            Err(err) => StepOutcome::failed(format!("select {}", id), err),
        },
        Step::Clear => {
            session.clear_selection();
            StepOutcome::done("clear: nothing queued".to_string())
        }
        Step::Apply => match session.apply() {
            Ok(batch) => StepOutcome::done(format!(
                "apply: submitted {} of {} package(s)",
                batch.mode,
                batch.package_ids.len()
            )),
            Err(err) => StepOutcome::failed("apply", err),
        },
        Step::BackendOffline { offline } => {
            session.backend_mut().offline = *offline;
            StepOutcome::done(format!(
                "backend {}",
                if *offline { "offline" } else { "online" }
            ))
        }
    }
}

fn search_line(session: &mut ReplaySession, request: SearchRequest) -> StepOutcome {
    match session.search(request) {
        Ok(Some(generation)) => {
            StepOutcome::done(format!("search: started generation {}", generation))
        }
        Ok(None) => StepOutcome::done("search: no input, skipped".to_string()),
        Err(err) => StepOutcome::failed("search", err),
    }
}

fn client_line(session: &mut ReplaySession, event: ClientEvent, what: String) -> StepOutcome {
    match session.on_client_event(event) {
        Ok(()) => StepOutcome::done(what),
        Err(err) => StepOutcome::failed(what, err),
    }
}

fn list_line(session: &mut ReplaySession, event: ListEvent, verb: &str) -> StepOutcome {
    let id = event.id().clone();
    match session.on_list_event(event) {
        Ok(state) => StepOutcome::done(format!(
            "{} {}: {} (batch {})",
            verb,
            id,
            state,
            session.reconciler().mode()
        )),
        Err(err) => StepOutcome::failed(format!("{} {}", verb, id), err),
    }
}

impl fmt::Display for ReplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Steps:")?;
        for (i, line) in self.log.iter().enumerate() {
            writeln!(f, "  {:>3}. {}", i + 1, line)?;
        }

        writeln!(f, "\nRows:")?;
        if let Some(placeholder) = &self.placeholder {
            writeln!(f, "  {}", placeholder)?;
        }
        for row in &self.rows {
            let name = row.text.lines().next().unwrap_or_default();
            writeln!(
                f,
                "  [{}]{} {:<32} {:<26} {}",
                if row.checkbox { "x" } else { " " },
                if row.enabled { " " } else { "!" },
                name,
                row.state,
                row.id
            )?;
        }

        writeln!(f, "\nPending ({}):", self.mode)?;
        for id in &self.pending {
            writeln!(f, "  {}", id)?;
        }

        if !self.submissions.is_empty() {
            writeln!(f, "\nSubmitted:")?;
            for batch in &self.submissions {
                writeln!(f, "  {} {} package(s)", batch.mode, batch.package_ids.len())?;
            }
        }

        if let Some(batch) = &self.in_flight {
            writeln!(
                f,
                "\nStill running: {} {} package(s)",
                batch.mode,
                batch.package_ids.len()
            )?;
        }

        if !self.modals.is_empty() {
            writeln!(f, "\nMessages:")?;
            for modal in &self.modals {
                writeln!(f, "  {}", modal.title)?;
                for line in modal.message.lines() {
                    writeln!(f, "    {}", line)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_parses() {
        let steps: Vec<Step> = serde_json::from_str(
            r#"[
                {"step": "search", "text": "foo"},
                {"step": "package_found", "info": "installed", "id": "foo;1.0;x86_64;installed"},
                {"step": "search_finished"},
                {"step": "toggle", "id": "foo;1.0;x86_64;installed"},
                {"step": "apply"}
            ]"#,
        )
        .unwrap();
        assert_eq!(steps.len(), 5);
        assert_eq!(
            steps[0],
            Step::Search {
                kind: None,
                text: "foo".to_string()
            }
        );
    }

    #[test]
    fn test_bad_id_in_script_is_an_error() {
        let result =
            serde_json::from_str::<Vec<Step>>(r#"[{"step": "toggle", "id": "foo;1.0"}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_report_display_lists_rows() {
        let id: PackageId = "foo;1.0;x86_64;installed".parse().unwrap();
        let steps = vec![
            Step::Search {
                kind: None,
                text: "foo".to_string(),
            },
            Step::PackageFound {
                generation: None,
                info: PackageInfo::Installed,
                id: id.clone(),
                summary: "Foo".to_string(),
            },
            Step::Toggle { id },
        ];
        let report = run(&steps, SessionConfig::default());
        let text = report.to_string();

        assert!(text.contains("foo-1.0"));
        assert!(text.contains("installed_to_be_removed"));
        assert!(text.contains("Pending (remove)"));
    }
}
