//! Search requests and the generation-tagged result list
//!
//! Every new search starts a new generation. Records that arrive tagged with
//! an older generation belong to a superseded search and are dropped.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, warn};

use crate::package_id::PackageId;
use crate::reconciler::PackageRecord;
use crate::types::{ExitStatus, SearchKind};

/// Text shown in place of rows when a search succeeded without results
pub const NO_RESULTS_TEXT: &str = "No results were found";

/// Characters refused in search text
const FORBIDDEN_CHARS: &[char] = &[';', '|', '&', '$', '`', '"', '\'', '\\'];

/// Monotonic search counter
pub type Generation = u64;

/// How repeated ids within one search are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DuplicatePolicy {
    /// A repeated id overwrites the earlier row in place
    #[default]
    Deduplicate,
    /// Every arrival becomes its own row
    KeepRows,
}

/// What a search asks the backend for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SearchRequest {
    /// Free-text search by name, description or file
    Text { kind: SearchKind, text: String },
    /// All packages in a group
    Group { group: String },
    /// Every package the backend knows about
    AllPackages,
}

/// Outcome of validating search input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchInput {
    /// Input is usable as is
    Ready,
    /// Nothing to search for; not an error, the request is simply skipped
    Empty,
    /// Input contains characters the backend refuses
    Invalid(String),
}

impl SearchRequest {
    pub fn text(kind: SearchKind, text: impl Into<String>) -> Self {
        Self::Text {
            kind,
            text: text.into(),
        }
    }

    /// Check free-text input before a search is issued
    pub fn validate(&self) -> SearchInput {
        match self {
            Self::Text { text, .. } => validate_text(text),
            Self::Group { group } if group.trim().is_empty() => SearchInput::Empty,
            Self::Group { .. } | Self::AllPackages => SearchInput::Ready,
        }
    }
}

fn validate_text(text: &str) -> SearchInput {
    if text.trim().is_empty() {
        return SearchInput::Empty;
    }
    if text
        .chars()
        .any(|c| c.is_control() || FORBIDDEN_CHARS.contains(&c))
    {
        return SearchInput::Invalid(text.to_string());
    }
    SearchInput::Ready
}

/// Where an accepted record landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accepted {
    /// New row appended at this index
    Appended(usize),
    /// Existing row at this index overwritten
    Replaced(usize),
    /// Record belonged to a superseded search and was dropped
    Stale,
}

/// Rows of the current search
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    generation: Generation,
    policy: DuplicatePolicy,
    records: Vec<PackageRecord>,
    finished: Option<ExitStatus>,
}

impl SearchResults {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn records(&self) -> &[PackageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Exit status once the current search finished
    pub fn finished(&self) -> Option<ExitStatus> {
        self.finished
    }

    /// Start a new generation, dropping all rows of the previous one
    pub fn begin(&mut self, generation: Generation) {
        debug!(
            "search generation {} -> {}, dropping {} row(s)",
            self.generation,
            generation,
            self.records.len()
        );
        self.generation = generation;
        self.records.clear();
        self.finished = None;
    }

    /// Move to a new generation without dropping rows.
    ///
    /// Used when the running search is cancelled: what arrived so far stays
    /// listed, anything still in flight is stale.
    pub fn supersede(&mut self) -> Generation {
        self.generation += 1;
        self.finished = Some(ExitStatus::Cancelled);
        self.generation
    }

    #[inline]
    pub fn is_current(&self, generation: Generation) -> bool {
        generation == self.generation
    }

    /// Store a record if it belongs to the current generation
    pub fn accept(&mut self, generation: Generation, record: PackageRecord) -> Accepted {
        if !self.is_current(generation) {
            warn!(
                "ignoring {} from stale search {} (current {})",
                record.id, generation, self.generation
            );
            return Accepted::Stale;
        }

        if self.policy == DuplicatePolicy::Deduplicate {
            if let Some(index) = self.position(&record.id) {
                debug!("{} arrived again, replacing row {}", record.id, index);
                self.records[index] = record;
                return Accepted::Replaced(index);
            }
        }

        self.records.push(record);
        Accepted::Appended(self.records.len() - 1)
    }

    /// Mark the current search finished.
    ///
    /// Returns true when the search succeeded without any rows, which is when
    /// the view shows [`NO_RESULTS_TEXT`].
    pub fn finish(&mut self, generation: Generation, exit: ExitStatus) -> bool {
        if !self.is_current(generation) {
            debug!("ignoring finish of stale search {}", generation);
            return false;
        }
        self.finished = Some(exit);
        exit.is_success() && self.records.is_empty()
    }

    /// First row index for `id`
    pub fn position(&self, id: &PackageId) -> Option<usize> {
        self.records.iter().position(|record| &record.id == id)
    }

    /// First record for `id`
    pub fn find(&self, id: &PackageId) -> Option<&PackageRecord> {
        self.records.iter().find(|record| &record.id == id)
    }
}
