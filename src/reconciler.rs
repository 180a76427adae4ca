//! Selection Reconciler
//!
//! Keeps the set of packages the user has queued for the next transaction
//! and derives the display state of every search row from it.
//!
//! # Design Principles
//!
//! - **Single Source of Truth**: `Reconciler` owns the pending set and mode
//! - **One Action Type**: a batch is install-only or remove-only
//! - **No Global State**: one reconciler per window, owned by the session
//! - **Rejections Are No-ops**: a refused toggle leaves every field untouched
//!
//! # Mode Flow
//!
//! ```text
//!            toggle(available)          toggle(installed)
//!   Install <----------------- None -----------------> Remove
//!      |                        ^                         |
//!      +--- last id removed ----+---- last id removed ----+
//!
//! (clear() returns to None from anywhere)
//! ```

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::package_id::PackageId;
use crate::types::{ActionAvailability, ActionMode, RowState};

/// One entry surfaced by a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageRecord {
    pub id: PackageId,
    /// Localized summary, or the backend's own when no translation exists
    pub summary: String,
    pub installed: bool,
}

impl PackageRecord {
    pub fn new(id: PackageId, summary: impl Into<String>, installed: bool) -> Self {
        Self {
            id,
            summary: summary.into(),
            installed,
        }
    }
}

/// Errors returned when a selection change is refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToggleError {
    /// The request would mix installs and removals in one batch
    #[error("already selected packages to be {}; clear or apply first", participle(*pending))]
    ConflictingAction { pending: ActionMode },
}

impl ToggleError {
    /// Modal title shown to the user
    pub fn title(&self) -> String {
        match self {
            Self::ConflictingAction { pending } => {
                format!("Already selected packages to be {}", participle(*pending))
            }
        }
    }

    /// Modal body shown to the user
    pub fn explanation(&self) -> String {
        match self {
            Self::ConflictingAction { pending } => {
                let other = match pending {
                    ActionMode::Install => ActionMode::Remove,
                    _ => ActionMode::Install,
                };
                format!(
                    "There are already packages queued to be {}.\n\
                     Click 'Clear list' to remove the previous selection or '{}' to complete the previous action.\n\
                     After completing the action new packages can be selected to be {}.",
                    participle(*pending),
                    pending.apply_label(),
                    participle(other),
                )
            }
        }
    }
}

fn participle(mode: ActionMode) -> &'static str {
    match mode {
        ActionMode::Install => "installed",
        ActionMode::Remove => "removed",
        ActionMode::None => "changed",
    }
}

/// Ordered, duplicate-free set of queued package ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingSet {
    ids: Vec<PackageId>,
}

impl PendingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &PackageId) -> bool {
        self.ids.contains(id)
    }

    /// Append `id` unless already present. Returns whether it was added.
    pub fn insert(&mut self, id: PackageId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove `id`, keeping the order of the rest. Returns whether it was present.
    pub fn remove(&mut self, id: &PackageId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|queued| queued != id);
        self.ids.len() != before
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PackageId> {
        self.ids.iter()
    }

    pub fn as_slice(&self) -> &[PackageId] {
        &self.ids
    }
}

/// Snapshot of the pending batch handed to the install/remove executor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingBatch {
    pub mode: ActionMode,
    pub package_ids: Vec<PackageId>,
}

/// Pending selection state for one window.
///
/// # Example
///
/// ```
/// use gpk_select::reconciler::Reconciler;
/// use gpk_select::types::{ActionMode, RowState};
///
/// let mut reconciler = Reconciler::new();
/// let foo = "foo;1.0;x86_64;installed".parse().unwrap();
///
/// let state = reconciler.toggle(&foo, true).unwrap();
/// assert_eq!(state, RowState::InstalledToBeRemoved);
/// assert_eq!(reconciler.mode(), ActionMode::Remove);
///
/// // An install cannot join a remove batch
/// let bar = "bar;2.0;x86_64;available".parse().unwrap();
/// assert!(reconciler.toggle(&bar, false).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    mode: ActionMode,
    pending: PendingSet,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn mode(&self) -> ActionMode {
        self.mode
    }

    #[inline]
    pub fn pending(&self) -> &PendingSet {
        &self.pending
    }

    #[inline]
    pub fn is_pending(&self, id: &PackageId) -> bool {
        self.pending.contains(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// True when the mode agrees with the pending set: `None` exactly when empty
    pub fn is_consistent(&self) -> bool {
        self.mode.is_active() != self.pending.is_empty()
    }

    /// Row state for a freshly arrived search record. Reads state only.
    pub fn record_arrived(&self, record: &PackageRecord) -> RowState {
        RowState::derive(record.installed, self.pending.contains(&record.id))
    }

    /// Flip whether `id` is queued.
    ///
    /// The first selection decides the batch kind. Selections already in the
    /// batch can always be dropped; new selections must match its kind.
    ///
    /// # Errors
    ///
    /// - `ConflictingAction` if `id` is not queued and would start a batch of
    ///   the other kind. Nothing is changed.
    pub fn toggle(
        &mut self,
        id: &PackageId,
        currently_installed: bool,
    ) -> Result<RowState, ToggleError> {
        let wanted = ActionMode::for_installed(currently_installed);
        let before = RowState::derive(currently_installed, self.pending.contains(id));

        match self.mode {
            ActionMode::None => {
                self.mode = wanted;
                self.pending.insert(id.clone());
                debug!("queued {} to {}; batch is now {}", id, wanted, self.mode);
            }
            mode => {
                if self.pending.remove(id) {
                    debug!("dropped {} from {} batch", id, mode);
                    if self.pending.is_empty() {
                        self.mode = ActionMode::None;
                        debug!("batch emptied, no pending action");
                    }
                } else if mode == wanted {
                    self.pending.insert(id.clone());
                    debug!("queued {} to {}", id, mode);
                } else {
                    return Err(ToggleError::ConflictingAction { pending: mode });
                }
            }
        }

        Ok(before.inverted())
    }

    /// Drop every queued id. Never fails.
    pub fn clear(&mut self) {
        if !self.pending.is_empty() {
            debug!("clearing {} queued package(s)", self.pending.len());
        }
        self.pending.clear();
        self.mode = ActionMode::None;
    }

    /// Snapshot the batch for submission.
    ///
    /// State is left as is; the caller clears once the executor reports
    /// success, so a failed submission can be retried.
    pub fn apply(&self) -> PendingBatch {
        PendingBatch {
            mode: self.mode,
            package_ids: self.pending.as_slice().to_vec(),
        }
    }

    /// Drop the ids of a batch the executor finished.
    ///
    /// Ids queued after the batch was submitted stay pending.
    pub fn complete(&mut self, batch: &PendingBatch) {
        for id in &batch.package_ids {
            self.pending.remove(id);
        }
        if self.pending.is_empty() {
            self.mode = ActionMode::None;
        }
        debug!(
            "{} batch of {} done, {} still queued",
            batch.mode,
            batch.package_ids.len(),
            self.pending.len()
        );
    }

    /// Whether a row's checkbox may be used under the current batch.
    ///
    /// During an install batch plain `Installed` rows are locked, during a
    /// remove batch plain `Available` rows are locked.
    pub fn checkbox_enabled(&self, state: RowState) -> bool {
        match self.mode {
            ActionMode::None => true,
            ActionMode::Install => state != RowState::Installed,
            ActionMode::Remove => state != RowState::Available,
        }
    }

    /// Which of the install/remove buttons apply to a selected row
    pub fn action_availability(&self, state: RowState) -> ActionAvailability {
        let mut availability = ActionAvailability {
            install: matches!(state, RowState::Available | RowState::InstalledToBeRemoved),
            remove: matches!(state, RowState::Installed | RowState::AvailableToBeInstalled),
        };
        if !state.is_queued() {
            match self.mode {
                ActionMode::Install => availability.remove = false,
                ActionMode::Remove => availability.install = false,
                ActionMode::None => {}
            }
        }
        availability
    }
}
