//! List view adapter interface
//!
//! The session renders rows through [`ListView`]; a toolkit adapter turns
//! these calls into widget updates and feeds user input back as
//! [`ListEvent`](crate::events::ListEvent)s.

use serde::Serialize;

use crate::events::PackageDetails;
use crate::package_id::PackageId;
use crate::reconciler::PackageRecord;
use crate::types::RowState;

/// Everything a list view needs to draw one row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub id: PackageId,
    /// `name-version` and summary on two lines
    pub text: String,
    pub state: RowState,
    pub icon: &'static str,
    pub checkbox: bool,
    /// Whether the checkbox is sensitive under the pending batch
    pub enabled: bool,
}

impl RowView {
    pub fn new(record: &PackageRecord, state: RowState, enabled: bool) -> Self {
        Self {
            id: record.id.clone(),
            text: record.id.format_twoline(&record.summary),
            state,
            icon: state.icon_name(),
            checkbox: state.checkbox(),
            enabled,
        }
    }
}

/// Rendering side of the package list
pub trait ListView {
    /// Drop every row (a new search started)
    fn clear_rows(&mut self);

    fn append_row(&mut self, row: &RowView);

    /// Redraw the row at `index`
    fn update_row(&mut self, index: usize, row: &RowView);

    /// Show a non-package placeholder line, e.g. "No results were found"
    fn show_placeholder(&mut self, text: &str);

    /// Show a modal explanation to the user
    fn show_modal(&mut self, title: &str, message: &str);

    fn show_details(&mut self, _id: &PackageId, _details: &PackageDetails) {}

    /// Apply and Clear are only usable while something is queued
    fn set_apply_clear_sensitive(&mut self, _sensitive: bool) {}
}
