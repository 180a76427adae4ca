//! Package-management backend interface
//!
//! Searches and install/remove batches are executed by an external client.
//! Submission is synchronous and may be refused; completion arrives later as
//! a [`ClientEvent`](crate::events::ClientEvent).

use thiserror::Error;

use crate::package_id::PackageId;
use crate::search::{Generation, SearchRequest};
use crate::types::ActionMode;

/// Errors reported when the backend refuses a request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The client refused to queue the transaction
    #[error("Running the transaction failed: {0}")]
    Refused(String),

    /// No connection to the package daemon
    #[error("The package daemon is not available")]
    Disconnected,
}

/// Executor for searches and install/remove batches
pub trait Backend {
    /// Start a search; every result must be tagged with `generation`
    fn start_search(
        &mut self,
        generation: Generation,
        request: &SearchRequest,
    ) -> Result<(), BackendError>;

    /// Queue an install or remove transaction for `package_ids`
    fn submit(&mut self, mode: ActionMode, package_ids: &[PackageId]) -> Result<(), BackendError>;
}
