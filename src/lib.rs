//! gpk-select Library
//!
//! Toolkit-independent selection core for a graphical package manager:
//! tracks which search results are queued for installation or removal and
//! derives what every row of the package list shows.

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod package_id;
pub mod reconciler;
pub mod replay;
pub mod search;
pub mod session;
pub mod types;
pub mod view;

// Re-export main types for convenience
pub use backend::{Backend, BackendError};
pub use config::SessionConfig;
pub use error::{GpkError, Result};
pub use events::{ClientEvent, ListEvent, PackageDetails};
pub use package_id::{PackageId, PackageIdError};
pub use reconciler::{PackageRecord, PendingBatch, PendingSet, Reconciler, ToggleError};
pub use search::{DuplicatePolicy, Generation, SearchRequest, SearchResults};
pub use session::{Session, SessionError};
pub use types::{ActionAvailability, ActionMode, ErrorCode, ExitStatus, PackageInfo, RowState, SearchKind};
pub use view::{ListView, RowView};
