//! Error handling module for gpk-select
//!
//! Provides the crate-level error type using thiserror. Each module keeps its
//! own narrow error enum and converts into [`GpkError`] at the boundary.

use thiserror::Error;

use crate::session::SessionError;

/// Main error type for gpk-select
#[derive(Error, Debug)]
pub enum GpkError {
    /// IO errors (replay scripts)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Session errors (selection, search input, apply, backend submission)
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Result type alias for gpk-select operations
pub type Result<T> = std::result::Result<T, GpkError>;

impl GpkError {
    /// Whether the error is a user-facing, recoverable condition.
    ///
    /// Conflicting selections, bad search text and premature applies are
    /// shown to the user and leave all state untouched. A backend refusal or
    /// a broken script is not.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Session(
                SessionError::Rejected(_)
                    | SessionError::InvalidSearchText(_)
                    | SessionError::NotFound(_)
                    | SessionError::NothingToApply
                    | SessionError::ActionInProgress(_)
            )
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;
    use crate::reconciler::ToggleError;
    use crate::types::ActionMode;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GpkError = io_err.into();
        assert!(matches!(err, GpkError::Io(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_conflict_is_recoverable() {
        let err: GpkError = SessionError::from(ToggleError::ConflictingAction {
            pending: ActionMode::Install,
        })
        .into();
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("clear or apply first"));
    }

    #[test]
    fn test_backend_refusal_is_not_recoverable() {
        let err: GpkError = SessionError::from(BackendError::Disconnected).into();
        assert!(!err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "Session error: The package daemon is not available"
        );
    }
}
