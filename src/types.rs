//! Type-safe state types for gpk-select
//!
//! Replaces the integer enums and boolean pairs of a widget-backed row model
//! with Rust enums that give exhaustive matching.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Backend info classification attached to a package event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PackageInfo {
    Installed,
    Available,
    Low,
    Normal,
    Important,
    Security,
    Bugfix,
    Enhancement,
    Blocked,
    Downloading,
    Updating,
    Installing,
    Removing,
    Cleanup,
    Obsoleting,
    Unknown,
}

impl PackageInfo {
    /// Installed flag for search results.
    ///
    /// Only `installed` and `available` describe a package row; every other
    /// value is transaction progress and yields `None`.
    pub const fn installed_flag(self) -> Option<bool> {
        match self {
            Self::Installed => Some(true),
            Self::Available => Some(false),
            _ => None,
        }
    }
}

/// Kind of the pending batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ActionMode {
    #[default]
    None,
    Install,
    Remove,
}

impl ActionMode {
    /// The mode a first selection starts: removing installed packages,
    /// installing available ones.
    pub const fn for_installed(installed: bool) -> Self {
        if installed { Self::Remove } else { Self::Install }
    }

    #[inline]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Label of the button that applies a batch of this kind
    pub const fn apply_label(self) -> &'static str {
        match self {
            Self::None => "Apply",
            Self::Install => "Install packages",
            Self::Remove => "Remove packages",
        }
    }
}

/// Display state of one search row: installed-ness times queued-ness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RowState {
    Installed,
    Available,
    InstalledToBeRemoved,
    AvailableToBeInstalled,
}

impl RowState {
    /// Pure and total over the four `(installed, queued)` combinations
    pub const fn derive(installed: bool, queued: bool) -> Self {
        match (installed, queued) {
            (true, false) => Self::Installed,
            (false, false) => Self::Available,
            (true, true) => Self::InstalledToBeRemoved,
            (false, true) => Self::AvailableToBeInstalled,
        }
    }

    #[inline]
    pub const fn is_installed(self) -> bool {
        matches!(self, Self::Installed | Self::InstalledToBeRemoved)
    }

    #[inline]
    pub const fn is_queued(self) -> bool {
        matches!(self, Self::InstalledToBeRemoved | Self::AvailableToBeInstalled)
    }

    /// What the row checkbox shows: "will be installed afterwards"
    #[inline]
    pub const fn checkbox(self) -> bool {
        self.is_installed() ^ self.is_queued()
    }

    /// Same package, queued-ness flipped
    pub const fn inverted(self) -> Self {
        Self::derive(self.is_installed(), !self.is_queued())
    }

    /// Same package, no longer queued
    pub const fn unselected(self) -> Self {
        Self::derive(self.is_installed(), false)
    }

    pub const fn icon_name(self) -> &'static str {
        match self {
            Self::Installed => "package-installed",
            Self::Available => "package-available",
            Self::InstalledToBeRemoved => "package-remove",
            Self::AvailableToBeInstalled => "package-add",
        }
    }
}

/// Text search flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SearchKind {
    #[default]
    Name,
    Details,
    File,
}

/// Exit status of a finished transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ExitStatus {
    #[default]
    Success,
    Failed,
    Cancelled,
    Unknown,
}

impl ExitStatus {
    #[inline]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Error codes reported by the package client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCode {
    TransactionCancelled,
    NoNetwork,
    NoCache,
    PackageNotFound,
    PackageNotInstalled,
    PackageAlreadyInstalled,
    DepResolutionFailed,
    FilterInvalid,
    NotSupported,
    InternalError,
    Unknown,
}

impl ErrorCode {
    /// Cancellation is the user's own doing and is never shown
    #[inline]
    pub const fn is_silent(self) -> bool {
        matches!(self, Self::TransactionCancelled)
    }

    /// Modal title for the error
    pub const fn title(self) -> &'static str {
        match self {
            Self::TransactionCancelled => "The task was cancelled",
            Self::NoNetwork => "No network connection available",
            Self::NoCache => "No package cache is available",
            Self::PackageNotFound => "The package could not be found",
            Self::PackageNotInstalled => "The package is not installed",
            Self::PackageAlreadyInstalled => "The package is already installed",
            Self::DepResolutionFailed => "The dependencies could not be resolved",
            Self::FilterInvalid => "The search filter was invalid",
            Self::NotSupported => "The action is not supported by this backend",
            Self::InternalError => "An internal system error has occurred",
            Self::Unknown => "Unknown error",
        }
    }
}

/// Whether the install and remove buttons apply to a selected row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ActionAvailability {
    pub install: bool,
    pub remove: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_row_state_is_total() {
        assert_eq!(RowState::derive(true, false), RowState::Installed);
        assert_eq!(RowState::derive(false, false), RowState::Available);
        assert_eq!(RowState::derive(true, true), RowState::InstalledToBeRemoved);
        assert_eq!(RowState::derive(false, true), RowState::AvailableToBeInstalled);
    }

    #[test]
    fn test_row_state_flags_round_trip() {
        for state in RowState::iter() {
            assert_eq!(RowState::derive(state.is_installed(), state.is_queued()), state);
        }
    }

    #[test]
    fn test_checkbox_is_installed_xor_queued() {
        assert!(RowState::Installed.checkbox());
        assert!(!RowState::Available.checkbox());
        assert!(!RowState::InstalledToBeRemoved.checkbox());
        assert!(RowState::AvailableToBeInstalled.checkbox());
    }

    #[test]
    fn test_invert_and_unselect() {
        for state in RowState::iter() {
            assert_eq!(state.inverted().inverted(), state);
            assert!(!state.unselected().is_queued());
            assert_eq!(state.unselected().is_installed(), state.is_installed());
        }
        assert_eq!(RowState::Installed.inverted(), RowState::InstalledToBeRemoved);
    }

    #[test]
    fn test_info_installed_flag() {
        assert_eq!(PackageInfo::Installed.installed_flag(), Some(true));
        assert_eq!(PackageInfo::Available.installed_flag(), Some(false));
        assert_eq!(PackageInfo::Downloading.installed_flag(), None);
        assert_eq!(PackageInfo::Cleanup.installed_flag(), None);
    }

    #[test]
    fn test_action_mode_for_installed() {
        assert_eq!(ActionMode::for_installed(true), ActionMode::Remove);
        assert_eq!(ActionMode::for_installed(false), ActionMode::Install);
        assert!(!ActionMode::None.is_active());
    }

    #[test]
    fn test_strum_names() {
        assert_eq!(RowState::InstalledToBeRemoved.to_string(), "installed_to_be_removed");
        assert_eq!("details".parse::<SearchKind>().unwrap(), SearchKind::Details);
        assert_eq!(
            "transaction_cancelled".parse::<ErrorCode>().unwrap(),
            ErrorCode::TransactionCancelled
        );
        assert!(ErrorCode::TransactionCancelled.is_silent());
        assert!(!ErrorCode::NoNetwork.is_silent());
    }
}
