//! Events flowing into a session
//!
//! [`ClientEvent`]s come from the package-management client, [`ListEvent`]s
//! from the list view adapter.

use serde::{Deserialize, Serialize};

use crate::package_id::PackageId;
use crate::search::Generation;
use crate::types::{ErrorCode, ExitStatus, PackageInfo};

/// Package details shown below the list for the selected row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageDetails {
    pub license: String,
    pub group: String,
    pub description: String,
    pub url: String,
    /// Download size in bytes
    pub size: u64,
}

/// Events emitted by the package-management client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClientEvent {
    /// One search result
    PackageFound {
        generation: Generation,
        info: PackageInfo,
        id: PackageId,
        summary: String,
    },
    /// A search transaction ended
    SearchFinished {
        generation: Generation,
        exit: ExitStatus,
    },
    DetailsFound {
        id: PackageId,
        details: PackageDetails,
    },
    ErrorOccurred {
        code: ErrorCode,
        message: String,
    },
    /// The submitted install/remove batch ended
    ActionFinished { exit: ExitStatus },
}

/// User input routed from the list view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ListEvent {
    /// Checkbox clicked
    ToggleRequested { id: PackageId },
    /// Row double-clicked or activated with the keyboard
    RowActivated { id: PackageId },
}

impl ListEvent {
    pub fn id(&self) -> &PackageId {
        match self {
            Self::ToggleRequested { id } | Self::RowActivated { id } => id,
        }
    }
}
