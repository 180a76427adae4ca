//! Session configuration
//!
//! Settings for one package-selection window, saved and loaded as JSON.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use crate::search::DuplicatePolicy;
use crate::types::SearchKind;

/// Configuration for a [`Session`](crate::session::Session)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// How repeated package ids within one search are listed
    pub duplicate_policy: DuplicatePolicy,
    /// Search flavour used when a script or caller does not name one
    pub default_search_kind: SearchKind,
    /// Re-issue the current search after a successful install/remove
    pub refresh_after_apply: bool,
    /// Log filter directive (same syntax as `RUST_LOG`)
    pub log_filter: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Deduplicate,
            default_search_kind: SearchKind::Name,
            refresh_after_apply: true,
            log_filter: None,
        }
    }
}

impl SessionConfig {
    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize session configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(filter) = &self.log_filter {
            if filter.trim().is_empty() {
                anyhow::bail!("Log filter must not be empty when set");
            }
            EnvFilter::try_new(filter)
                .with_context(|| format!("Invalid log filter '{}'", filter))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Deduplicate);
        assert!(config.refresh_after_apply);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("session.json");

        let config = SessionConfig {
            duplicate_policy: DuplicatePolicy::KeepRows,
            default_search_kind: SearchKind::File,
            refresh_after_apply: false,
            log_filter: Some("gpk_select=debug".to_string()),
        };
        config.save_to_file(&path).expect("save");

        let loaded = SessionConfig::load_from_file(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"duplicate_policy":"keep_rows"}"#).unwrap();
        assert_eq!(config.duplicate_policy, DuplicatePolicy::KeepRows);
        assert_eq!(config.default_search_kind, SearchKind::Name);
        assert!(config.refresh_after_apply);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result = serde_json::from_str::<SessionConfig>(r#"{"autocomplete":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_log_filter_is_rejected() {
        let config = SessionConfig {
            log_filter: Some("  ".to_string()),
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let err = SessionConfig::load_from_file("/nonexistent/session.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read configuration"));
    }
}
