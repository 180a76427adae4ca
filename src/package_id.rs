//! Package identifiers
//!
//! A package identifier is the `name;version;arch;data` token the package
//! daemon hands out for every package variant. The `data` field carries the
//! repository or origin (`installed`, `fedora`, `local`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const SEPARATOR: char = ';';
const FIELD_COUNT: usize = 4;

/// Errors produced while parsing a package identifier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PackageIdError {
    /// Identifier did not have exactly four `;`-separated fields
    #[error("Package id '{id}' has {found} fields, expected 4 (name;version;arch;data)")]
    FieldCount { id: String, found: usize },

    /// The name field was empty
    #[error("Package id '{id}' has an empty name")]
    EmptyName { id: String },

    /// A field contained the `;` separator
    #[error("Package id {field} '{value}' must not contain ';'")]
    SeparatorInField { field: &'static str, value: String },
}

/// A structured `name;version;arch;data` package identifier.
///
/// Equality, ordering and hashing are over all four fields, so two variants
/// of the same package (different arch or repo) are distinct ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageId {
    name: String,
    version: String,
    arch: String,
    data: String,
}

impl PackageId {
    /// Build an id from its parts. The name must be non-empty and no field
    /// may contain `;`.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        arch: impl Into<String>,
        data: impl Into<String>,
    ) -> Result<Self, PackageIdError> {
        let id = Self {
            name: name.into(),
            version: version.into(),
            arch: arch.into(),
            data: data.into(),
        };
        for (field, value) in [
            ("name", &id.name),
            ("version", &id.version),
            ("arch", &id.arch),
            ("data", &id.data),
        ] {
            if value.contains(SEPARATOR) {
                return Err(PackageIdError::SeparatorInField {
                    field,
                    value: value.clone(),
                });
            }
        }
        if id.name.is_empty() {
            return Err(PackageIdError::EmptyName { id: id.to_string() });
        }
        Ok(id)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    /// Repository or origin of the package
    pub fn data(&self) -> &str {
        &self.data
    }

    /// `name-version`, or just `name` when the version is empty
    pub fn name_version(&self) -> String {
        if self.version.is_empty() {
            self.name.clone()
        } else {
            format!("{}-{}", self.name, self.version)
        }
    }

    /// Two-line row text: `name-version` followed by the summary.
    ///
    /// The summary line is omitted when the summary is blank.
    pub fn format_twoline(&self, summary: &str) -> String {
        let summary = summary.trim();
        if summary.is_empty() {
            self.name_version()
        } else {
            format!("{}\n{}", self.name_version(), summary)
        }
    }

    /// One-line text: `name-version (summary)`
    pub fn format_oneline(&self, summary: &str) -> String {
        let summary = summary.trim();
        if summary.is_empty() {
            self.name_version()
        } else {
            format!("{} ({})", self.name_version(), summary)
        }
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}",
            self.name, self.version, self.arch, self.data
        )
    }
}

impl FromStr for PackageId {
    type Err = PackageIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(SEPARATOR).collect();
        if fields.len() != FIELD_COUNT {
            return Err(PackageIdError::FieldCount {
                id: s.to_string(),
                found: fields.len(),
            });
        }
        Self::new(fields[0], fields[1], fields[2], fields[3])
    }
}

impl TryFrom<String> for PackageId {
    type Error = PackageIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PackageId> for String {
    fn from(id: PackageId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_four_fields() {
        let id: PackageId = "foo;1.0;x86_64;installed".parse().expect("valid id");
        assert_eq!(id.name(), "foo");
        assert_eq!(id.version(), "1.0");
        assert_eq!(id.arch(), "x86_64");
        assert_eq!(id.data(), "installed");
        assert_eq!(id.to_string(), "foo;1.0;x86_64;installed");
    }

    #[test]
    fn test_empty_arch_and_data_are_allowed() {
        let id: PackageId = "gnome-packagekit;0.2.1;;".parse().expect("valid id");
        assert_eq!(id.arch(), "");
        assert_eq!(id.data(), "");
        assert_eq!(id.to_string(), "gnome-packagekit;0.2.1;;");
    }

    #[test]
    fn test_wrong_field_count_is_rejected() {
        let err = "foo;1.0;x86_64".parse::<PackageId>().unwrap_err();
        assert_eq!(
            err,
            PackageIdError::FieldCount {
                id: "foo;1.0;x86_64".to_string(),
                found: 3
            }
        );
        assert!("a;b;c;d;e".parse::<PackageId>().is_err());
        assert!("".parse::<PackageId>().is_err());
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let err = ";1.0;x86_64;fedora".parse::<PackageId>().unwrap_err();
        assert!(matches!(err, PackageIdError::EmptyName { .. }));
    }

    #[test]
    fn test_separator_in_field_is_rejected() {
        let err = PackageId::new("a;b", "1", "x86_64", "fedora").unwrap_err();
        assert_eq!(
            err,
            PackageIdError::SeparatorInField {
                field: "name",
                value: "a;b".to_string()
            }
        );

        let err = PackageId::new("foo", "1.0", "x86_64", "fedora;updates").unwrap_err();
        assert!(matches!(err, PackageIdError::SeparatorInField { field: "data", .. }));
    }

    #[test]
    fn test_built_ids_always_parse_back() {
        let id = PackageId::new("foo", "1.0", "", "local").unwrap();
        let back: PackageId = id.to_string().parse().unwrap();
        assert_eq!(back, id);

        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(serde_json::from_str::<PackageId>(&json).unwrap(), id);
    }

    #[test]
    fn test_twoline_format() {
        let id: PackageId = "foo;1.0;x86_64;fedora".parse().unwrap();
        assert_eq!(id.format_twoline("A foo tool"), "foo-1.0\nA foo tool");
        assert_eq!(id.format_twoline("   "), "foo-1.0");
        assert_eq!(id.format_oneline("A foo tool"), "foo-1.0 (A foo tool)");
    }

    #[test]
    fn test_name_version_without_version() {
        let id = PackageId::new("foo", "", "noarch", "local").unwrap();
        assert_eq!(id.name_version(), "foo");
    }

    #[test]
    fn test_serde_as_string() {
        let id: PackageId = "bar;2.0;x86_64;available".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"bar;2.0;x86_64;available\"");

        let back: PackageId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<PackageId>("\"bar;2.0\"").is_err());
    }
}
