//! Asset identity types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::guid::Guid;

/// Normalize a resource path: trim, unify slashes, lower-case
#[must_use]
pub fn normalize_path(path: &str) -> String {
    path.trim().replace('\\', "/").to_lowercase()
}

/// `(package GUID, local id)`: names one object inside one loaded package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetIdentity {
    pub package_guid: Guid,
    pub local_id: i64,
}

impl AssetIdentity {
    #[must_use]
    pub const fn new(package_guid: Guid, local_id: i64) -> Self {
        Self {
            package_guid,
            local_id,
        }
    }
}

impl fmt::Display for AssetIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.package_guid, self.local_id)
    }
}

/// Normalized resource name used to join catalog names, script-data fields and
/// asset records
///
/// The file-name part of a name or path, without its last extension, lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    /// Derive a group id from a name or path
    ///
    /// Returns `None` when nothing is left after normalization.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = normalize_path(name);
        let file_name = normalized.rsplit('/').next().unwrap_or(&normalized);
        let stem = match file_name.rfind('.') {
            Some(dot) if dot > 0 => &file_name[..dot],
            _ => file_name,
        };
        let stem = stem.trim();
        if stem.is_empty() {
            None
        } else {
            Some(Self(stem.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One asset as described by the object-graph layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub identity: AssetIdentity,
    #[serde(default)]
    pub original_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_path: Option<String>,
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub package_name: String,
}

impl AssetRecord {
    /// Normalized original path, if the record has a non-empty one
    #[must_use]
    pub fn normalized_path(&self) -> Option<String> {
        self.original_path
            .as_deref()
            .map(normalize_path)
            .filter(|p| !p.is_empty())
    }

    /// Group id from the original path, falling back to the original name
    #[must_use]
    pub fn group_id(&self) -> Option<GroupId> {
        self.original_path
            .as_deref()
            .and_then(GroupId::from_name)
            .or_else(|| GroupId::from_name(&self.original_name))
    }

    /// Whether this record looks like a prefab
    #[must_use]
    pub fn is_prefab_like(&self, class_names: &[String], extension: &str) -> bool {
        if class_names.iter().any(|c| c.eq_ignore_ascii_case(&self.class_name)) {
            return true;
        }
        let suffix = format!(".{}", extension.to_lowercase());
        self.normalized_path().is_some_and(|p| p.ends_with(&suffix))
    }
}
