//! The asset graph handed over by the object-graph layer
//!
//! Script-data objects are exposed as a tree of [`ScriptValue`]s so matching
//! works on field names and shapes, never on declared type names.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use super::types::{AssetIdentity, AssetRecord};
use crate::error::Result;
use crate::guid::Guid;

/// A tagged script-data value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum ScriptValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<ScriptValue>),
    Struct(IndexMap<String, ScriptValue>),
}

impl ScriptValue {
    /// Named field of a struct value
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&ScriptValue> {
        self.as_struct().and_then(|fields| fields.get(name))
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[ScriptValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_struct(&self) -> Option<&IndexMap<String, ScriptValue>> {
        match self {
            Self::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Build a struct value from `(name, value)` pairs
    #[must_use]
    pub fn structure<K: Into<String>>(fields: impl IntoIterator<Item = (K, ScriptValue)>) -> Self {
        Self::Struct(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    #[must_use]
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }
}

/// A script-data object (`MonoBehaviour`-style) from the asset graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptObject {
    pub identity: AssetIdentity,
    /// Structural type name as reported by the deserializer
    #[serde(default)]
    pub type_name: String,
    /// Path of the asset the object was loaded from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_path: Option<String>,
    /// Root struct of the object's fields
    #[serde(default)]
    pub data: ScriptValue,
}

/// One loaded package (bundle / serialized file)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedPackage {
    pub name: String,
    /// File name on disk; GUID-like names double as package GUIDs
    #[serde(default)]
    pub file_name: String,
    /// GUID parsed from the package itself, when it carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<Guid>,
}

/// A reference from one package to another
///
/// Older references only carry a name; newer ones carry a GUID, and may carry both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ExternalReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<Guid>,
}

impl ExternalReference {
    #[must_use]
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            guid: None,
        }
    }

    #[must_use]
    pub fn by_guid(guid: Guid) -> Self {
        Self {
            name: None,
            guid: Some(guid),
        }
    }
}

impl fmt::Display for ExternalReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, &self.guid) {
            (Some(name), Some(guid)) => write!(f, "{name} ({guid})"),
            (Some(name), None) => write!(f, "{name}"),
            (None, Some(guid)) => write!(f, "{guid}"),
            (None, None) => write!(f, "<empty reference>"),
        }
    }
}

/// Everything the object-graph layer hands to the identity engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetGraph {
    #[serde(default)]
    pub packages: Vec<LoadedPackage>,
    #[serde(default)]
    pub assets: Vec<AssetRecord>,
    #[serde(default)]
    pub script_objects: Vec<ScriptObject>,
    #[serde(default)]
    pub external_references: Vec<ExternalReference>,
}

impl AssetGraph {
    /// Load an asset graph dump (JSON)
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
