//! `relink.toml` configuration
//!
//! Every field has a default, so an empty file (or no file) gives the stock
//! behaviour. Example:
//!
//! ```toml
//! [catalog]
//! file_prefix = "catalog"
//!
//! [leveldata]
//! type_keywords = ["level", "tutorial", "stage"]
//! default_ratio = 3
//!
//! [resolve]
//! extension_substitutions = [["png", "jpg"]]
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;

fn default_catalog_prefix() -> String {
    "catalog".to_string()
}

fn default_catalog_extension() -> String {
    "json".to_string()
}

fn default_true() -> bool {
    true
}

fn default_type_keywords() -> Vec<String> {
    vec!["level".to_string(), "tutorial".to_string()]
}

fn default_group_id_fields() -> Vec<String> {
    vec!["groupId".to_string(), "stageId".to_string()]
}

fn default_guid_field() -> String {
    "m_AssetGUID".to_string()
}

fn default_sub_object_field() -> String {
    "m_SubObjectName".to_string()
}

fn default_ratio() -> usize {
    3
}

fn default_extension_substitutions() -> Vec<(String, String)> {
    [("png", "jpg"), ("jpg", "png"), ("tga", "png"), ("psd", "png")]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect()
}

fn default_prefab_class_names() -> Vec<String> {
    vec!["GameObject".to_string(), "Prefab".to_string()]
}

fn default_prefab_extension() -> String {
    "prefab".to_string()
}

/// Full configuration (relink.toml)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelinkConfig {
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub leveldata: LeveldataSettings,
    #[serde(default)]
    pub resolve: ResolveSettings,
}

/// Catalog discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// File name prefix of catalog documents (`catalog*.json`)
    #[serde(default = "default_catalog_prefix")]
    pub file_prefix: String,
    #[serde(default = "default_catalog_extension")]
    pub file_extension: String,
    #[serde(default = "default_true")]
    pub follow_links: bool,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            file_prefix: default_catalog_prefix(),
            file_extension: default_catalog_extension(),
            follow_links: true,
        }
    }
}

/// Leveldata extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeveldataSettings {
    /// Case-insensitive substrings of a type name or origin path that mark a
    /// script-data object as leveldata
    #[serde(default = "default_type_keywords")]
    pub type_keywords: Vec<String>,
    /// Names of the string sub-field carrying a group/stage id
    #[serde(default = "default_group_id_fields")]
    pub group_id_fields: Vec<String>,
    /// Name of the 32-hex GUID field of a reference value
    #[serde(default = "default_guid_field")]
    pub guid_field: String,
    /// Name of the sibling sub-object field of a reference value
    #[serde(default = "default_sub_object_field")]
    pub sub_object_field: String,
    /// References per group when the measured ratio rounds to zero
    #[serde(default = "default_ratio")]
    pub default_ratio: usize,
}

impl Default for LeveldataSettings {
    fn default() -> Self {
        Self {
            type_keywords: default_type_keywords(),
            group_id_fields: default_group_id_fields(),
            guid_field: default_guid_field(),
            sub_object_field: default_sub_object_field(),
            default_ratio: default_ratio(),
        }
    }
}

/// GUID resolution cascade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveSettings {
    /// `(asset extension, catalog extension)` pairs tried, in order, when the
    /// exact path is not in the catalog
    #[serde(default = "default_extension_substitutions")]
    pub extension_substitutions: Vec<(String, String)>,
    /// Class names that make a record the preferred owner of its group id
    #[serde(default = "default_prefab_class_names")]
    pub prefab_class_names: Vec<String>,
    /// Path extension that makes a record the preferred owner of its group id
    #[serde(default = "default_prefab_extension")]
    pub prefab_extension: String,
}

impl Default for ResolveSettings {
    fn default() -> Self {
        Self {
            extension_substitutions: default_extension_substitutions(),
            prefab_class_names: default_prefab_class_names(),
            prefab_extension: default_prefab_extension(),
        }
    }
}

impl RelinkConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading config from {}", path.display());
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Load configuration from a file if given, otherwise use defaults
    ///
    /// # Errors
    /// Returns an error if a path is given and it cannot be loaded.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns an error if the text is not valid TOML for this schema.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Serialize to pretty TOML
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Set the leveldata type keywords.
    #[must_use]
    pub fn with_type_keywords(mut self, keywords: Vec<String>) -> Self {
        self.leveldata.type_keywords = keywords;
        self
    }

    /// Set the leveldata fallback ratio.
    #[must_use]
    pub fn with_default_ratio(mut self, ratio: usize) -> Self {
        self.leveldata.default_ratio = ratio.max(1);
        self
    }

    /// Set the extension substitutions tried by the cascade.
    #[must_use]
    pub fn with_extension_substitutions(mut self, substitutions: Vec<(String, String)>) -> Self {
        self.resolve.extension_substitutions = substitutions;
        self
    }

    /// Set the catalog file prefix.
    #[must_use]
    pub fn with_catalog_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.catalog.file_prefix = prefix.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_toml_is_default() {
        let config = RelinkConfig::from_toml_str("").unwrap();
        assert_eq!(config, RelinkConfig::default());
        assert_eq!(config.leveldata.default_ratio, 3);
        assert_eq!(config.catalog.file_prefix, "catalog");
    }

    #[test]
    fn test_partial_section() {
        let config = RelinkConfig::from_toml_str(
            r#"
            [leveldata]
            type_keywords = ["stage"]

            [resolve]
            extension_substitutions = [["webp", "png"]]
            "#,
        )
        .unwrap();
        assert_eq!(config.leveldata.type_keywords, vec!["stage".to_string()]);
        assert_eq!(config.leveldata.guid_field, "m_AssetGUID");
        assert_eq!(
            config.resolve.extension_substitutions,
            vec![("webp".to_string(), "png".to_string())]
        );
        assert_eq!(config.resolve.prefab_extension, "prefab");
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = RelinkConfig::default()
            .with_default_ratio(4)
            .with_catalog_prefix("content_catalog");
        let text = config.to_toml_string().unwrap();
        let parsed = RelinkConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_ratio_is_at_least_one() {
        assert_eq!(RelinkConfig::default().with_default_ratio(0).leveldata.default_ratio, 1);
    }

    #[test]
    fn test_bad_toml() {
        assert!(RelinkConfig::from_toml_str("[leveldata]\ndefault_ratio = \"three\"").is_err());
    }
}
