//! The JSON envelope of a content catalog

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Assembly-qualified type reference from `m_resourceTypes`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceTypeRef {
    #[serde(rename = "m_AssemblyName", default)]
    pub assembly_name: String,
    #[serde(rename = "m_ClassName", default)]
    pub class_name: String,
}

/// A catalog document as stored on disk
///
/// The four table fields are optional at the serde level so a document with a
/// missing field still parses; [`try_decode_catalog`](super::try_decode_catalog)
/// reports which one is absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(rename = "m_LocatorId", default, skip_serializing_if = "Option::is_none")]
    pub locator_id: Option<String>,

    #[serde(rename = "m_InternalIds", default, skip_serializing_if = "Option::is_none")]
    pub internal_ids: Option<Vec<String>>,

    #[serde(rename = "m_KeyDataString", default, skip_serializing_if = "Option::is_none")]
    pub key_data: Option<String>,

    #[serde(rename = "m_BucketDataString", default, skip_serializing_if = "Option::is_none")]
    pub bucket_data: Option<String>,

    #[serde(rename = "m_EntryDataString", default, skip_serializing_if = "Option::is_none")]
    pub entry_data: Option<String>,

    #[serde(rename = "m_ProviderIds", default, skip_serializing_if = "Vec::is_empty")]
    pub provider_ids: Vec<String>,

    #[serde(rename = "m_resourceTypes", default, skip_serializing_if = "Vec::is_empty")]
    pub resource_types: Vec<ResourceTypeRef>,

    #[serde(rename = "m_InternalIdPrefixes", default, skip_serializing_if = "Vec::is_empty")]
    pub internal_id_prefixes: Vec<String>,
}

/// Parse a catalog document from JSON text
///
/// # Errors
/// Returns [`Error::JsonError`](crate::Error::JsonError) if the text is not a
/// JSON object of the expected shape.
pub fn parse_catalog_json(json: &str) -> Result<CatalogDocument> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a catalog document from disk
///
/// # Errors
/// Returns an error if the file cannot be read or is not valid JSON.
pub fn read_catalog_document<P: AsRef<Path>>(path: P) -> Result<CatalogDocument> {
    let text = fs::read_to_string(path)?;
    parse_catalog_json(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_document() {
        let json = r#"{
            "m_LocatorId": "AddressablesMainContentCatalog",
            "m_InternalIds": ["Assets/a.prefab"],
            "m_KeyDataString": "AAAAAA==",
            "m_BucketDataString": "AAAAAA==",
            "m_EntryDataString": "AAAAAA==",
            "m_resourceTypes": [{"m_AssemblyName": "UnityEngine", "m_ClassName": "UnityEngine.GameObject"}]
        }"#;
        let doc = parse_catalog_json(json).unwrap();
        assert_eq!(doc.internal_ids.as_deref(), Some(&["Assets/a.prefab".to_string()][..]));
        assert_eq!(doc.resource_types[0].class_name, "UnityEngine.GameObject");
        assert!(doc.provider_ids.is_empty());
    }

    #[test]
    fn test_missing_fields_still_parse() {
        let doc = parse_catalog_json(r#"{"m_InternalIds": []}"#).unwrap();
        assert!(doc.key_data.is_none());
        assert!(doc.bucket_data.is_none());
    }

    #[test]
    fn test_non_object_is_error() {
        assert!(parse_catalog_json("[1, 2, 3]").is_err());
    }
}
