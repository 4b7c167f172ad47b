//! Addressables content catalog (`catalog*.json`)
//!
//! The catalog is a JSON document whose interesting parts are three base64
//! blobs encoding a hash table:
//!
//! - **Key data**: `i32` key count, then per key a 1-byte type tag and a
//!   type-specific payload. Buckets point at keys by byte offset into this blob.
//! - **Bucket data**: `i32` bucket count, then per bucket
//!   `(key_offset: i32, entry_count: i32, entry_index: i32 * entry_count)`.
//! - **Entry data**: `i32` entry count, then seven `i32` fields per entry.
//!
//! Entries point into the plain `m_InternalIds` string array for their
//! resource location.
//!
//! All integers are little-endian. Reads are bounds-checked: a bucket or entry
//! that points outside its table is dropped with a debug log, a table that ends
//! early is truncated with a warning, and a document missing one of its blobs
//! decodes to an empty catalog.

mod document;
mod keys;
mod reader;
mod writer;

pub use document::{CatalogDocument, ResourceTypeRef, parse_catalog_json, read_catalog_document};
pub use keys::{CatalogKey, KeyType};
pub use reader::{
    decode_all_keys, decode_buckets, decode_catalog, decode_entries, decode_key_at,
    parse_catalog_bytes, read_catalog, try_decode_catalog,
};
pub use writer::{CatalogWriter, write_catalog};

/// Size of one serialized entry (seven `i32` fields)
pub const ENTRY_SIZE: usize = 7 * 4;

/// Sentinel used by the catalog for "no index"
pub const NO_INDEX: i32 = -1;

/// One bucket of the catalog hash table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    /// Byte offset of the bucket's key inside the key data blob
    pub key_offset: i32,
    /// Indices into the entry table
    pub entries: Vec<i32>,
}

/// One raw row of the entry table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawEntry {
    pub internal_id_index: i32,
    pub provider_index: i32,
    pub dependency_key_index: i32,
    pub dep_hash: i32,
    pub data_index: i32,
    pub primary_key_index: i32,
    pub resource_type_index: i32,
}

/// A catalog entry joined against the string tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Resource location (`m_InternalIds[internal_id_index]`, prefix-expanded)
    pub internal_id: String,
    pub provider_index: i32,
    pub resource_type_index: i32,
    /// `m_ProviderIds[provider_index]`, when present and in range
    pub provider_id: Option<String>,
    /// `m_resourceTypes[resource_type_index].m_ClassName`, when present and in range
    pub resource_type: Option<String>,
}

/// A decoded catalog: raw tables plus the string arrays they index into
#[derive(Debug, Clone, Default)]
pub struct DecodedCatalog {
    /// Where the catalog came from (file path or caller-supplied name)
    pub source_name: String,
    /// Undecoded key blob; buckets address keys by offset into it
    pub key_data: Vec<u8>,
    pub buckets: Vec<Bucket>,
    pub entries: Vec<RawEntry>,
    pub internal_ids: Vec<String>,
    pub internal_id_prefixes: Vec<String>,
    pub provider_ids: Vec<String>,
    pub resource_types: Vec<ResourceTypeRef>,
}

impl DecodedCatalog {
    /// True when the catalog contributes nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty() || self.entries.is_empty()
    }

    /// Decode the key a bucket points at
    ///
    /// Returns `None` (and logs) when the offset is invalid or the key is truncated.
    #[must_use]
    pub fn bucket_key(&self, bucket: &Bucket) -> Option<CatalogKey> {
        match decode_key_at(&self.key_data, bucket.key_offset) {
            Ok(key) => Some(key),
            Err(e) => {
                tracing::debug!(
                    "{}: dropping bucket with key offset {}: {e}",
                    self.source_name,
                    bucket.key_offset
                );
                None
            }
        }
    }

    /// Join a bucket's entry indices against the entry table and `m_InternalIds`
    ///
    /// Indices outside either table are dropped.
    #[must_use]
    pub fn bucket_entries(&self, bucket: &Bucket) -> Vec<CatalogEntry> {
        bucket
            .entries
            .iter()
            .filter_map(|&index| self.entry(index))
            .collect()
    }

    /// Resolve one entry by index
    #[must_use]
    pub fn entry(&self, index: i32) -> Option<CatalogEntry> {
        let Some(raw) = usize::try_from(index).ok().and_then(|i| self.entries.get(i)) else {
            tracing::debug!("{}: entry index {index} out of range", self.source_name);
            return None;
        };

        let Some(internal_id) = usize::try_from(raw.internal_id_index)
            .ok()
            .and_then(|i| self.internal_ids.get(i))
        else {
            tracing::debug!(
                "{}: entry {index} has internal id index {} out of range ({} ids)",
                self.source_name,
                raw.internal_id_index,
                self.internal_ids.len()
            );
            return None;
        };

        let provider_id = usize::try_from(raw.provider_index)
            .ok()
            .and_then(|i| self.provider_ids.get(i))
            .cloned();
        let resource_type = usize::try_from(raw.resource_type_index)
            .ok()
            .and_then(|i| self.resource_types.get(i))
            .map(|t| t.class_name.clone());

        Some(CatalogEntry {
            internal_id: self.expand_internal_id(internal_id),
            provider_index: raw.provider_index,
            resource_type_index: raw.resource_type_index,
            provider_id,
            resource_type,
        })
    }

    /// Expand `<n>#<rest>` against `m_InternalIdPrefixes`
    ///
    /// Ids are returned verbatim when the catalog has no prefix table or the
    /// prefix index is not valid.
    fn expand_internal_id(&self, id: &str) -> String {
        if self.internal_id_prefixes.is_empty() {
            return id.to_string();
        }
        id.split_once('#')
            .and_then(|(prefix, rest)| {
                let index = prefix.parse::<usize>().ok()?;
                let expanded = self.internal_id_prefixes.get(index)?;
                Some(format!("{expanded}{rest}"))
            })
            .unwrap_or_else(|| id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_with_ids(ids: &[&str], prefixes: &[&str]) -> DecodedCatalog {
        DecodedCatalog {
            source_name: "test".to_string(),
            entries: vec![RawEntry::default()],
            internal_ids: ids.iter().map(ToString::to_string).collect(),
            internal_id_prefixes: prefixes.iter().map(ToString::to_string).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_internal_id_kept_without_prefix_table() {
        let catalog = catalog_with_ids(&["0#/Assets/bar.prefab"], &[]);
        assert_eq!(catalog.entry(0).unwrap().internal_id, "0#/Assets/bar.prefab");
    }

    #[test]
    fn test_internal_id_prefix_expansion() {
        let catalog = catalog_with_ids(&["0#/bar.prefab"], &["Assets/Prefabs"]);
        assert_eq!(catalog.entry(0).unwrap().internal_id, "Assets/Prefabs/bar.prefab");
    }

    #[test]
    fn test_internal_id_bad_prefix_index() {
        let catalog = catalog_with_ids(&["7#/bar.prefab"], &["Assets"]);
        assert_eq!(catalog.entry(0).unwrap().internal_id, "7#/bar.prefab");
    }

    #[test]
    fn test_entry_out_of_range() {
        let catalog = catalog_with_ids(&["a"], &[]);
        assert!(catalog.entry(1).is_none());
        assert!(catalog.entry(-1).is_none());
    }

    #[test]
    fn test_optional_tables_out_of_range() {
        let mut catalog = catalog_with_ids(&["a"], &[]);
        catalog.entries[0].provider_index = 3;
        catalog.entries[0].resource_type_index = NO_INDEX;
        let entry = catalog.entry(0).unwrap();
        assert_eq!(entry.provider_id, None);
        assert_eq!(entry.resource_type, None);
    }
}
