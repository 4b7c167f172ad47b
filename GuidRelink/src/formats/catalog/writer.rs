//! Catalog encoding
//!
//! Produces the same table layout the reader consumes. Used to build synthetic
//! catalogs for tests and by `guidrelink catalog encode`.

use super::{CatalogDocument, CatalogKey, RawEntry, ResourceTypeRef, NO_INDEX};
use crate::error::Result;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use byteorder::{LittleEndian, WriteBytesExt};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Builder for catalog documents
#[derive(Debug, Clone, Default)]
pub struct CatalogWriter {
    keys: Vec<CatalogKey>,
    /// Per key: indices into `entries`
    buckets: Vec<Vec<i32>>,
    entries: Vec<RawEntry>,
    internal_ids: Vec<String>,
    provider_ids: Vec<String>,
    resource_types: Vec<ResourceTypeRef>,
}

impl CatalogWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key with an empty bucket, returning its key index
    pub fn add_key(&mut self, key: CatalogKey) -> usize {
        self.keys.push(key);
        self.buckets.push(Vec::new());
        self.keys.len() - 1
    }

    /// Add an internal id string, returning its index
    pub fn add_internal_id(&mut self, id: impl Into<String>) -> i32 {
        self.internal_ids.push(id.into());
        (self.internal_ids.len() - 1) as i32
    }

    /// Add a provider id, returning its index
    pub fn add_provider(&mut self, provider: impl Into<String>) -> i32 {
        let provider = provider.into();
        if let Some(i) = self.provider_ids.iter().position(|p| *p == provider) {
            return i as i32;
        }
        self.provider_ids.push(provider);
        (self.provider_ids.len() - 1) as i32
    }

    /// Add a resource type by class name, returning its index
    pub fn add_resource_type(&mut self, assembly: &str, class: &str) -> i32 {
        if let Some(i) = self
            .resource_types
            .iter()
            .position(|t| t.class_name == class && t.assembly_name == assembly)
        {
            return i as i32;
        }
        self.resource_types.push(ResourceTypeRef {
            assembly_name: assembly.to_string(),
            class_name: class.to_string(),
        });
        (self.resource_types.len() - 1) as i32
    }

    /// Append a raw entry, returning its index
    pub fn add_entry(&mut self, entry: RawEntry) -> i32 {
        self.entries.push(entry);
        (self.entries.len() - 1) as i32
    }

    /// Point a key's bucket at an entry index (which need not be valid)
    pub fn link(&mut self, key_index: usize, entry_index: i32) {
        if let Some(bucket) = self.buckets.get_mut(key_index) {
            bucket.push(entry_index);
        }
    }

    /// Add `key -> location` as one key, one entry, one internal id
    pub fn add_location(
        &mut self,
        key: CatalogKey,
        location: &str,
        provider: Option<&str>,
        resource_type: Option<(&str, &str)>,
    ) -> usize {
        let internal_id_index = self.add_internal_id(location);
        let provider_index = provider.map_or(NO_INDEX, |p| self.add_provider(p));
        let resource_type_index =
            resource_type.map_or(NO_INDEX, |(assembly, class)| self.add_resource_type(assembly, class));
        let key_index = self.add_key(key);
        let entry_index = self.add_entry(RawEntry {
            internal_id_index,
            provider_index,
            dependency_key_index: NO_INDEX,
            dep_hash: 0,
            data_index: NO_INDEX,
            primary_key_index: key_index as i32,
            resource_type_index,
        });
        self.link(key_index, entry_index);
        key_index
    }

    /// Encode the key table, returning it with each key's byte offset
    #[must_use]
    pub fn encode_keys(&self) -> (Vec<u8>, Vec<i32>) {
        let mut data = Vec::new();
        let mut offsets = Vec::with_capacity(self.keys.len());
        write_i32(&mut data, self.keys.len() as i32);
        for key in &self.keys {
            offsets.push(data.len() as i32);
            encode_key(&mut data, key);
        }
        (data, offsets)
    }

    fn encode_buckets(&self, offsets: &[i32]) -> Vec<u8> {
        let mut data = Vec::new();
        write_i32(&mut data, self.buckets.len() as i32);
        for (bucket, &offset) in self.buckets.iter().zip(offsets) {
            write_i32(&mut data, offset);
            write_i32(&mut data, bucket.len() as i32);
            for &entry in bucket {
                write_i32(&mut data, entry);
            }
        }
        data
    }

    fn encode_entries(&self) -> Vec<u8> {
        let mut data = Vec::new();
        write_i32(&mut data, self.entries.len() as i32);
        for e in &self.entries {
            for field in [
                e.internal_id_index,
                e.provider_index,
                e.dependency_key_index,
                e.dep_hash,
                e.data_index,
                e.primary_key_index,
                e.resource_type_index,
            ] {
                write_i32(&mut data, field);
            }
        }
        data
    }

    /// Build the catalog document
    #[must_use]
    pub fn build(&self) -> CatalogDocument {
        let (key_data, offsets) = self.encode_keys();
        CatalogDocument {
            locator_id: Some("AddressablesMainContentCatalog".to_string()),
            internal_ids: Some(self.internal_ids.clone()),
            key_data: Some(STANDARD.encode(key_data)),
            bucket_data: Some(STANDARD.encode(self.encode_buckets(&offsets))),
            entry_data: Some(STANDARD.encode(self.encode_entries())),
            provider_ids: self.provider_ids.clone(),
            resource_types: self.resource_types.clone(),
            internal_id_prefixes: Vec::new(),
        }
    }
}

fn write_i32(data: &mut Vec<u8>, value: i32) {
    // writes into a Vec cannot fail
    let _ = data.write_i32::<LittleEndian>(value);
}

fn write_short_ascii(data: &mut Vec<u8>, s: &str) {
    let bytes = &s.as_bytes()[..s.len().min(u8::MAX as usize)];
    data.push(bytes.len() as u8);
    data.extend_from_slice(bytes);
}

fn encode_key(data: &mut Vec<u8>, key: &CatalogKey) {
    data.push(key.key_type() as u8);
    match key {
        CatalogKey::AsciiString(s) => {
            write_i32(data, s.len() as i32);
            data.extend_from_slice(s.as_bytes());
        }
        CatalogKey::UnicodeString(s) => {
            let units: Vec<u16> = s.encode_utf16().collect();
            write_i32(data, (units.len() * 2) as i32);
            for unit in units {
                data.extend_from_slice(&unit.to_le_bytes());
            }
        }
        CatalogKey::UInt16(v) => data.extend_from_slice(&v.to_le_bytes()),
        CatalogKey::UInt32(v) => data.extend_from_slice(&v.to_le_bytes()),
        CatalogKey::Int32(v) => write_i32(data, *v),
        CatalogKey::Hash128(h) => write_short_ascii(data, h),
        CatalogKey::Type { assembly, class } => {
            write_short_ascii(data, assembly);
            write_short_ascii(data, class);
        }
        CatalogKey::JsonObject { assembly, class } => {
            write_short_ascii(data, assembly);
            write_short_ascii(data, class);
            // empty JSON object, UTF-16
            let payload: Vec<u8> = "{}".encode_utf16().flat_map(u16::to_le_bytes).collect();
            write_i32(data, payload.len() as i32);
            data.extend_from_slice(&payload);
        }
    }
}

/// Write a catalog document to disk as JSON
///
/// # Errors
/// Returns an error if the file cannot be created or serialization fails.
pub fn write_catalog<P: AsRef<Path>>(path: P, doc: &CatalogDocument) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, doc)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::catalog::{decode_catalog, read_catalog};

    #[test]
    fn test_add_location_builds_joinable_catalog() {
        let mut writer = CatalogWriter::new();
        writer.add_location(
            CatalogKey::AsciiString("30b6e6ebf780b304f83e144c61a2e054".to_string()),
            "0#/Assets/bar.prefab",
            Some("UnityEngine.ResourceManagement.ResourceProviders.BundledAssetProvider"),
            Some(("UnityEngine.CoreModule", "UnityEngine.GameObject")),
        );
        let catalog = decode_catalog(&writer.build(), "mem");

        assert_eq!(catalog.buckets.len(), 1);
        let key = catalog.bucket_key(&catalog.buckets[0]).unwrap();
        assert_eq!(key.as_str(), Some("30b6e6ebf780b304f83e144c61a2e054"));

        let entries = catalog.bucket_entries(&catalog.buckets[0]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].internal_id, "0#/Assets/bar.prefab");
        assert_eq!(entries[0].resource_type.as_deref(), Some("UnityEngine.GameObject"));
        assert!(entries[0].provider_id.as_deref().unwrap().ends_with("BundledAssetProvider"));
    }

    #[test]
    fn test_providers_are_deduplicated() {
        let mut writer = CatalogWriter::new();
        assert_eq!(writer.add_provider("a"), 0);
        assert_eq!(writer.add_provider("b"), 1);
        assert_eq!(writer.add_provider("a"), 0);
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        let mut writer = CatalogWriter::new();
        writer.add_location(CatalogKey::AsciiString("Assets/a.png".to_string()), "Assets/a.png", None, None);
        write_catalog(&path, &writer.build()).unwrap();

        let catalog = read_catalog(&path).unwrap();
        assert_eq!(catalog.internal_ids, vec!["Assets/a.png".to_string()]);
        assert_eq!(catalog.entries.len(), 1);
    }
}
