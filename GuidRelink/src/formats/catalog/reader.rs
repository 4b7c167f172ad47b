//! Catalog table decoding
//!
//! Every read checks the remaining length first so a corrupt count or offset
//! can only ever truncate the table it belongs to.

use super::{Bucket, CatalogDocument, CatalogKey, DecodedCatalog, ENTRY_SIZE, KeyType, RawEntry};
use crate::error::{Error, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use byteorder::{LittleEndian, ReadBytesExt};
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Bounds-checked little-endian reader over one catalog table
struct TableCursor<'a> {
    cursor: Cursor<&'a [u8]>,
    table: &'static str,
}

impl<'a> TableCursor<'a> {
    fn new(data: &'a [u8], table: &'static str) -> Self {
        Self {
            cursor: Cursor::new(data),
            table,
        }
    }

    fn at(data: &'a [u8], table: &'static str, offset: usize) -> Self {
        let mut reader = Self::new(data, table);
        reader.cursor.set_position(offset as u64);
        reader
    }

    fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    fn remaining(&self) -> usize {
        self.cursor.get_ref().len().saturating_sub(self.position())
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        let available = self.remaining();
        if available < needed {
            return Err(Error::TruncatedCatalog {
                table: self.table,
                offset: self.position(),
                needed,
                available,
            });
        }
        Ok(())
    }

    fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.cursor.read_u8()?)
    }

    fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(self.cursor.read_u16::<LittleEndian>()?)
    }

    fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.cursor.read_u32::<LittleEndian>()?)
    }

    fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        Ok(self.cursor.read_i32::<LittleEndian>()?)
    }

    /// Read an `i32` count or length, rejecting negative values
    fn read_len(&mut self) -> Result<usize> {
        let offset = self.position();
        let value = self.read_i32()?;
        usize::try_from(value).map_err(|_| {
            Error::InvalidFormat(format!(
                "negative length {value} at offset {offset} in {} table",
                self.table
            ))
        })
    }

    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.ensure(len)?;
        let start = self.position();
        let data: &'a [u8] = *self.cursor.get_ref();
        self.cursor.set_position((start + len) as u64);
        Ok(&data[start..start + len])
    }

    /// String with a 1-byte length prefix
    fn read_short_ascii(&mut self) -> Result<String> {
        let len = self.read_u8()? as usize;
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

fn decode_utf16le(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

fn read_key(reader: &mut TableCursor<'_>) -> Result<CatalogKey> {
    let tag = reader.read_u8()?;
    let key = match KeyType::try_from(tag)? {
        KeyType::AsciiString => {
            let len = reader.read_len()?;
            CatalogKey::AsciiString(String::from_utf8_lossy(reader.read_bytes(len)?).into_owned())
        }
        KeyType::UnicodeString => {
            let len = reader.read_len()?;
            CatalogKey::UnicodeString(decode_utf16le(reader.read_bytes(len)?))
        }
        KeyType::UInt16 => CatalogKey::UInt16(reader.read_u16()?),
        KeyType::UInt32 => CatalogKey::UInt32(reader.read_u32()?),
        KeyType::Int32 => CatalogKey::Int32(reader.read_i32()?),
        KeyType::Hash128 => CatalogKey::Hash128(reader.read_short_ascii()?),
        KeyType::Type => {
            let assembly = reader.read_short_ascii()?;
            let class = reader.read_short_ascii()?;
            CatalogKey::Type { assembly, class }
        }
        KeyType::JsonObject => {
            let assembly = reader.read_short_ascii()?;
            let class = reader.read_short_ascii()?;
            // serialized object payload is not needed
            let len = reader.read_len()?;
            reader.read_bytes(len)?;
            CatalogKey::JsonObject { assembly, class }
        }
    };
    Ok(key)
}

/// Decode the key stored at `offset` bytes into the key table
///
/// # Errors
/// Returns [`Error::InvalidFormat`] for an offset inside the table header,
/// [`Error::UnsupportedKeyType`] for an unknown tag and
/// [`Error::TruncatedCatalog`] if the key runs past the end of the table.
pub fn decode_key_at(key_data: &[u8], offset: i32) -> Result<CatalogKey> {
    let offset = usize::try_from(offset)
        .ok()
        .filter(|&o| o >= 4)
        .ok_or_else(|| Error::InvalidFormat(format!("key offset {offset} inside table header")))?;
    let mut reader = TableCursor::at(key_data, "key", offset);
    read_key(&mut reader)
}

/// Decode every key of the key table in order
///
/// Keys are variable-length, so decoding stops at the first key that cannot be
/// read; the keys before it are returned.
pub fn decode_all_keys(key_data: &[u8]) -> Vec<CatalogKey> {
    let mut reader = TableCursor::new(key_data, "key");
    let count = match reader.read_len() {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!("Unreadable key table: {e}");
            return Vec::new();
        }
    };

    let mut keys = Vec::with_capacity(count.min(reader.remaining()));
    for index in 0..count {
        match read_key(&mut reader) {
            Ok(key) => keys.push(key),
            Err(e) => {
                tracing::warn!("Key table truncated at key {index} of {count}: {e}");
                break;
            }
        }
    }
    keys
}

/// Decode the bucket table
///
/// A bucket whose entry list runs past the end of the table keeps the indices
/// that could be read; decoding stops after it.
pub fn decode_buckets(bucket_data: &[u8]) -> Vec<Bucket> {
    let mut reader = TableCursor::new(bucket_data, "bucket");
    let count = match reader.read_len() {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!("Unreadable bucket table: {e}");
            return Vec::new();
        }
    };

    let mut buckets = Vec::with_capacity(count.min(reader.remaining() / 8));
    for index in 0..count {
        let header = match reader.read_i32() {
            Ok(key_offset) => reader.read_len().map(|entry_count| (key_offset, entry_count)),
            Err(e) => Err(e),
        };
        let (key_offset, entry_count) = match header {
            Ok(header) => header,
            Err(e) => {
                tracing::warn!("Bucket table truncated at bucket {index} of {count}: {e}");
                break;
            }
        };

        let mut entries = Vec::with_capacity(entry_count.min(reader.remaining() / 4));
        let mut truncated = None;
        for _ in 0..entry_count {
            match reader.read_i32() {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    truncated = Some(e);
                    break;
                }
            }
        }

        buckets.push(Bucket { key_offset, entries });
        if let Some(e) = truncated {
            tracing::warn!("Bucket {index} of {count} truncated: {e}");
            break;
        }
    }
    buckets
}

/// Decode the entry table
pub fn decode_entries(entry_data: &[u8]) -> Vec<RawEntry> {
    let mut reader = TableCursor::new(entry_data, "entry");
    let count = match reader.read_len() {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!("Unreadable entry table: {e}");
            return Vec::new();
        }
    };

    let mut entries = Vec::with_capacity(count.min(reader.remaining() / ENTRY_SIZE));
    for index in 0..count {
        if let Err(e) = reader.ensure(ENTRY_SIZE) {
            tracing::warn!("Entry table truncated at entry {index} of {count}: {e}");
            break;
        }
        let mut fields = [0i32; 7];
        for field in &mut fields {
            *field = reader.read_i32().unwrap_or_default();
        }
        entries.push(RawEntry {
            internal_id_index: fields[0],
            provider_index: fields[1],
            dependency_key_index: fields[2],
            dep_hash: fields[3],
            data_index: fields[4],
            primary_key_index: fields[5],
            resource_type_index: fields[6],
        });
    }
    entries
}

fn decode_base64(value: &str, source_name: &str, field: &str) -> Result<Vec<u8>> {
    STANDARD.decode(value.trim()).map_err(|e| Error::MalformedCatalog {
        source_name: source_name.to_string(),
        message: format!("{field}: {e}"),
    })
}

/// Decode a catalog document, reporting shape and encoding problems
///
/// # Errors
/// Returns [`Error::CatalogFieldMissing`] if one of the four table fields is
/// absent and [`Error::MalformedCatalog`] if a blob is not valid base64.
pub fn try_decode_catalog(doc: &CatalogDocument, source_name: &str) -> Result<DecodedCatalog> {
    let internal_ids = doc
        .internal_ids
        .clone()
        .ok_or(Error::CatalogFieldMissing { field: "m_InternalIds" })?;
    let key_b64 = doc
        .key_data
        .as_deref()
        .ok_or(Error::CatalogFieldMissing { field: "m_KeyDataString" })?;
    let bucket_b64 = doc
        .bucket_data
        .as_deref()
        .ok_or(Error::CatalogFieldMissing { field: "m_BucketDataString" })?;
    let entry_b64 = doc
        .entry_data
        .as_deref()
        .ok_or(Error::CatalogFieldMissing { field: "m_EntryDataString" })?;

    let key_data = decode_base64(key_b64, source_name, "m_KeyDataString")?;
    let bucket_data = decode_base64(bucket_b64, source_name, "m_BucketDataString")?;
    let entry_data = decode_base64(entry_b64, source_name, "m_EntryDataString")?;

    let buckets = decode_buckets(&bucket_data);
    let entries = decode_entries(&entry_data);

    tracing::debug!(
        "Decoded catalog {source_name}: {} buckets, {} entries, {} internal ids",
        buckets.len(),
        entries.len(),
        internal_ids.len()
    );

    Ok(DecodedCatalog {
        source_name: source_name.to_string(),
        key_data,
        buckets,
        entries,
        internal_ids,
        internal_id_prefixes: doc.internal_id_prefixes.clone(),
        provider_ids: doc.provider_ids.clone(),
        resource_types: doc.resource_types.clone(),
    })
}

/// Decode a catalog document; a malformed document yields an empty catalog
pub fn decode_catalog(doc: &CatalogDocument, source_name: &str) -> DecodedCatalog {
    try_decode_catalog(doc, source_name).unwrap_or_else(|e| {
        tracing::warn!("Skipping malformed catalog {source_name}: {e}");
        DecodedCatalog {
            source_name: source_name.to_string(),
            ..Default::default()
        }
    })
}

/// Decode catalog JSON bytes; unparseable JSON yields an empty catalog
pub fn parse_catalog_bytes(data: &[u8], source_name: &str) -> DecodedCatalog {
    match serde_json::from_slice::<CatalogDocument>(data) {
        Ok(doc) => decode_catalog(&doc, source_name),
        Err(e) => {
            tracing::warn!("Skipping catalog {source_name}: not a catalog document: {e}");
            DecodedCatalog {
                source_name: source_name.to_string(),
                ..Default::default()
            }
        }
    }
}

/// Read a catalog from disk
///
/// Only I/O failures are returned as errors; malformed content decodes to an
/// empty catalog.
///
/// # Errors
/// Returns [`Error::Io`] if the file cannot be read.
pub fn read_catalog<P: AsRef<Path>>(path: P) -> Result<DecodedCatalog> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    Ok(parse_catalog_bytes(&data, &path.to_string_lossy()))
}
