//! Catalog key types

use std::fmt;

use crate::error::Error;
use crate::guid::{Guid, is_guid_hex};

/// Type tag preceding every serialized key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum KeyType {
    AsciiString = 0,
    UnicodeString = 1,
    UInt16 = 2,
    UInt32 = 3,
    Int32 = 4,
    Hash128 = 5,
    Type = 6,
    JsonObject = 7,
}

impl TryFrom<u8> for KeyType {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::AsciiString),
            1 => Ok(Self::UnicodeString),
            2 => Ok(Self::UInt16),
            3 => Ok(Self::UInt32),
            4 => Ok(Self::Int32),
            5 => Ok(Self::Hash128),
            6 => Ok(Self::Type),
            7 => Ok(Self::JsonObject),
            other => Err(Error::UnsupportedKeyType(other)),
        }
    }
}

/// A decoded catalog key
///
/// `JsonObject` keys carry a serialized object payload that is skipped; only
/// its type name is kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogKey {
    AsciiString(String),
    UnicodeString(String),
    UInt16(u16),
    UInt32(u32),
    Int32(i32),
    Hash128(String),
    Type { assembly: String, class: String },
    JsonObject { assembly: String, class: String },
}

impl CatalogKey {
    /// The type tag this key serializes with
    #[must_use]
    pub fn key_type(&self) -> KeyType {
        match self {
            Self::AsciiString(_) => KeyType::AsciiString,
            Self::UnicodeString(_) => KeyType::UnicodeString,
            Self::UInt16(_) => KeyType::UInt16,
            Self::UInt32(_) => KeyType::UInt32,
            Self::Int32(_) => KeyType::Int32,
            Self::Hash128(_) => KeyType::Hash128,
            Self::Type { .. } => KeyType::Type,
            Self::JsonObject { .. } => KeyType::JsonObject,
        }
    }

    /// String payload of string-shaped keys
    ///
    /// `Hash128` keys are content hashes of bundles, not asset addresses, so they
    /// are not considered string-shaped here.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::AsciiString(s) | Self::UnicodeString(s) => Some(s),
            _ => None,
        }
    }

    /// The asset GUID this key names, if it is a 32-hex string key
    #[must_use]
    pub fn as_guid(&self) -> Option<Guid> {
        self.as_str()
            .filter(|s| is_guid_hex(s))
            .and_then(|s| Guid::parse_hex(s).ok())
    }
}

impl fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AsciiString(s) | Self::UnicodeString(s) => write!(f, "{s}"),
            Self::UInt16(v) => write!(f, "{v}"),
            Self::UInt32(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Hash128(h) => write!(f, "hash:{h}"),
            Self::Type { assembly, class } => write!(f, "type:{class}, {assembly}"),
            Self::JsonObject { assembly, class } => write!(f, "json:{class}, {assembly}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_type_from_tag() {
        assert_eq!(KeyType::try_from(0).unwrap(), KeyType::AsciiString);
        assert_eq!(KeyType::try_from(7).unwrap(), KeyType::JsonObject);
        assert!(matches!(KeyType::try_from(8), Err(Error::UnsupportedKeyType(8))));
    }

    #[test]
    fn test_guid_keys() {
        let key = CatalogKey::AsciiString("30b6e6ebf780b304f83e144c61a2e054".to_string());
        assert!(key.as_guid().is_some());

        let unicode = CatalogKey::UnicodeString("30B6E6EBF780B304F83E144C61A2E054".to_string());
        assert_eq!(unicode.as_guid(), key.as_guid());

        let address = CatalogKey::AsciiString("Assets/bar.prefab".to_string());
        assert!(address.as_guid().is_none());

        let hash = CatalogKey::Hash128("30b6e6ebf780b304f83e144c61a2e054".to_string());
        assert!(hash.as_guid().is_none());

        assert!(CatalogKey::Int32(5).as_guid().is_none());
    }
}
