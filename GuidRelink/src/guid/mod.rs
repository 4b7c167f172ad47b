//! 128-bit asset GUIDs
//!
//! Catalogs, script data and companion metadata all carry GUIDs as 32-character
//! hex strings. [`Guid`] stores the value as 16 bytes (four big-endian 32-bit
//! words) and converts between the representations.
//!
//! ```
//! use guidrelink::guid::Guid;
//!
//! let guid = Guid::parse_hex("30b6e6ebf780b304f83e144c61a2e054")?;
//! assert_eq!(guid.words()[0], 0x30b6e6eb);
//! assert_eq!(guid.to_string(), "30b6e6ebf780b304f83e144c61a2e054");
//! # Ok::<(), guidrelink::Error>(())
//! ```

mod companion;

pub use companion::to_companion_format;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Number of hex characters in a GUID string
pub const GUID_HEX_LEN: usize = 32;

/// Check whether `s` is exactly 32 hexadecimal characters
#[must_use]
pub fn is_guid_hex(s: &str) -> bool {
    s.len() == GUID_HEX_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// A 128-bit asset GUID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Guid(Uuid);

impl Guid {
    /// The all-zero GUID
    pub const NIL: Guid = Guid(Uuid::nil());

    /// Build a GUID from its raw bytes
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Build a GUID from four big-endian 32-bit words
    #[must_use]
    pub fn from_words(words: [u32; 4]) -> Self {
        let mut bytes = [0u8; 16];
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(words) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        Self::from_bytes(bytes)
    }

    /// Parse a 32-character hex string (no dashes, case-insensitive)
    ///
    /// # Errors
    /// Returns [`Error::InvalidGuid`] if `hex` is not exactly 32 hex characters.
    pub fn parse_hex(hex: &str) -> Result<Self> {
        let hex = hex.trim();
        if !is_guid_hex(hex) {
            return Err(Error::InvalidGuid(hex.to_string()));
        }
        Uuid::try_parse(hex)
            .map(Self)
            .map_err(|_| Error::InvalidGuid(hex.to_string()))
    }

    /// Derive a GUID from the MD5 digest of `input`
    ///
    /// The digest's 16 bytes are taken as four big-endian words, so the hex form
    /// of the result is the hex form of the digest.
    #[must_use]
    pub fn from_md5(input: &str) -> Self {
        let digest = md5::compute(input.as_bytes());
        Self::from_bytes(*digest)
    }

    /// Raw bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// The four big-endian 32-bit words
    #[must_use]
    pub fn words(&self) -> [u32; 4] {
        let bytes = self.as_bytes();
        let mut words = [0u32; 4];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        words
    }

    /// Lower-case 32-character hex form
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.simple().to_string()
    }

    /// The companion-metadata form of this GUID (see [`to_companion_format`])
    #[must_use]
    pub fn companion_hex(&self) -> String {
        companion::swap_hex(&self.to_hex())
    }

    /// Whether this is the all-zero GUID
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for Guid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_hex(s)
    }
}

impl Serialize for Guid {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Guid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}
