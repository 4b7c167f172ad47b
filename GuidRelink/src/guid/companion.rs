//! Conversion between catalog hex GUIDs and the companion-metadata form
//!
//! The companion form is built word by word: each 8-character word has its four
//! bytes reversed, then every adjacent character pair of the full string is
//! swapped (a nibble swap of each byte). Byte reversal moves whole bytes and the
//! nibble swap acts inside a byte, so the two commute and the composition is its
//! own inverse. The same function converts in both directions.

use crate::error::{Error, Result};

use super::is_guid_hex;

/// Convert a 32-character hex GUID to (or from) its companion-metadata form
///
/// # Errors
/// Returns [`Error::InvalidGuid`] if `hex` is not exactly 32 hex characters.
pub fn to_companion_format(hex: &str) -> Result<String> {
    if !is_guid_hex(hex) {
        return Err(Error::InvalidGuid(hex.to_string()));
    }
    Ok(swap_hex(&hex.to_ascii_lowercase()))
}

/// Apply the transform to an already-validated ASCII hex string
pub(crate) fn swap_hex(hex: &str) -> String {
    let bytes = hex.as_bytes();
    let mut reversed = Vec::with_capacity(bytes.len());

    for word in bytes.chunks(8) {
        // swap bytes 1<->4 and 2<->3 of the word
        for pair in word.chunks(2).rev() {
            reversed.extend_from_slice(pair);
        }
    }

    for pair in reversed.chunks_mut(2) {
        pair.swap(0, 1);
    }

    // only ASCII hex digits were moved around
    String::from_utf8_lossy(&reversed).into_owned()
}
