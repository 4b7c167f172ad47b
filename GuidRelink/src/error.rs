//! Error types for `GuidRelink`

use thiserror::Error;

/// The error type for `GuidRelink` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Catalog Errors ====================
    /// The catalog document could not be decoded (bad base64, bad JSON shape).
    #[error("malformed catalog {source_name}: {message}")]
    MalformedCatalog {
        /// File path or field name the problem was found in.
        source_name: String,
        /// Description of what is wrong.
        message: String,
    },

    /// A required catalog field is absent.
    #[error("catalog field missing: {field}")]
    CatalogFieldMissing {
        /// The JSON field name (e.g. `m_KeyDataString`).
        field: &'static str,
    },

    /// A read inside one of the binary catalog tables would overrun the buffer.
    #[error("truncated {table} table: need {needed} bytes at offset {offset}, {available} available")]
    TruncatedCatalog {
        /// Which table was being read (`key`, `bucket`, `entry`).
        table: &'static str,
        /// Byte offset of the read.
        offset: usize,
        /// Number of bytes the read required.
        needed: usize,
        /// Number of bytes left in the buffer.
        available: usize,
    },

    /// A key carries a type tag outside the known set.
    #[error("unsupported catalog key type: {0}")]
    UnsupportedKeyType(u8),

    // ==================== GUID Errors ====================
    /// A hex string is not exactly 32 hexadecimal characters.
    #[error("invalid GUID: {0:?}")]
    InvalidGuid(String),

    // ==================== Dependency Errors ====================
    /// No loaded package matches a reference by name or GUID.
    #[error("missing dependency: {reference}")]
    MissingDependency {
        /// Display form of the unresolved reference.
        reference: String,
    },

    // ==================== Parsing Errors ====================
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML configuration parsing error.
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML configuration serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    // ==================== Generic/Fallback Errors ====================
    /// Invalid format error (use specific variants when possible).
    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

/// A specialized Result type for `GuidRelink` operations.
pub type Result<T> = std::result::Result<T, Error>;
