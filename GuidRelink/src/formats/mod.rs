//! File format handlers
//!
//! Only the Addressables content catalog is decoded here; the asset graph
//! arrives already parsed (see [`crate::assets`]).

pub mod catalog;

pub use catalog::{CatalogDocument, CatalogKey, DecodedCatalog, read_catalog, write_catalog};
