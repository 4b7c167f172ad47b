//! Catalog cross-references
//!
//! Turns decoded catalogs into the lookup tables the resolution cascade uses:
//!
//! - **GUID -> location** and its inverse (first writer wins)
//! - **asset path -> GUID** for exact path matches
//! - **name -> GUIDs** keyed by the location's normalized file name
//!
//! # Usage
//!
//! ```no_run
//! use guidrelink::catalog::load_catalog_dir;
//! use guidrelink::config::CatalogSettings;
//!
//! let result = load_catalog_dir("output/ExportedProject", &CatalogSettings::default());
//! println!("{} GUIDs from {} catalogs", result.cross_reference.len(), result.loaded);
//! ```

mod cross_reference;
mod discovery;

pub use cross_reference::{CatalogCrossReference, extract_asset_path};
pub use discovery::{CatalogLoadResult, find_catalog_files, load_catalog_dir, load_catalogs};
