//! # GuidRelink
//!
//! Stable asset GUIDs for projects reconstructed from built Unity packages.
//!
//! Exported assets need GUIDs that match what the rest of the project expects.
//! They are recovered from the most trusted source available:
//!
//! - **Leveldata** - script data that references assets by GUID per stage/group
//! - **Addressables catalogs** - the binary hash tables inside `catalog*.json`
//! - **Hashes** - a stable MD5 of the asset's path (or name) when nothing else knows it
//!
//! It also resolves GUID-addressed dependencies between packages and converts
//! GUIDs to the byte-swapped form companion metadata files use.
//!
//! ## Quick Start
//!
//! ### Reading a Catalog
//!
//! ```no_run
//! use guidrelink::catalog::CatalogCrossReference;
//! use guidrelink::formats::catalog::read_catalog;
//!
//! let catalog = read_catalog("StreamingAssets/aa/catalog.json")?;
//! let xref = CatalogCrossReference::from_catalog(&catalog);
//! for (guid, location) in xref.sorted_locations() {
//!     println!("{guid} -> {location}");
//! }
//! # Ok::<(), guidrelink::Error>(())
//! ```
//!
//! ### Resolving an Asset Graph
//!
//! ```no_run
//! use std::sync::Arc;
//! use guidrelink::prelude::*;
//!
//! let config = RelinkConfig::default();
//! let graph = AssetGraph::load("graph.json")?;
//! let catalogs = load_catalog_dir("ExportedProject", &config.catalog).cross_reference;
//!
//! let resolver = GuidResolver::new(Arc::new(ResolutionContext::process(&graph, catalogs, config)));
//! for record in &graph.assets {
//!     let resolved = resolver.resolve(&record.identity);
//!     println!("{} {} ({})", record.original_name, resolved.guid, resolved.origin);
//! }
//! write_report("mapping.json", &resolver.report())?;
//! # Ok::<(), guidrelink::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `guidrelink` command-line binary

pub mod assets;
pub mod catalog;
pub mod config;
pub mod dependency;
pub mod error;
pub mod formats;
pub mod guid;
pub mod leveldata;
pub mod resolve;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::config::RelinkConfig;
    pub use crate::guid::{Guid, to_companion_format};

    pub use crate::assets::{
        AssetGraph, AssetIdentity, AssetIndex, AssetRecord, ExternalReference, GroupId,
        LoadedPackage, ScriptObject, ScriptValue,
    };

    // Catalogs
    pub use crate::formats::catalog::{CatalogKey, DecodedCatalog, read_catalog};
    pub use crate::catalog::{CatalogCrossReference, load_catalog_dir};

    pub use crate::leveldata::{LeveldataAssociation, LeveldataExtractor, LeveldataIndex};

    // Resolution
    pub use crate::resolve::{
        GuidOrigin, GuidResolver, MappingRecord, MappingReport, ResolutionContext, ResolvedGuid,
        write_report,
    };

    pub use crate::dependency::{CollectingReporter, DependencyResolver, TracingReporter};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
