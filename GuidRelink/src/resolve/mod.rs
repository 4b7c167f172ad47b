//! GUID resolution for export
//!
//! Processing builds a [`ResolutionContext`] once; export workers then share
//! one [`GuidResolver`] that memoizes every identity it resolves.
//!
//! ```
//! use std::sync::Arc;
//! use guidrelink::assets::{AssetGraph, AssetIdentity};
//! use guidrelink::catalog::CatalogCrossReference;
//! use guidrelink::config::RelinkConfig;
//! use guidrelink::guid::Guid;
//! use guidrelink::resolve::{GuidOrigin, GuidResolver, ResolutionContext};
//!
//! let context = ResolutionContext::process(
//!     &AssetGraph::default(),
//!     CatalogCrossReference::new(),
//!     RelinkConfig::default(),
//! );
//! let resolver = GuidResolver::new(Arc::new(context));
//! let resolved = resolver.resolve(&AssetIdentity::new(Guid::NIL, 1));
//! assert_eq!(resolved.origin, GuidOrigin::CollectionHashDerived);
//! ```

mod cascade;
mod context;
mod report;

pub use cascade::{GuidOrigin, GuidResolver, ResolvedGuid, path_hash_guid, resolve_uncached};
pub use context::ResolutionContext;
pub use report::{MappingRecord, MappingReport, read_report, write_report};
