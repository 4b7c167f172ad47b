//! Asset identities, the asset graph, and the identity indexer

mod graph;
mod index;
mod types;

pub use graph::{AssetGraph, ExternalReference, LoadedPackage, ScriptObject, ScriptValue};
pub use index::AssetIndex;
pub use types::{AssetIdentity, AssetRecord, GroupId, normalize_path};
