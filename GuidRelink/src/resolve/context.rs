//! Processing-phase output shared by every export worker

use crate::assets::{AssetGraph, AssetIndex};
use crate::catalog::CatalogCrossReference;
use crate::config::RelinkConfig;
use crate::leveldata::{LeveldataExtractor, LeveldataIndex};

/// Tables built once before export and read-only afterwards
#[derive(Debug, Clone, Default)]
pub struct ResolutionContext {
    config: RelinkConfig,
    index: AssetIndex,
    catalogs: CatalogCrossReference,
    leveldata: LeveldataIndex,
}

impl ResolutionContext {
    /// Assemble a context from already-built tables
    #[must_use]
    pub fn new(
        config: RelinkConfig,
        index: AssetIndex,
        catalogs: CatalogCrossReference,
        leveldata: LeveldataIndex,
    ) -> Self {
        Self {
            config,
            index,
            catalogs,
            leveldata,
        }
    }

    /// Run the processing phase over an asset graph
    ///
    /// Indexes every asset record and scans every script object for leveldata
    /// references. `catalogs` is usually the output of
    /// [`load_catalog_dir`](crate::catalog::load_catalog_dir).
    #[must_use]
    pub fn process(graph: &AssetGraph, catalogs: CatalogCrossReference, config: RelinkConfig) -> Self {
        tracing::info!(
            "Processing {} assets, {} script objects, {} catalog GUIDs",
            graph.assets.len(),
            graph.script_objects.len(),
            catalogs.len()
        );

        let index = AssetIndex::build(&graph.assets, &config.resolve);
        let leveldata = LeveldataExtractor::new(&config.leveldata).extract_all(&graph.script_objects);

        Self::new(config, index, catalogs, leveldata)
    }

    #[must_use]
    pub fn config(&self) -> &RelinkConfig {
        &self.config
    }

    #[must_use]
    pub fn index(&self) -> &AssetIndex {
        &self.index
    }

    #[must_use]
    pub fn catalogs(&self) -> &CatalogCrossReference {
        &self.catalogs
    }

    #[must_use]
    pub fn leveldata(&self) -> &LeveldataIndex {
        &self.leveldata
    }
}
