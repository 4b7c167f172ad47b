//! Command execution implementations

use super::Commands;
use super::definitions::{CatalogCommands, GuidCommands};
use super::{catalog, guid, resolve};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Catalog { command } => command.execute(),
            Commands::Resolve {
                graph,
                catalogs,
                config,
                report,
                quiet,
            } => resolve::execute(
                graph,
                catalogs.as_deref(),
                config.as_deref(),
                report.as_deref(),
                *quiet,
            ),
            Commands::Guid { command } => command.execute(),
        }
    }
}

impl CatalogCommands {
    /// Execute the selected catalog command.
    ///
    /// # Errors
    /// Returns an error if the catalog cannot be read or written.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            CatalogCommands::Dump { file, json, keys } => catalog::dump(file, *json, *keys),
            CatalogCommands::Scan { dir, config } => catalog::scan(dir, config.as_deref()),
            CatalogCommands::Encode {
                listing,
                destination,
            } => catalog::encode(listing, destination),
        }
    }
}

impl GuidCommands {
    /// Execute the selected GUID command.
    ///
    /// # Errors
    /// Returns an error if the input is not a valid GUID.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            GuidCommands::Companion { hex } => guid::companion(hex),
            GuidCommands::Hash { path } => guid::hash(path),
        }
    }
}
