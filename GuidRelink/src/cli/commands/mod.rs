use clap::Subcommand;
use std::path::PathBuf;

pub mod catalog;
pub mod definitions;
pub mod execute;
pub mod guid;
pub mod resolve;

pub use definitions::{CatalogCommands, GuidCommands};

#[derive(Subcommand)]
pub enum Commands {
    /// Addressables catalog operations
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },

    /// Resolve a GUID for every asset in an asset graph
    Resolve {
        /// Asset graph dump (JSON)
        #[arg(short, long)]
        graph: PathBuf,

        /// Directory to search for catalog*.json files
        #[arg(short, long)]
        catalogs: Option<PathBuf>,

        /// relink.toml configuration
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the mapping report (JSON) here
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// GUID utilities
    Guid {
        #[command(subcommand)]
        command: GuidCommands,
    },
}
