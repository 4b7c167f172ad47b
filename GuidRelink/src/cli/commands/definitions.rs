//! Subcommand enum definitions for CLI

use clap::Subcommand;
use std::path::PathBuf;

/// Catalog commands
#[derive(Subcommand)]
pub enum CatalogCommands {
    /// Decode one catalog and print its GUID -> location table
    Dump {
        /// catalog.json file
        file: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Print every key in the key table instead
        #[arg(long, conflicts_with = "json")]
        keys: bool,
    },

    /// Find and merge every catalog under a directory
    Scan {
        /// Directory to search
        dir: PathBuf,

        /// relink.toml configuration
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write a catalog from a JSON listing of GUID/location pairs
    Encode {
        /// Listing file: {"locations": [{"key": ..., "location": ...}]}
        listing: PathBuf,

        /// Output catalog.json
        destination: PathBuf,
    },
}

/// GUID commands
#[derive(Subcommand)]
pub enum GuidCommands {
    /// Convert a 32-character hex GUID to/from the companion-metadata form
    Companion {
        /// 32 hex characters
        hex: String,
    },

    /// Print the path-hash GUID of a resource path
    Hash {
        /// Resource path, e.g. Assets/Prefabs/Tent.prefab
        path: String,
    },
}
