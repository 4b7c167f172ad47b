//! CLI commands for catalog operations

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Instant;

use serde::Deserialize;

use crate::catalog::{CatalogCrossReference, load_catalog_dir};
use crate::cli::progress::{DISK, GEAR, LOOKING_GLASS, print_done, print_step, simple_spinner};
use crate::config::RelinkConfig;
use crate::formats::catalog::{CatalogKey, CatalogWriter, decode_all_keys, read_catalog, write_catalog};

/// Print the GUID -> location table of one catalog
pub fn dump(file: &Path, json: bool, keys: bool) -> anyhow::Result<()> {
    let catalog = read_catalog(file)?;

    if keys {
        let all = decode_all_keys(&catalog.key_data);
        for (i, key) in all.iter().enumerate() {
            println!("{i:>6}  {:?}  {key}", key.key_type());
        }
        println!("{} keys", all.len());
        return Ok(());
    }

    let xref = CatalogCrossReference::from_catalog(&catalog);
    if json {
        let table: BTreeMap<String, &str> = xref
            .sorted_locations()
            .into_iter()
            .map(|(guid, location)| (guid.to_hex(), location))
            .collect();
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    for (guid, location) in xref.sorted_locations() {
        println!("{guid}  {location}");
    }
    println!(
        "{} GUIDs ({} buckets, {} entries, {} internal ids)",
        xref.len(),
        catalog.buckets.len(),
        catalog.entries.len(),
        catalog.internal_ids.len()
    );
    Ok(())
}

/// Find, load and merge every catalog under a directory
pub fn scan(dir: &Path, config: Option<&Path>) -> anyhow::Result<()> {
    let config = RelinkConfig::load_or_default(config)?;

    let spinner = simple_spinner(&format!("Scanning {}...", dir.display()));
    let result = load_catalog_dir(dir, &config.catalog);
    spinner.finish_and_clear();

    let xref = &result.cross_reference;
    println!("Catalogs: {} loaded, {} skipped", result.loaded, result.skipped);
    println!("GUIDs:    {}", xref.len());
    println!("Names:    {}", xref.name_count());
    Ok(())
}

#[derive(Deserialize)]
struct Listing {
    locations: Vec<ListingLocation>,
}

#[derive(Deserialize)]
struct ListingLocation {
    key: String,
    location: String,
    #[serde(default)]
    provider: Option<String>,
    #[serde(default)]
    resource_type: Option<ListingType>,
}

#[derive(Deserialize)]
struct ListingType {
    assembly: String,
    class: String,
}

/// Write a catalog from a JSON listing
pub fn encode(listing: &Path, destination: &Path) -> anyhow::Result<()> {
    let start = Instant::now();

    print_step(1, 3, LOOKING_GLASS, "Reading listing...");
    let listing: Listing = serde_json::from_str(&fs::read_to_string(listing)?)?;

    print_step(2, 3, GEAR, "Encoding tables...");
    let mut writer = CatalogWriter::new();
    for item in &listing.locations {
        writer.add_location(
            CatalogKey::AsciiString(item.key.clone()),
            &item.location,
            item.provider.as_deref(),
            item.resource_type
                .as_ref()
                .map(|t| (t.assembly.as_str(), t.class.as_str())),
        );
    }

    print_step(3, 3, DISK, &format!("Writing {}...", destination.display()));
    write_catalog(destination, &writer.build())?;

    println!("{} locations", listing.locations.len());
    print_done(start.elapsed());
    Ok(())
}
