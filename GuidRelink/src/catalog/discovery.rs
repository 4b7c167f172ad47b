//! Catalog discovery and parallel loading
//!
//! Catalogs are decoded in parallel and folded in sorted path order, so the
//! merged tables (and the first-writer-wins choices in them) do not depend on
//! thread scheduling.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use walkdir::WalkDir;

use super::CatalogCrossReference;
use crate::config::CatalogSettings;
use crate::formats::catalog::read_catalog;

/// Result of loading a set of catalogs
#[derive(Debug, Clone, Default)]
pub struct CatalogLoadResult {
    /// Merged tables
    pub cross_reference: CatalogCrossReference,
    /// Catalogs that contributed at least one GUID
    pub loaded: usize,
    /// Catalogs that were unreadable or contributed nothing
    pub skipped: usize,
}

/// Whether a file name matches `<prefix>*.<extension>` (case-insensitive)
fn is_catalog_file(path: &Path, settings: &CatalogSettings) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.to_lowercase()
        .starts_with(&settings.file_prefix.to_lowercase())
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&settings.file_extension))
}

/// Find all catalog documents under `dir` recursively
///
/// # Returns
/// A sorted list of catalog paths.
pub fn find_catalog_files<P: AsRef<Path>>(dir: P, settings: &CatalogSettings) -> Vec<PathBuf> {
    let mut catalogs: Vec<_> = WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.path().is_file() && is_catalog_file(e.path(), settings))
        .map(|e| e.path().to_path_buf())
        .collect();

    catalogs.sort();
    catalogs
}

/// Decode catalogs in parallel and merge them in the given order
pub fn load_catalogs(paths: &[PathBuf]) -> CatalogLoadResult {
    let skipped = AtomicUsize::new(0);

    let tables: Vec<CatalogCrossReference> = paths
        .par_iter()
        .map(|path| match read_catalog(path) {
            Ok(catalog) => {
                let xref = CatalogCrossReference::from_catalog(&catalog);
                if xref.is_empty() {
                    skipped.fetch_add(1, Ordering::SeqCst);
                }
                xref
            }
            Err(e) => {
                tracing::warn!("Failed to read catalog {}: {e}", path.display());
                skipped.fetch_add(1, Ordering::SeqCst);
                CatalogCrossReference::new()
            }
        })
        .collect();

    let mut merged = CatalogCrossReference::new();
    for table in &tables {
        merged.merge(table);
    }

    let skipped = skipped.load(Ordering::SeqCst);
    tracing::info!(
        "Loaded {} catalogs ({skipped} skipped): {} GUIDs, {} names",
        paths.len(),
        merged.len(),
        merged.name_count()
    );

    CatalogLoadResult {
        cross_reference: merged,
        loaded: paths.len() - skipped,
        skipped,
    }
}

/// Find and load every catalog under `dir`
pub fn load_catalog_dir<P: AsRef<Path>>(dir: P, settings: &CatalogSettings) -> CatalogLoadResult {
    let dir = dir.as_ref();
    let paths = find_catalog_files(dir, settings);
    tracing::info!("Found {} catalogs under {}", paths.len(), dir.display());
    load_catalogs(&paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::catalog::{CatalogKey, CatalogWriter, write_catalog};
    use crate::guid::Guid;
    use std::fs;

    fn write_single(path: &Path, guid: &str, location: &str) {
        let mut writer = CatalogWriter::new();
        writer.add_location(CatalogKey::AsciiString(guid.to_string()), location, None, None);
        write_catalog(path, &writer.build()).unwrap();
    }

    #[test]
    fn test_find_catalog_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("aa/StreamingAssets/aa");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("catalog.json"), "{}").unwrap();
        fs::write(nested.join("Catalog_2024.JSON"), "{}").unwrap();
        fs::write(nested.join("catalog.hash"), "abc").unwrap();
        fs::write(dir.path().join("settings.json"), "{}").unwrap();

        let found = find_catalog_files(dir.path(), &CatalogSettings::default());
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["Catalog_2024.JSON", "catalog.json"]);
    }

    #[test]
    fn test_load_merges_in_path_order() {
        let dir = tempfile::tempdir().unwrap();
        let guid = "30b6e6ebf780b304f83e144c61a2e054";
        write_single(&dir.path().join("catalog_a.json"), guid, "Assets/first.prefab");
        write_single(&dir.path().join("catalog_b.json"), guid, "Assets/second.prefab");
        fs::write(dir.path().join("catalog_c.json"), "not json").unwrap();

        let result = load_catalog_dir(dir.path(), &CatalogSettings::default());
        assert_eq!(result.skipped, 1);
        assert_eq!(result.loaded, 2);
        assert_eq!(
            result.cross_reference.location(&Guid::parse_hex(guid).unwrap()),
            Some("Assets/first.prefab")
        );
        assert_eq!(result.cross_reference.catalog_count(), 3);
    }
}
