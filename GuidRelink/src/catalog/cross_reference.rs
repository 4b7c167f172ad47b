//! GUID <-> location tables built from decoded catalogs

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::assets::{GroupId, normalize_path};
use crate::formats::catalog::DecodedCatalog;
use crate::guid::Guid;

/// Pull the asset path out of a catalog location
///
/// Handles `<hash>[<path>]` and bare `Assets/...` paths, which may sit behind
/// an id prefix such as `0#/`. `assets/` only counts at the start of the
/// location or right after a `/` or `#`, so URLs like `.../gameassets/x` and
/// opaque hashes yield `None`.
#[must_use]
pub fn extract_asset_path(location: &str) -> Option<&str> {
    let location = location.trim();

    if location.ends_with(']') {
        if let Some(open) = location.find('[') {
            let inner = location[open + 1..location.len() - 1].trim();
            return (!inner.is_empty()).then_some(inner);
        }
    }

    let lowered = location.to_ascii_lowercase();
    lowered
        .match_indices("assets/")
        .map(|(start, _)| start)
        .find(|&start| start == 0 || matches!(lowered.as_bytes()[start - 1], b'/' | b'#'))
        .map(|start| &location[start..])
}

/// Cross-reference tables over every GUID-keyed catalog bucket
#[derive(Debug, Clone, Default)]
pub struct CatalogCrossReference {
    guid_to_location: HashMap<Guid, String>,
    location_to_guid: HashMap<String, Guid>,
    /// Normalized extracted asset path -> GUID
    path_to_guid: HashMap<String, Guid>,
    /// Group id of the location's file name -> GUIDs, in first-seen order
    name_index: HashMap<GroupId, Vec<Guid>>,
    catalog_count: usize,
}

impl CatalogCrossReference {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build tables from a single catalog
    #[must_use]
    pub fn from_catalog(catalog: &DecodedCatalog) -> Self {
        let mut xref = Self::new();
        xref.add_catalog(catalog);
        xref
    }

    /// Add every GUID-keyed bucket of `catalog`; earlier writers win
    ///
    /// Returns the number of new GUIDs.
    pub fn add_catalog(&mut self, catalog: &DecodedCatalog) -> usize {
        let before = self.guid_to_location.len();
        self.catalog_count += 1;

        for bucket in &catalog.buckets {
            let Some(guid) = catalog.bucket_key(bucket).and_then(|key| key.as_guid()) else {
                continue;
            };
            for entry in catalog.bucket_entries(bucket) {
                self.insert(guid, &entry.internal_id);
            }
        }

        let added = self.guid_to_location.len() - before;
        tracing::debug!("{}: {added} GUID keys", catalog.source_name);
        added
    }

    /// Record one `guid -> location` pair
    pub fn insert(&mut self, guid: Guid, location: &str) {
        match self.guid_to_location.entry(guid) {
            Entry::Occupied(existing) => {
                if existing.get() != location {
                    tracing::trace!("GUID {guid} already maps to {}, ignoring {location}", existing.get());
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(location.to_string());
            }
        }

        self.location_to_guid
            .entry(location.to_string())
            .or_insert(guid);

        if let Some(path) = extract_asset_path(location) {
            self.path_to_guid.entry(normalize_path(path)).or_insert(guid);
            if let Some(name) = GroupId::from_name(path) {
                let guids = self.name_index.entry(name).or_default();
                if !guids.contains(&guid) {
                    guids.push(guid);
                }
            }
        }
    }

    /// Fold `other` into `self`; entries already present in `self` win
    pub fn merge(&mut self, other: &CatalogCrossReference) {
        for (&guid, location) in &other.guid_to_location {
            self.guid_to_location
                .entry(guid)
                .or_insert_with(|| location.clone());
        }
        for (location, &guid) in &other.location_to_guid {
            self.location_to_guid.entry(location.clone()).or_insert(guid);
        }
        for (path, &guid) in &other.path_to_guid {
            self.path_to_guid.entry(path.clone()).or_insert(guid);
        }
        for (name, guids) in &other.name_index {
            let merged = self.name_index.entry(name.clone()).or_default();
            for guid in guids {
                if !merged.contains(guid) {
                    merged.push(*guid);
                }
            }
        }
        self.catalog_count += other.catalog_count;
    }

    /// Resource location of a GUID
    #[must_use]
    pub fn location(&self, guid: &Guid) -> Option<&str> {
        self.guid_to_location.get(guid).map(String::as_str)
    }

    /// GUID first recorded for a resource location
    #[must_use]
    pub fn guid_for_location(&self, location: &str) -> Option<Guid> {
        self.location_to_guid.get(location).copied()
    }

    /// GUID of a normalized asset path (see [`normalize_path`])
    #[must_use]
    pub fn guid_for_path(&self, normalized_path: &str) -> Option<Guid> {
        self.path_to_guid.get(normalized_path).copied()
    }

    /// GUIDs whose location file name normalizes to `name`
    #[must_use]
    pub fn guids_for_name(&self, name: &GroupId) -> &[Guid] {
        self.name_index.get(name).map_or(&[], Vec::as_slice)
    }

    /// Number of GUIDs with a location
    #[must_use]
    pub fn len(&self) -> usize {
        self.guid_to_location.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guid_to_location.is_empty()
    }

    /// Number of distinct names in the name index
    #[must_use]
    pub fn name_count(&self) -> usize {
        self.name_index.len()
    }

    /// Number of catalogs folded into these tables
    #[must_use]
    pub fn catalog_count(&self) -> usize {
        self.catalog_count
    }

    /// All `(guid, location)` pairs sorted by GUID
    #[must_use]
    pub fn sorted_locations(&self) -> Vec<(Guid, &str)> {
        let mut pairs: Vec<_> = self
            .guid_to_location
            .iter()
            .map(|(guid, location)| (*guid, location.as_str()))
            .collect();
        pairs.sort_unstable_by_key(|(guid, _)| *guid);
        pairs
    }
}
