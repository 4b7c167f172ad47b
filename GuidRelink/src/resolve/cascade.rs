//! The three-tier GUID resolution cascade
//!
//! 1. **Leveldata**: the identity's group id was attributed a referenced GUID
//! 2. **Catalog**: the original path (or a close variant, or the group id)
//!    names a catalog location
//! 3. **Hash**: MD5 of the normalized path, else of `class/name`, else of
//!    `package:localId`
//!
//! Tiers 1 and 2 are pure lookups over the [`ResolutionContext`]; tier 3 is
//! always computable, so every identity resolves.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::context::ResolutionContext;
use super::report::{MappingRecord, MappingReport};
use crate::assets::{AssetIdentity, AssetRecord, GroupId, normalize_path};
use crate::catalog::extract_asset_path;
use crate::guid::Guid;

/// Which tier produced a GUID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GuidOrigin {
    LeveldataDerived,
    CatalogDerived,
    PathHashDerived,
    CollectionHashDerived,
}

impl GuidOrigin {
    pub const ALL: [GuidOrigin; 4] = [
        Self::LeveldataDerived,
        Self::CatalogDerived,
        Self::PathHashDerived,
        Self::CollectionHashDerived,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LeveldataDerived => "LeveldataDerived",
            Self::CatalogDerived => "CatalogDerived",
            Self::PathHashDerived => "PathHashDerived",
            Self::CollectionHashDerived => "CollectionHashDerived",
        }
    }
}

impl fmt::Display for GuidOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The GUID assigned to one identity for export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedGuid {
    pub guid: Guid,
    pub origin: GuidOrigin,
}

impl ResolvedGuid {
    #[must_use]
    pub const fn new(guid: Guid, origin: GuidOrigin) -> Self {
        Self { guid, origin }
    }
}

/// GUID derived from a resource path (hash tier)
#[must_use]
pub fn path_hash_guid(path: &str) -> Guid {
    Guid::from_md5(&normalize_path(path))
}

/// Resolve without consulting any cache
#[must_use]
pub fn resolve_uncached(context: &ResolutionContext, identity: &AssetIdentity) -> ResolvedGuid {
    let record = context.index().get(identity);

    let resolved = leveldata_tier(context, identity)
        .or_else(|| record.and_then(|r| catalog_tier(context, r)))
        .unwrap_or_else(|| hash_tier(identity, record));

    tracing::trace!("{identity} -> {} ({})", resolved.guid, resolved.origin);
    resolved
}

fn leveldata_tier(context: &ResolutionContext, identity: &AssetIdentity) -> Option<ResolvedGuid> {
    let index = context.index();
    if !index.is_preferred(identity) {
        return None;
    }
    let group = index.group_of(identity)?;
    let association = context.leveldata().for_group(group)?;

    match Guid::parse_hex(&association.referenced_guid) {
        Ok(guid) => Some(ResolvedGuid::new(guid, GuidOrigin::LeveldataDerived)),
        Err(e) => {
            tracing::debug!("{identity}: leveldata GUID unusable: {e}");
            None
        }
    }
}

fn catalog_tier(context: &ResolutionContext, record: &AssetRecord) -> Option<ResolvedGuid> {
    let catalogs = context.catalogs();
    let found = |guid: Guid| ResolvedGuid::new(guid, GuidOrigin::CatalogDerived);

    if let Some(path) = record.normalized_path() {
        if let Some(guid) = catalogs.guid_for_path(&path) {
            return Some(found(guid));
        }
        for (from, to) in &context.config().resolve.extension_substitutions {
            let Some(stem) = path.strip_suffix(&format!(".{}", from.to_lowercase())) else {
                continue;
            };
            if let Some(guid) = catalogs.guid_for_path(&format!("{stem}.{}", to.to_lowercase())) {
                return Some(found(guid));
            }
        }
    }

    let index = context.index();
    if !index.is_preferred(&record.identity) {
        return None;
    }
    let group = index.group_of(&record.identity)?;
    best_name_match(context, record, group).map(found)
}

/// Path split on `/`, with the file name reduced to its group id
fn path_segments(path: &str) -> Vec<String> {
    let normalized = normalize_path(path);
    let mut segments: Vec<String> = normalized
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if let Some(last) = segments.last_mut() {
        if let Some(stem) = GroupId::from_name(last) {
            *last = stem.as_str().to_string();
        }
    }
    segments
}

/// Number of equal segments counted from the file-name end inward
fn suffix_score(a: &[String], b: &[String]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

fn best_name_match(context: &ResolutionContext, record: &AssetRecord, group: &GroupId) -> Option<Guid> {
    let catalogs = context.catalogs();
    let candidates = catalogs.guids_for_name(group);
    match candidates {
        [] => return None,
        [only] => return Some(*only),
        _ => {}
    }

    let wanted = path_segments(
        record
            .original_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(&record.original_name),
    );

    let mut best: Option<(Guid, usize)> = None;
    let mut tied = false;
    for &guid in candidates {
        let score = catalogs
            .location(&guid)
            .and_then(extract_asset_path)
            .map_or(0, |path| suffix_score(&wanted, &path_segments(path)));
        match best {
            Some((_, top)) if score < top => {}
            Some((_, top)) if score == top => tied = true,
            _ => {
                best = Some((guid, score));
                tied = false;
            }
        }
    }

    if tied {
        tracing::debug!(
            "{}: {} catalog candidates for {group} share the best score, using the first",
            record.identity,
            candidates.len()
        );
    }
    best.map(|(guid, _)| guid)
}

fn hash_tier(identity: &AssetIdentity, record: Option<&AssetRecord>) -> ResolvedGuid {
    if let Some(path) = record.and_then(AssetRecord::normalized_path) {
        return ResolvedGuid::new(Guid::from_md5(&path), GuidOrigin::PathHashDerived);
    }

    let input = match record {
        Some(r) if !r.original_name.trim().is_empty() => {
            normalize_path(&format!("{}/{}", r.class_name, r.original_name))
        }
        _ => format!("{}:{}", identity.package_guid.to_hex(), identity.local_id),
    };
    ResolvedGuid::new(Guid::from_md5(&input), GuidOrigin::CollectionHashDerived)
}

/// Memoizing resolver shared by export workers
///
/// The first resolution of an identity is cached and every later call returns
/// it unchanged. Safe to call from many threads at once.
pub struct GuidResolver {
    context: Arc<ResolutionContext>,
    cache: DashMap<AssetIdentity, ResolvedGuid>,
}

impl GuidResolver {
    #[must_use]
    pub fn new(context: Arc<ResolutionContext>) -> Self {
        Self {
            context,
            cache: DashMap::new(),
        }
    }

    #[must_use]
    pub fn context(&self) -> &ResolutionContext {
        &self.context
    }

    /// Resolve one identity, recording it on first use
    pub fn resolve(&self, identity: &AssetIdentity) -> ResolvedGuid {
        if let Some(hit) = self.cache.get(identity) {
            return *hit;
        }
        let computed = resolve_uncached(&self.context, identity);
        *self.cache.entry(*identity).or_insert(computed)
    }

    /// Resolve many identities in parallel, keeping their order
    pub fn resolve_all(&self, identities: &[AssetIdentity]) -> Vec<(AssetIdentity, ResolvedGuid)> {
        identities
            .par_iter()
            .map(|identity| (*identity, self.resolve(identity)))
            .collect()
    }

    /// Cached value, without resolving
    #[must_use]
    pub fn cached(&self, identity: &AssetIdentity) -> Option<ResolvedGuid> {
        self.cache.get(identity).map(|hit| *hit)
    }

    /// Number of identities resolved so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Every resolution so far, sorted by identity
    #[must_use]
    pub fn records(&self) -> Vec<MappingRecord> {
        let mut records: Vec<_> = self
            .cache
            .iter()
            .map(|entry| MappingRecord::new(*entry.key(), *entry.value()))
            .collect();
        records.sort_by_key(|r| r.identity);
        records
    }

    /// Diagnostic report over every resolution so far
    #[must_use]
    pub fn report(&self) -> MappingReport {
        MappingReport::from_records(self.records())
    }
}
