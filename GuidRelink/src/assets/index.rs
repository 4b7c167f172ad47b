//! Identity and group-id indexes over the asset graph

use std::collections::HashMap;

use super::types::{AssetIdentity, AssetRecord, GroupId};
use crate::config::ResolveSettings;

/// Indexes built once per processing pass
#[derive(Debug, Clone, Default)]
pub struct AssetIndex {
    records: HashMap<AssetIdentity, AssetRecord>,
    by_group: HashMap<GroupId, Vec<AssetIdentity>>,
    group_of: HashMap<AssetIdentity, GroupId>,
    preferred: HashMap<GroupId, AssetIdentity>,
}

impl AssetIndex {
    /// Index every record once
    ///
    /// A repeated identity keeps its first record. The preferred owner of each
    /// group id is its first prefab-like record, else its first record.
    pub fn build<'a, I>(records: I, settings: &ResolveSettings) -> Self
    where
        I: IntoIterator<Item = &'a AssetRecord>,
    {
        let mut index = Self::default();
        let mut duplicates = 0usize;

        for record in records {
            if index.records.contains_key(&record.identity) {
                duplicates += 1;
                tracing::debug!("Duplicate asset identity {}, keeping first record", record.identity);
                continue;
            }

            if let Some(group) = record.group_id() {
                index
                    .by_group
                    .entry(group.clone())
                    .or_default()
                    .push(record.identity);
                index.group_of.insert(record.identity, group);
            }
            index.records.insert(record.identity, record.clone());
        }

        for (group, members) in &index.by_group {
            let owner = members
                .iter()
                .find(|id| {
                    index.records[*id]
                        .is_prefab_like(&settings.prefab_class_names, &settings.prefab_extension)
                })
                .or_else(|| members.first());
            if let Some(&owner) = owner {
                index.preferred.insert(group.clone(), owner);
            }
        }

        tracing::info!(
            "Indexed {} assets into {} group ids ({} duplicate identities skipped)",
            index.records.len(),
            index.by_group.len(),
            duplicates
        );
        index
    }

    #[must_use]
    pub fn get(&self, identity: &AssetIdentity) -> Option<&AssetRecord> {
        self.records.get(identity)
    }

    /// Group id of an indexed identity
    #[must_use]
    pub fn group_of(&self, identity: &AssetIdentity) -> Option<&GroupId> {
        self.group_of.get(identity)
    }

    /// Identities sharing a group id, in indexing order
    #[must_use]
    pub fn group(&self, group: &GroupId) -> &[AssetIdentity] {
        self.by_group.get(group).map_or(&[], Vec::as_slice)
    }

    /// The identity that owns fuzzy matches on `group`
    #[must_use]
    pub fn preferred(&self, group: &GroupId) -> Option<AssetIdentity> {
        self.preferred.get(group).copied()
    }

    /// Whether `identity` is the preferred owner of its group id
    #[must_use]
    pub fn is_preferred(&self, identity: &AssetIdentity) -> bool {
        self.group_of(identity)
            .and_then(|group| self.preferred(group))
            .is_some_and(|owner| owner == *identity)
    }

    /// All identities, sorted
    #[must_use]
    pub fn identities(&self) -> Vec<AssetIdentity> {
        let mut ids: Vec<_> = self.records.keys().copied().collect();
        ids.sort();
        ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn group_count(&self) -> usize {
        self.by_group.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guid::Guid;

    fn record(local_id: i64, name: &str, path: Option<&str>, class: &str) -> AssetRecord {
        AssetRecord {
            identity: AssetIdentity::new(Guid::from_md5("package"), local_id),
            original_name: name.to_string(),
            original_path: path.map(ToString::to_string),
            class_name: class.to_string(),
            package_name: "package".to_string(),
        }
    }

    #[test]
    fn test_groups_and_preference() {
        let records = vec![
            record(1, "Tent_0", None, "Texture2D"),
            record(2, "Tent_0", None, "Mesh"),
            record(3, "Tent_0", None, "GameObject"),
            record(4, "Fisherman_0", Some("Assets/Fisherman_0.mat"), "Material"),
        ];
        let index = AssetIndex::build(&records, &ResolveSettings::default());

        let tent = GroupId::from_name("tent_0").unwrap();
        assert_eq!(index.group(&tent).len(), 3);
        assert_eq!(index.preferred(&tent), Some(records[2].identity));
        assert!(index.is_preferred(&records[2].identity));
        assert!(!index.is_preferred(&records[0].identity));

        // no prefab-like record: first one wins
        let fisherman = GroupId::from_name("fisherman_0").unwrap();
        assert_eq!(index.preferred(&fisherman), Some(records[3].identity));
    }

    #[test]
    fn test_duplicate_identity_keeps_first() {
        let records = vec![record(1, "First", None, "Mesh"), record(1, "Second", None, "Mesh")];
        let index = AssetIndex::build(&records, &ResolveSettings::default());
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(&records[0].identity).unwrap().original_name, "First");
        assert!(index.group(&GroupId::from_name("second").unwrap()).is_empty());
    }

    #[test]
    fn test_reindexing_is_idempotent() {
        let records = vec![
            record(5, "b", None, "Mesh"),
            record(2, "a", Some("Assets/A.prefab"), "GameObject"),
            record(9, "a", None, "Mesh"),
        ];
        let settings = ResolveSettings::default();
        let first = AssetIndex::build(&records, &settings);
        let second = AssetIndex::build(&records, &settings);

        assert_eq!(first.identities(), second.identities());
        for id in first.identities() {
            assert_eq!(first.group_of(&id), second.group_of(&id));
            assert_eq!(first.is_preferred(&id), second.is_preferred(&id));
        }
    }
}
