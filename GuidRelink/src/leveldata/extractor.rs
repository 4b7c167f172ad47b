//! Associations between referenced asset GUIDs and leveldata group ids

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::{Deserialize, Serialize};

use super::matcher::{FieldMatcher, collect_lists, is_leveldata_candidate};
use crate::assets::{GroupId, ScriptObject, ScriptValue};
use crate::config::LeveldataSettings;
use crate::guid::is_guid_hex;

/// One referenced GUID attributed to one group id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeveldataAssociation {
    /// Lower-case 32-character hex GUID
    pub referenced_guid: String,
    pub group_id: GroupId,
}

/// Number of reference items attributed to each group
///
/// `round(references / groups)`, or `default_ratio` when that rounds to zero.
/// `None` when there are no groups.
#[must_use]
pub fn reference_ratio(references: usize, groups: usize, default_ratio: usize) -> Option<usize> {
    if groups == 0 {
        return None;
    }
    let ratio = (references as f64 / groups as f64).round() as usize;
    Some(if ratio == 0 { default_ratio.max(1) } else { ratio })
}

/// Associations indexed by GUID and by group id
///
/// A GUID keeps its first association; a group id maps to the first
/// association recorded for it.
#[derive(Debug, Clone, Default)]
pub struct LeveldataIndex {
    associations: Vec<LeveldataAssociation>,
    by_guid: HashMap<String, usize>,
    by_group: HashMap<GroupId, usize>,
}

impl LeveldataIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an association unless its GUID is already associated
    pub fn insert(&mut self, association: LeveldataAssociation) -> bool {
        let slot = self.associations.len();
        match self.by_guid.entry(association.referenced_guid.clone()) {
            Entry::Occupied(_) => return false,
            Entry::Vacant(entry) => {
                entry.insert(slot);
            }
        }
        self.by_group
            .entry(association.group_id.clone())
            .or_insert(slot);
        self.associations.push(association);
        true
    }

    /// First association recorded for `group`
    #[must_use]
    pub fn for_group(&self, group: &GroupId) -> Option<&LeveldataAssociation> {
        self.by_group.get(group).map(|&i| &self.associations[i])
    }

    /// Association of a referenced GUID (case-insensitive)
    #[must_use]
    pub fn for_guid(&self, guid: &str) -> Option<&LeveldataAssociation> {
        self.by_guid
            .get(&guid.to_lowercase())
            .map(|&i| &self.associations[i])
    }

    /// All associations in insertion order
    #[must_use]
    pub fn associations(&self) -> &[LeveldataAssociation] {
        &self.associations
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.associations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.associations.is_empty()
    }
}

/// Whether the list at `path` was descended into, i.e. it only wraps other lists
fn is_wrapper(path: &str, lists: &[(String, &[ScriptValue])]) -> bool {
    let inner = format!("{path}[0].");
    lists.iter().any(|(other, _)| other.starts_with(&inner))
}

/// Extracts GUID/group associations from leveldata-like script objects
pub struct LeveldataExtractor<'a> {
    settings: &'a LeveldataSettings,
    matcher: FieldMatcher,
}

impl<'a> LeveldataExtractor<'a> {
    #[must_use]
    pub fn new(settings: &'a LeveldataSettings) -> Self {
        Self {
            settings,
            matcher: FieldMatcher::new(settings),
        }
    }

    /// Whether `object` passes the type-name/origin keyword heuristic
    #[must_use]
    pub fn is_candidate(&self, object: &ScriptObject) -> bool {
        is_leveldata_candidate(object, &self.settings.type_keywords)
    }

    /// Associations from one object, in reference order
    ///
    /// The group list is the first list whose items all carry a group id; the
    /// reference list is the first other list with reference-bearing items.
    /// The i-th reference-bearing item belongs to group `i / k` (see
    /// [`reference_ratio`]); items past the last group are dropped.
    #[must_use]
    pub fn extract_object(&self, object: &ScriptObject) -> Vec<LeveldataAssociation> {
        let lists = collect_lists(&object.data);

        let Some((group_index, (group_path, groups))) = lists
            .iter()
            .enumerate()
            .find(|(_, (_, items))| self.matcher.is_group_list(items))
        else {
            tracing::trace!("{}: no group list", object.identity);
            return Vec::new();
        };

        let Some((ref_path, references)) = lists
            .iter()
            .enumerate()
            .filter(|(i, (path, _))| *i != group_index && !is_wrapper(path, &lists))
            .map(|(_, list)| list)
            .find(|(_, items)| self.matcher.is_reference_list(items))
        else {
            tracing::trace!("{}: no reference list", object.identity);
            return Vec::new();
        };

        let group_ids: Vec<Option<GroupId>> = groups
            .iter()
            .map(|item| self.matcher.group_id_of(item).and_then(GroupId::from_name))
            .collect();
        let guids: Vec<&str> = references
            .iter()
            .filter_map(|item| self.matcher.find_reference(item))
            .collect();

        let Some(ratio) = reference_ratio(guids.len(), group_ids.len(), self.settings.default_ratio)
        else {
            return Vec::new();
        };

        tracing::debug!(
            "{}: {} groups in {group_path}, {} references in {ref_path}, ratio {ratio}",
            object.identity,
            group_ids.len(),
            guids.len()
        );

        let mut associations = Vec::new();
        for (ordinal, guid) in guids.into_iter().enumerate() {
            let Some(slot) = group_ids.get(ordinal / ratio) else {
                tracing::trace!("{}: reference {ordinal} past the last group", object.identity);
                continue;
            };
            let Some(group_id) = slot else {
                continue;
            };
            let guid = guid.trim();
            if !is_guid_hex(guid) {
                continue;
            }
            associations.push(LeveldataAssociation {
                referenced_guid: guid.to_lowercase(),
                group_id: group_id.clone(),
            });
        }
        associations
    }

    /// Scan every candidate object, in the given order
    pub fn extract_all<'b, I>(&self, objects: I) -> LeveldataIndex
    where
        I: IntoIterator<Item = &'b ScriptObject>,
    {
        let mut index = LeveldataIndex::new();
        let mut scanned = 0usize;

        for object in objects {
            if !self.is_candidate(object) {
                continue;
            }
            scanned += 1;
            for association in self.extract_object(object) {
                if !index.insert(association) {
                    tracing::trace!("{}: GUID already associated", object.identity);
                }
            }
        }

        tracing::info!(
            "Extracted {} leveldata associations from {scanned} objects",
            index.len()
        );
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetIdentity, ScriptValue};
    use crate::guid::Guid;
    use pretty_assertions::assert_eq;

    fn guid_hex(n: u8) -> String {
        format!("{:032x}", u128::from(n) + 0xabc0)
    }

    fn reference_item(guid: &str) -> ScriptValue {
        ScriptValue::structure([
            ("weight", ScriptValue::Int(1)),
            (
                "prefab",
                ScriptValue::structure([
                    ("m_AssetGUID", ScriptValue::string(guid)),
                    ("m_SubObjectName", ScriptValue::string("")),
                    ("m_SubObjectType", ScriptValue::string("")),
                ]),
            ),
        ])
    }

    fn level(groups: &[&str], references: Vec<ScriptValue>) -> ScriptObject {
        ScriptObject {
            identity: AssetIdentity::new(Guid::from_md5("level1"), 11),
            type_name: "LevelData".to_string(),
            origin_path: None,
            data: ScriptValue::structure([
                ("m_Name", ScriptValue::string("Level_01")),
                (
                    "stageList",
                    ScriptValue::Array(
                        groups
                            .iter()
                            .map(|g| ScriptValue::structure([("groupId", ScriptValue::string(*g))]))
                            .collect(),
                    ),
                ),
                ("spawnList", ScriptValue::Array(references)),
            ]),
        }
    }

    #[test]
    fn test_level_wrapped_in_single_entry_list() {
        let guids: Vec<_> = (0..4).map(guid_hex).collect();
        let inner = level(
            &["fisherman_0", "tent_0"],
            guids.iter().map(|g| reference_item(g)).collect(),
        );
        let object = ScriptObject {
            data: ScriptValue::structure([("levels", ScriptValue::Array(vec![inner.data.clone()]))]),
            ..inner
        };

        let settings = LeveldataSettings::default();
        let associations = LeveldataExtractor::new(&settings).extract_object(&object);
        let groups: Vec<_> = associations.iter().map(|a| a.group_id.as_str()).collect();
        assert_eq!(groups, vec!["fisherman_0", "fisherman_0", "tent_0", "tent_0"]);
        assert_eq!(associations[3].referenced_guid, guids[3]);
    }

    #[test]
    fn test_ratio() {
        assert_eq!(reference_ratio(6, 2, 3), Some(3));
        assert_eq!(reference_ratio(7, 2, 3), Some(4));
        assert_eq!(reference_ratio(1, 4, 3), Some(3));
        assert_eq!(reference_ratio(5, 0, 3), None);
    }

    #[test]
    fn test_groups_by_ratio() {
        let guids: Vec<_> = (0..6).map(guid_hex).collect();
        let object = level(
            &["fisherman_0", "tent_0"],
            guids.iter().map(|g| reference_item(g)).collect(),
        );
        let settings = LeveldataSettings::default();
        let associations = LeveldataExtractor::new(&settings).extract_object(&object);

        let pairs: Vec<_> = associations
            .iter()
            .map(|a| (a.referenced_guid.as_str(), a.group_id.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (guids[0].as_str(), "fisherman_0"),
                (guids[1].as_str(), "fisherman_0"),
                (guids[2].as_str(), "fisherman_0"),
                (guids[3].as_str(), "tent_0"),
                (guids[4].as_str(), "tent_0"),
                (guids[5].as_str(), "tent_0"),
            ]
        );
    }

    #[test]
    fn test_malformed_guid_keeps_ordinal() {
        let mut refs: Vec<_> = (0..4).map(|n| reference_item(&guid_hex(n))).collect();
        refs[1] = reference_item("");
        refs.push(ScriptValue::structure([("weight", ScriptValue::Int(0))]));
        let object = level(&["a", "b"], refs);
        let settings = LeveldataSettings::default();
        let associations = LeveldataExtractor::new(&settings).extract_object(&object);

        // the empty GUID still occupies slot 1; the non-reference item is not counted
        let groups: Vec<_> = associations.iter().map(|a| a.group_id.as_str()).collect();
        assert_eq!(groups, vec!["a", "b", "b"]);
        assert_eq!(associations[0].referenced_guid, guid_hex(0));
        assert_eq!(associations[1].referenced_guid, guid_hex(2));
    }

    #[test]
    fn test_overflow_references_are_dropped() {
        // 5 refs / 2 groups rounds to 3: refs 0..3 -> a, 3..5 -> b
        let refs: Vec<_> = (0..5).map(|n| reference_item(&guid_hex(n))).collect();
        let settings = LeveldataSettings::default();
        let a = LeveldataExtractor::new(&settings).extract_object(&level(&["a", "b"], refs));
        assert_eq!(a.len(), 5);

        // 1 ref / 4 groups rounds to 0: default ratio applies
        let refs = vec![reference_item(&guid_hex(9))];
        let b = LeveldataExtractor::new(&settings).extract_object(&level(&["a", "b", "c", "d"], refs));
        assert_eq!(b.len(), 1);
        assert_eq!(b[0].group_id.as_str(), "a");
    }

    #[test]
    fn test_non_candidates_are_skipped() {
        let mut object = level(&["a"], vec![reference_item(&guid_hex(1))]);
        object.type_name = "ShopInventory".to_string();
        let settings = LeveldataSettings::default();
        let index = LeveldataExtractor::new(&settings).extract_all([&object]);
        assert!(index.is_empty());
    }

    #[test]
    fn test_index_first_writer_wins() {
        let shared = guid_hex(1);
        let first = level(&["a"], vec![reference_item(&shared), reference_item(&guid_hex(2))]);
        let second = level(&["z"], vec![reference_item(&shared)]);
        let settings = LeveldataSettings::default();
        let index = LeveldataExtractor::new(&settings).extract_all([&first, &second]);

        assert_eq!(index.len(), 2);
        assert_eq!(index.for_guid(&shared.to_uppercase()).unwrap().group_id.as_str(), "a");
        let a = GroupId::from_name("a").unwrap();
        assert_eq!(index.for_group(&a).unwrap().referenced_guid, shared);
        assert!(index.for_group(&GroupId::from_name("z").unwrap()).is_none());
    }

    #[test]
    fn test_missing_lists() {
        let settings = LeveldataSettings::default();
        let extractor = LeveldataExtractor::new(&settings);
        let mut object = level(&[], vec![reference_item(&guid_hex(1))]);
        assert!(extractor.extract_object(&object).is_empty());

        object.data = ScriptValue::Null;
        assert!(extractor.extract_object(&object).is_empty());
    }
}
