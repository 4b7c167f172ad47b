//! Structural predicates over script-data trees
//!
//! A value is "reference-shaped" when it is a struct carrying a GUID string
//! field next to a sub-object-name field, whatever its declared type is called.
//! Field names are compared after [`normalize_field_name`].

use crate::assets::{ScriptObject, ScriptValue};
use crate::config::LeveldataSettings;

/// Lower-case, drop a leading `m_`, drop underscores
#[must_use]
pub fn normalize_field_name(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let stripped = lower.strip_prefix("m_").unwrap_or(&lower);
    stripped.replace('_', "")
}

/// Whether a script object's type name or origin path contains one of `keywords`
#[must_use]
pub fn is_leveldata_candidate(object: &ScriptObject, keywords: &[String]) -> bool {
    let type_name = object.type_name.to_lowercase();
    let origin = object.origin_path.as_deref().unwrap_or_default().to_lowercase();
    keywords.iter().any(|keyword| {
        let keyword = keyword.to_lowercase();
        !keyword.is_empty() && (type_name.contains(&keyword) || origin.contains(&keyword))
    })
}

/// Field-name based matcher configured from [`LeveldataSettings`]
#[derive(Debug, Clone)]
pub struct FieldMatcher {
    group_fields: Vec<String>,
    guid_field: String,
    sub_object_field: String,
}

impl FieldMatcher {
    #[must_use]
    pub fn new(settings: &LeveldataSettings) -> Self {
        Self {
            group_fields: settings
                .group_id_fields
                .iter()
                .map(|f| normalize_field_name(f))
                .collect(),
            guid_field: normalize_field_name(&settings.guid_field),
            sub_object_field: normalize_field_name(&settings.sub_object_field),
        }
    }

    /// Group id string of a group-list item
    #[must_use]
    pub fn group_id_of<'a>(&self, item: &'a ScriptValue) -> Option<&'a str> {
        item.as_struct()?.iter().find_map(|(name, value)| {
            if self.group_fields.contains(&normalize_field_name(name)) {
                value.as_str()
            } else {
                None
            }
        })
    }

    /// GUID string of a reference-shaped struct (not searched recursively)
    #[must_use]
    pub fn reference_guid<'a>(&self, value: &'a ScriptValue) -> Option<&'a str> {
        let fields = value.as_struct()?;
        let mut guid = None;
        let mut has_sub_object = false;
        for (name, value) in fields {
            let name = normalize_field_name(name);
            if name == self.guid_field {
                guid = value.as_str();
            } else if name == self.sub_object_field {
                has_sub_object = true;
            }
        }
        if has_sub_object { guid } else { None }
    }

    /// First reference-shaped value inside `item`, depth-first, `item` included
    #[must_use]
    pub fn find_reference<'a>(&self, item: &'a ScriptValue) -> Option<&'a str> {
        if let Some(guid) = self.reference_guid(item) {
            return Some(guid);
        }
        match item {
            ScriptValue::Struct(fields) => fields.values().find_map(|v| self.find_reference(v)),
            ScriptValue::Array(items) => items.iter().find_map(|v| self.find_reference(v)),
            _ => None,
        }
    }

    /// A non-empty list whose every element exposes a group id
    #[must_use]
    pub fn is_group_list(&self, items: &[ScriptValue]) -> bool {
        !items.is_empty() && items.iter().all(|item| self.group_id_of(item).is_some())
    }

    /// A list with at least one reference-bearing element
    #[must_use]
    pub fn is_reference_list(&self, items: &[ScriptValue]) -> bool {
        items.iter().any(|item| self.find_reference(item).is_some())
    }
}

/// Every array reachable from `root` through struct fields, depth-first, with
/// its dotted field path
///
/// A single-element array whose element is a struct is also descended into
/// (`levels[0].stageList`), so a level wrapped in a one-entry list is found.
/// Longer arrays are not, which keeps groups and references of different
/// entries from pairing up.
#[must_use]
pub fn collect_lists(root: &ScriptValue) -> Vec<(String, &[ScriptValue])> {
    fn walk<'a>(value: &'a ScriptValue, path: &str, out: &mut Vec<(String, &'a [ScriptValue])>) {
        let Some(fields) = value.as_struct() else {
            return;
        };
        for (name, child) in fields {
            let child_path = if path.is_empty() {
                name.clone()
            } else {
                format!("{path}.{name}")
            };
            match child {
                ScriptValue::Array(items) => {
                    out.push((child_path.clone(), items));
                    if let [only @ ScriptValue::Struct(_)] = items.as_slice() {
                        walk(only, &format!("{child_path}[0]"), out);
                    }
                }
                ScriptValue::Struct(_) => walk(child, &child_path, out),
                _ => {}
            }
        }
    }

    let mut lists = Vec::new();
    walk(root, "", &mut lists);
    lists
}
