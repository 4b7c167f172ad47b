//! Leveldata reference extraction
//!
//! Level-like script objects list their groups (stages, spawn points, ...) in
//! one list and the asset references those groups use in a parallel list.
//! The lists are found by shape: a group list's items carry a group/stage id
//! string, a reference list's items carry an asset reference struct (a GUID
//! field beside a sub-object-name field). Reference `i` belongs to group
//! `i / k`, where `k` is the rounded reference-to-group ratio.
//!
//! ```
//! use guidrelink::config::LeveldataSettings;
//! use guidrelink::leveldata::reference_ratio;
//!
//! let settings = LeveldataSettings::default();
//! assert_eq!(reference_ratio(6, 2, settings.default_ratio), Some(3));
//! ```

mod extractor;
mod matcher;

pub use extractor::{LeveldataAssociation, LeveldataExtractor, LeveldataIndex, reference_ratio};
pub use matcher::{FieldMatcher, collect_lists, is_leveldata_candidate, normalize_field_name};
