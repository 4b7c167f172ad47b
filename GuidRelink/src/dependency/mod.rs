//! Cross-package dependency resolution
//!
//! Older packages reference their dependencies by name, newer ones by GUID.
//! Names are tried first so existing name-based lookups keep working; GUIDs
//! are matched against each package's own GUID or the one carried by its file
//! name. Unresolved references go to a [`DependencyReporter`] and resolve to
//! `None`.

mod resolver;

pub use resolver::{
    CollectingReporter, DependencyReporter, DependencyResolver, TracingReporter, derive_package_guid,
};
