//! Name-first, GUID-fallback package lookup

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use crate::assets::{ExternalReference, LoadedPackage};
use crate::error::Error;
use crate::guid::{GUID_HEX_LEN, Guid};

/// Package GUID carried by a file name such as `CAB-<32 hex>` or `<32 hex>.bundle`
///
/// The GUID must be the trailing 32 characters of the file stem.
#[must_use]
pub fn derive_package_guid(file_name: &str) -> Option<Guid> {
    let file_name = Path::new(file_name.trim()).file_name()?.to_str()?;
    let stem = match file_name.rfind('.') {
        Some(dot) if dot > 0 => &file_name[..dot],
        _ => file_name,
    };
    if stem.len() < GUID_HEX_LEN || !stem.is_char_boundary(stem.len() - GUID_HEX_LEN) {
        return None;
    }
    Guid::parse_hex(&stem[stem.len() - GUID_HEX_LEN..]).ok()
}

/// Collaborator told about references that resolve to nothing
pub trait DependencyReporter {
    fn missing_dependency(&self, reference: &ExternalReference, error: &Error);
}

/// Logs missing dependencies at warn level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl DependencyReporter for TracingReporter {
    fn missing_dependency(&self, _reference: &ExternalReference, error: &Error) {
        tracing::warn!("{error}");
    }
}

/// Keeps every missing reference for later inspection
#[derive(Debug, Default)]
pub struct CollectingReporter {
    missing: Mutex<Vec<ExternalReference>>,
}

impl CollectingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Missing references in report order
    #[must_use]
    pub fn missing(&self) -> Vec<ExternalReference> {
        self.missing
            .lock()
            .map(|missing| missing.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.missing.lock().map(|m| m.is_empty()).unwrap_or(true)
    }
}

impl DependencyReporter for CollectingReporter {
    fn missing_dependency(&self, reference: &ExternalReference, error: &Error) {
        tracing::debug!("{error}");
        if let Ok(mut missing) = self.missing.lock() {
            missing.push(reference.clone());
        }
    }
}

/// Resolves external references against the packages loaded in one session
pub struct DependencyResolver<'a, R: DependencyReporter> {
    packages: &'a [LoadedPackage],
    by_name: HashMap<&'a str, usize>,
    by_guid: HashMap<Guid, usize>,
    reporter: R,
}

impl<'a, R: DependencyReporter> DependencyResolver<'a, R> {
    /// Index `packages`; on duplicate names or GUIDs the first package wins
    pub fn new(packages: &'a [LoadedPackage], reporter: R) -> Self {
        let mut by_name = HashMap::new();
        let mut by_guid = HashMap::new();

        for (i, package) in packages.iter().enumerate() {
            by_name.entry(package.name.as_str()).or_insert(i);
            if let Some(guid) = package.guid.or_else(|| derive_package_guid(&package.file_name)) {
                by_guid.entry(guid).or_insert(i);
            }
        }

        tracing::debug!(
            "Indexed {} packages ({} with a GUID)",
            packages.len(),
            by_guid.len()
        );

        Self {
            packages,
            by_name,
            by_guid,
            reporter,
        }
    }

    /// Find the package a reference points at
    ///
    /// The name is tried first; a GUID, when present, is the fallback. A
    /// reference matching nothing is reported and resolves to `None`.
    pub fn resolve(&self, reference: &ExternalReference) -> Option<&'a LoadedPackage> {
        let by_name = reference
            .name
            .as_deref()
            .and_then(|name| self.by_name.get(name));
        let by_guid = || reference.guid.and_then(|guid| self.by_guid.get(&guid));

        if let Some(&i) = by_name.or_else(by_guid) {
            return Some(&self.packages[i]);
        }

        let error = Error::MissingDependency {
            reference: reference.to_string(),
        };
        self.reporter.missing_dependency(reference, &error);
        None
    }

    /// Resolve every reference, keeping `None` slots for missing ones
    pub fn resolve_all(&self, references: &[ExternalReference]) -> Vec<Option<&'a LoadedPackage>> {
        references.iter().map(|r| self.resolve(r)).collect()
    }

    #[must_use]
    pub fn reporter(&self) -> &R {
        &self.reporter
    }
}
