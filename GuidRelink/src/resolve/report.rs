//! Diagnostic mapping report

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::cascade::{GuidOrigin, ResolvedGuid};
use crate::assets::AssetIdentity;
use crate::error::Result;
use crate::guid::Guid;

/// One resolved identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRecord {
    pub identity: AssetIdentity,
    pub resolved_guid: Guid,
    pub origin: GuidOrigin,
}

impl MappingRecord {
    #[must_use]
    pub fn new(identity: AssetIdentity, resolved: ResolvedGuid) -> Self {
        Self {
            identity,
            resolved_guid: resolved.guid,
            origin: resolved.origin,
        }
    }
}

/// Records of one export run, with a summary header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingReport {
    /// RFC 3339 timestamp
    pub generated_at: String,
    pub version: String,
    /// Number of records per origin; every origin is listed
    pub counts: BTreeMap<GuidOrigin, usize>,
    pub records: Vec<MappingRecord>,
}

impl MappingReport {
    /// Build a report, sorting records by identity
    #[must_use]
    pub fn from_records(mut records: Vec<MappingRecord>) -> Self {
        records.sort_by_key(|r| r.identity);

        let mut counts: BTreeMap<GuidOrigin, usize> =
            GuidOrigin::ALL.iter().map(|&origin| (origin, 0)).collect();
        for record in &records {
            *counts.entry(record.origin).or_default() += 1;
        }

        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            version: crate::VERSION.to_string(),
            counts,
            records,
        }
    }

    #[must_use]
    pub fn count(&self, origin: GuidOrigin) -> usize {
        self.counts.get(&origin).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Write a report as pretty-printed JSON
pub fn write_report<P: AsRef<Path>>(path: P, report: &MappingReport) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    tracing::info!("Wrote {} mapping records to {}", report.len(), path.display());
    Ok(())
}

/// Read a report written by [`write_report`]
pub fn read_report<P: AsRef<Path>>(path: P) -> Result<MappingReport> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
