use std::collections::HashMap;
use std::path::Path;

use super::VulnerabilityLookup;
use crate::error::{ErrorContext, FingerprintError, Result};
use crate::model::VulnerableLib;

/// In-memory digest index over known-vulnerable library records.
///
/// Records are grouped per CVE the way vulnerability feeds ship them: one
/// JSON array of records per CVE. Digests are matched case-insensitively.
/// A digest listed under several CVEs keeps one record per CVE, in insertion
/// order.
#[derive(Debug, Clone, Default)]
pub struct VulnerabilityTable {
    by_digest: HashMap<String, Vec<VulnerableLib>>,
}

impl VulnerabilityTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `records` under `cve`. Returns how many were added.
    pub fn insert_cve(
        &mut self,
        cve: &str,
        records: impl IntoIterator<Item = VulnerableLib>,
    ) -> usize {
        let mut added = 0;
        for mut record in records {
            if record.sha1.is_empty() {
                tracing::debug!(cve, artifact = %record.artifact, "record without digest ignored");
                continue;
            }
            record.cve = cve.to_string();
            let digest = record.sha1.to_ascii_lowercase();
            let entries = self.by_digest.entry(digest).or_default();
            if entries.iter().any(|existing| existing.cve == cve) {
                tracing::debug!(cve, digest = %record.sha1, "digest already indexed for cve");
                continue;
            }
            entries.push(record);
            added += 1;
        }
        added
    }

    /// Index a JSON array of records under `cve`.
    pub fn insert_cve_json(&mut self, cve: &str, json: &str) -> Result<usize> {
        let records: Vec<VulnerableLib> =
            serde_json::from_str(json).with_context(|| format!("records for {cve}"))?;
        Ok(self.insert_cve(cve, records))
    }

    /// Build a table from a single CVE's JSON records.
    pub fn from_cve_json(cve: &str, json: &str) -> Result<Self> {
        let mut table = Self::new();
        table.insert_cve_json(cve, json)?;
        Ok(table)
    }

    /// Load every `<CVE>.json` file in `dir`, in file name order.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut paths = std::fs::read_dir(dir)
            .map_err(|e| FingerprintError::io(dir, e))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect::<Vec<_>>();
        paths.sort();

        let mut table = Self::new();
        for path in paths {
            let Some(cve) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let json = std::fs::read_to_string(&path).map_err(|e| FingerprintError::io(&path, e))?;
            let added = table.insert_cve_json(cve, &json)?;
            tracing::debug!(cve, added, "loaded vulnerability records");
        }
        Ok(table)
    }

    /// Number of indexed records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_digest.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_digest.is_empty()
    }

    /// Distinct CVEs in the table, sorted.
    #[must_use]
    pub fn cves(&self) -> Vec<&str> {
        let mut cves: Vec<_> = self
            .by_digest
            .values()
            .flatten()
            .map(|r| r.cve.as_str())
            .collect();
        cves.sort_unstable();
        cves.dedup();
        cves
    }

    fn records(&self, digest: &str) -> &[VulnerableLib] {
        let found = if digest.bytes().any(|b| b.is_ascii_uppercase()) {
            self.by_digest.get(&digest.to_ascii_lowercase())
        } else {
            self.by_digest.get(digest)
        };
        found.map(Vec::as_slice).unwrap_or_default()
    }
}

impl VulnerabilityLookup for VulnerabilityTable {
    fn lookup(&self, digest: &str) -> Option<VulnerableLib> {
        self.records(digest).first().cloned()
    }

    fn lookup_all(&self, digest: &str) -> Vec<VulnerableLib> {
        self.records(digest).to_vec()
    }

    fn name(&self) -> &'static str {
        "table"
    }
}
