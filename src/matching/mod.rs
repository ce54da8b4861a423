//! Vulnerability matching.
//!
//! Every dependency's digests are looked up in an injected
//! [`VulnerabilityLookup`]. Content digests are tried first because they
//! identify the exact bytes on disk; metadata digests come next and catch
//! libraries that were never materialized as files.
//!
//! # Example
//!
//! ```ignore
//! use sca_fingerprint::matching::{match_vulnerabilities, VulnerabilityTable};
//!
//! let table = VulnerabilityTable::load_dir(Path::new("cve"))?;
//! let cves = match_vulnerabilities(&mut enhanced, &table);
//! ```

mod remediation;
mod table;
mod traits;

use std::collections::BTreeSet;

use crate::model::{DependencyInfo, EnhancedResult, VulnerableLib};

pub use remediation::RemediationTable;
pub use table::VulnerabilityTable;
pub use traits::VulnerabilityLookup;

/// Tag the vulnerable dependencies of every result.
///
/// Previous matches are discarded. Returns the distinct CVEs found, sorted.
pub fn match_vulnerabilities<L>(results: &mut [EnhancedResult], lookup: &L) -> Vec<String>
where
    L: VulnerabilityLookup + ?Sized,
{
    let mut cves = BTreeSet::new();

    for result in results.iter_mut() {
        result.vulnerable.clear();
        for (id, info) in &result.deps {
            let hits = find_matches(info, lookup);
            let Some(first) = hits.first() else {
                continue;
            };
            tracing::debug!(
                id = %id,
                cve = %first.cve,
                cves = hits.len(),
                lookup = lookup.name(),
                "vulnerable dependency"
            );
            result.vulnerable.insert(id.clone(), first.clone());
            cves.extend(hits.into_iter().map(|hit| hit.cve));
        }

        if result.is_vulnerable() {
            tracing::info!(
                manifest = %result.operation.manifest_file,
                vulnerable = result.vulnerable.len(),
                "vulnerabilities matched"
            );
        }
    }

    cves.into_iter().collect()
}

/// Every record for the first digest that hits, trying content digests
/// before identity digests. The first record is kept for the dependency.
fn find_matches<L>(info: &DependencyInfo, lookup: &L) -> Vec<VulnerableLib>
where
    L: VulnerabilityLookup + ?Sized,
{
    info.content_digests()
        .chain(info.identity_digests())
        .map(|digest| lookup.lookup_all(digest))
        .find(|hits| !hits.is_empty())
        .unwrap_or_default()
}
