//! Trait definitions for vulnerability lookup.
//!
//! The engine never owns a vulnerability database. Callers inject anything
//! that can answer "is this digest known to be vulnerable", which keeps the
//! matching stage testable with a closure.

use crate::model::VulnerableLib;

/// Resolves a digest to a known-vulnerable library record.
pub trait VulnerabilityLookup: Send + Sync {
    /// The record for `digest` (lowercase hex), if any.
    fn lookup(&self, digest: &str) -> Option<VulnerableLib>;

    /// Every record for `digest`, one per CVE that lists it.
    fn lookup_all(&self, digest: &str) -> Vec<VulnerableLib> {
        self.lookup(digest).into_iter().collect()
    }

    /// Human-readable name for logs.
    fn name(&self) -> &'static str {
        "lookup"
    }
}

impl<F> VulnerabilityLookup for F
where
    F: Fn(&str) -> Option<VulnerableLib> + Send + Sync,
{
    fn lookup(&self, digest: &str) -> Option<VulnerableLib> {
        self(digest)
    }

    fn name(&self) -> &'static str {
        "closure"
    }
}
