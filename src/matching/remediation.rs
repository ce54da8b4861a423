use std::collections::{BTreeSet, HashMap};

use crate::config::RemediationConfig;
use crate::model::EnhancedResult;

/// Built-in fixes: group, artifact, suggestion.
const DEFAULT_FIXES: &[(&str, &str, &str)] = &[
    (
        "org.apache.logging.log4j",
        "log4j-core",
        "Upgrade to version org.apache.logging.log4j:log4j-core:2.17.0",
    ),
    (
        "org.ops4j.pax.logging",
        "pax-logging-log4j2",
        "Upgrade to version org.ops4j.pax.logging:pax-logging-log4j2:2.0.12",
    ),
];

/// Fix suggestions keyed by group and artifact of the vulnerable record.
#[derive(Debug, Clone)]
pub struct RemediationTable {
    fixes: HashMap<String, HashMap<String, String>>,
}

impl Default for RemediationTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for &(group_id, artifact, fix) in DEFAULT_FIXES {
            table.insert(group_id, artifact, fix);
        }
        table
    }
}

impl RemediationTable {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            fixes: HashMap::new(),
        }
    }

    /// Built-in fixes (unless disabled) overlaid with configured entries.
    #[must_use]
    pub fn from_config(config: &RemediationConfig) -> Self {
        let mut table = if config.include_defaults {
            Self::default()
        } else {
            Self::empty()
        };
        for entry in &config.entries {
            table.insert(&entry.group_id, &entry.artifact, &entry.fix);
        }
        table
    }

    /// Add or replace a fix.
    pub fn insert(
        &mut self,
        group_id: impl Into<String>,
        artifact: impl Into<String>,
        fix: impl Into<String>,
    ) {
        self.fixes
            .entry(group_id.into())
            .or_default()
            .insert(artifact.into(), fix.into());
    }

    #[must_use]
    pub fn fix_for(&self, group_id: &str, artifact: &str) -> Option<&str> {
        self.fixes
            .get(group_id)
            .and_then(|artifacts| artifacts.get(artifact))
            .map(String::as_str)
    }

    /// Distinct fixes for every matched library, sorted.
    #[must_use]
    pub fn remediation_steps(&self, results: &[EnhancedResult]) -> Vec<String> {
        results
            .iter()
            .flat_map(|result| result.vulnerable.values())
            .filter_map(|lib| self.fix_for(&lib.group_id, &lib.artifact))
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
