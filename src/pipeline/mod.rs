//! Scan orchestration.
//!
//! Ties the stages together: enhance every operation result, match the
//! digests against the injected lookup, then collect remediation steps.

mod report;

pub use report::ScanReport;

use std::time::Instant;

use crate::config::EngineConfig;
use crate::enhance::Supplementer;
use crate::error::Result;
use crate::matching::{RemediationTable, VulnerabilityLookup, match_vulnerabilities};
use crate::model::OperationResult;

/// Enhance, match and remediate a batch of operation results.
pub struct ScanPipeline {
    config: EngineConfig,
    supplementer: Supplementer,
    lookup: Box<dyn VulnerabilityLookup>,
    remediation: RemediationTable,
}

impl ScanPipeline {
    /// Build a pipeline over a validated configuration.
    pub fn new(config: EngineConfig, lookup: impl VulnerabilityLookup + 'static) -> Result<Self> {
        let config = config.validated()?;
        let supplementer = Supplementer::new(&config)?;
        let remediation = RemediationTable::from_config(&config.remediation);
        Ok(Self {
            config,
            supplementer,
            lookup: Box::new(lookup),
            remediation,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Access the enhancer registry, e.g. to register a custom enhancer.
    pub fn supplementer_mut(&mut self) -> &mut Supplementer {
        &mut self.supplementer
    }

    /// Run every stage over `results`.
    pub fn run(&self, results: Vec<OperationResult>) -> ScanReport {
        let start = Instant::now();
        let submitted = results.len();

        let mut enhanced = self.supplementer.supplement(results);
        let cves = match_vulnerabilities(&mut enhanced, self.lookup.as_ref());
        let remediation = self.remediation.remediation_steps(&enhanced);

        tracing::info!(
            submitted,
            enhanced = enhanced.len(),
            cves = cves.len(),
            lookup = self.lookup.name(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "scan finished"
        );

        ScanReport {
            results: enhanced,
            cves,
            remediation,
        }
    }
}

impl std::fmt::Debug for ScanPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanPipeline")
            .field("config", &self.config)
            .field("supplementer", &self.supplementer)
            .field("lookup", &self.lookup.name())
            .finish_non_exhaustive()
    }
}
