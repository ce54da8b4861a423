use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::model::{EnhancedResult, LibType};

/// Outcome of one [`super::ScanPipeline::run`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub results: Vec<EnhancedResult>,
    /// Distinct CVEs matched, sorted
    pub cves: Vec<String>,
    /// Distinct fix suggestions, sorted
    pub remediation: Vec<String>,
}

impl ScanReport {
    #[must_use]
    pub fn is_vulnerable(&self) -> bool {
        self.results.iter().any(EnhancedResult::is_vulnerable)
    }

    /// One-line verdict naming the matched CVEs.
    #[must_use]
    pub fn headline(&self) -> String {
        if self.cves.is_empty() {
            "No vulnerabilities were detected".to_string()
        } else {
            format!("Vulnerable to {}", self.cves.join("/"))
        }
    }

    /// Human-readable summary of what was found and how to fix it.
    pub fn write_summary<W: Write>(&self, w: &mut W) -> io::Result<()> {
        if !self.is_vulnerable() {
            return writeln!(w, "No vulnerabilities were detected");
        }

        writeln!(w, "{}", self.headline())?;
        writeln!(w)?;

        let (files, manifests): (Vec<_>, Vec<_>) = self
            .results
            .iter()
            .filter(|result| result.is_vulnerable())
            .partition(|result| result.operation.lib_type == LibType::Fs);

        for result in manifests {
            writeln!(w, "Manifest: {}", result.operation.manifest_file)?;
            writeln!(w, "Vulnerable Paths:")?;
            result.write_vulnerable_paths(w)?;
            writeln!(w)?;
        }

        if !files.is_empty() {
            writeln!(w, "Vulnerable Files: ")?;
            for result in files {
                for id in result.vulnerable.keys() {
                    let path = result
                        .deps
                        .get(id)
                        .map(|info| info.system_path.as_str())
                        .filter(|path| !path.is_empty())
                        .unwrap_or(id.as_str());
                    writeln!(w, "\t{path} Vulnerable")?;
                }
            }
        }

        if !self.remediation.is_empty() {
            writeln!(w, "\nRemediation Steps:")?;
            for step in &self.remediation {
                writeln!(w, "\t* {step}")?;
            }
        }
        Ok(())
    }
}
