use super::common::{call_site_findings, read_lossy, scan_regex};
use super::LanguageScanner;
use crate::ast::{self, languages::RUST};
use crate::errors::Result;
use crate::model::{RawFinding, RuleSet, ScanOptions};
use std::path::{Path, PathBuf};

pub struct RustScanner {
    rule_set: RuleSet,
}

impl RustScanner {
    pub fn new(rule_set: RuleSet) -> Self {
        Self { rule_set }
    }
}

impl LanguageScanner for RustScanner {
    fn language(&self) -> &'static str {
        "rust"
    }

    fn supports(&self, path: &Path, _options: &ScanOptions) -> bool {
        path.extension().and_then(|e| e.to_str()) == Some("rs")
    }

    fn scan(&self, files: &[PathBuf]) -> Result<Vec<RawFinding>> {
        let mut findings = Vec::new();
        for path in files {
            let Some(text) = read_lossy(path) else {
                continue;
            };
            match ast::extract_call_sites(&text, &RUST) {
                Ok(call_sites) => {
                    let file = path.display().to_string();
                    for call_site in &call_sites {
                        findings.extend(call_site_findings(call_site, &self.rule_set, &file));
                    }
                }
                Err(_) => findings.extend(scan_regex(path, &text, &self.rule_set)),
            }
        }
        Ok(findings)
    }
}
