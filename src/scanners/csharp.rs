//! C#/.NET scanner. No tree-sitter grammar is linked for C#, so this scanner
//! always runs the line-based heuristic path and every finding it produces
//! carries `notes: "heuristic"`.

use super::common::{read_lossy, scan_regex};
use super::LanguageScanner;
use crate::errors::Result;
use crate::model::{RawFinding, RuleSet, ScanOptions};
use std::path::{Path, PathBuf};

pub struct CSharpScanner {
    rule_set: RuleSet,
}

impl CSharpScanner {
    pub fn new(rule_set: RuleSet) -> Self {
        Self { rule_set }
    }
}

impl LanguageScanner for CSharpScanner {
    fn language(&self) -> &'static str {
        "csharp"
    }

    fn supports(&self, path: &Path, _options: &ScanOptions) -> bool {
        path.extension().and_then(|e| e.to_str()) == Some("cs")
    }

    fn scan(&self, files: &[PathBuf]) -> Result<Vec<RawFinding>> {
        let mut findings = Vec::new();
        for path in files {
            let Some(text) = read_lossy(path) else {
                continue;
            };
            findings.extend(scan_regex(path, &text, &self.rule_set));
        }
        Ok(findings)
    }
}
