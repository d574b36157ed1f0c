//! C and C++ scanners. Both route through the same OpenSSL-flavored rule
//! shape; they're kept as distinct scanner types because they own disjoint
//! file extensions and link disjoint tree-sitter grammars.

use super::common::{call_site_findings, read_lossy, scan_regex};
use super::LanguageScanner;
use crate::ast::{self, languages::{C, CPP}};
use crate::errors::Result;
use crate::model::{RawFinding, RuleSet, ScanOptions};
use std::path::{Path, PathBuf};

pub struct CScanner {
    rule_set: RuleSet,
}

impl CScanner {
    pub fn new(rule_set: RuleSet) -> Self {
        Self { rule_set }
    }
}

impl LanguageScanner for CScanner {
    fn language(&self) -> &'static str {
        "c"
    }

    fn supports(&self, path: &Path, _options: &ScanOptions) -> bool {
        matches!(path.extension().and_then(|e| e.to_str()), Some("c") | Some("h"))
    }

    fn scan(&self, files: &[PathBuf]) -> Result<Vec<RawFinding>> {
        scan_with_grammar(files, &self.rule_set, &C)
    }
}

pub struct CppScanner {
    rule_set: RuleSet,
}

impl CppScanner {
    pub fn new(rule_set: RuleSet) -> Self {
        Self { rule_set }
    }
}

impl LanguageScanner for CppScanner {
    fn language(&self) -> &'static str {
        "cpp"
    }

    fn supports(&self, path: &Path, _options: &ScanOptions) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("cpp") | Some("cc") | Some("cxx") | Some("hpp") | Some("hh")
        )
    }

    fn scan(&self, files: &[PathBuf]) -> Result<Vec<RawFinding>> {
        scan_with_grammar(files, &self.rule_set, &CPP)
    }
}

fn scan_with_grammar(
    files: &[PathBuf],
    rule_set: &RuleSet,
    spec: &crate::ast::languages::LanguageSpec,
) -> Result<Vec<RawFinding>> {
    let mut findings = Vec::new();
    for path in files {
        let Some(text) = read_lossy(path) else {
            continue;
        };
        match ast::extract_call_sites(&text, spec) {
            Ok(call_sites) => {
                let file = path.display().to_string();
                for call_site in &call_sites {
                    findings.extend(call_site_findings(call_site, rule_set, &file));
                }
            }
            Err(_) => findings.extend(scan_regex(path, &text, rule_set)),
        }
    }
    Ok(findings)
}
