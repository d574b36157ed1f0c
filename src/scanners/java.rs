use super::common::{call_site_findings, read_lossy, scan_regex};
use super::LanguageScanner;
use crate::ast::{self, languages::JAVA};
use crate::errors::Result;
use crate::model::{RawFinding, RuleSet, ScanOptions};
use std::path::{Path, PathBuf};

pub struct JavaScanner {
    rule_set: RuleSet,
}

impl JavaScanner {
    pub fn new(rule_set: RuleSet) -> Self {
        Self { rule_set }
    }
}

/// JCA spells signature algorithms `<digest>with<algorithm>`, e.g.
/// `SHA256withRSA`. Rewrite those into `<algorithm>-<digest>` so the shared
/// normalizer's signature-splitting path (which expects an `rsa`/`ecdsa`
/// token alongside a `sha*` token, and trips over strings that merely start
/// with `sha`) recognizes them.
fn canonicalize_signature_algorithm(algorithm: String) -> String {
    let lowered = algorithm.to_ascii_lowercase();
    let Some(split) = lowered.find("with") else {
        return algorithm;
    };
    let (digest, rest) = (&lowered[..split], &lowered[split + 4..]);
    if digest.starts_with("sha") && (rest == "rsa" || rest == "ecdsa") {
        format!("{}-{}", rest, digest)
    } else {
        algorithm
    }
}

impl LanguageScanner for JavaScanner {
    fn language(&self) -> &'static str {
        "java"
    }

    fn supports(&self, path: &Path, _options: &ScanOptions) -> bool {
        path.extension().and_then(|e| e.to_str()) == Some("java")
    }

    fn scan(&self, files: &[PathBuf]) -> Result<Vec<RawFinding>> {
        let mut findings = Vec::new();
        for path in files {
            let Some(text) = read_lossy(path) else {
                continue;
            };
            match ast::extract_call_sites(&text, &JAVA) {
                Ok(call_sites) => {
                    let file = path.display().to_string();
                    for call_site in &call_sites {
                        for mut finding in call_site_findings(call_site, &self.rule_set, &file) {
                            finding.algorithm = finding.algorithm.map(canonicalize_signature_algorithm);
                            findings.push(finding);
                        }
                    }
                }
                Err(_) => findings.extend(scan_regex(path, &text, &self.rule_set)),
            }
        }
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_with_rsa_becomes_hyphenated_rsa_sha256() {
        assert_eq!(canonicalize_signature_algorithm("SHA256withRSA".to_string()), "rsa-sha256");
    }

    #[test]
    fn sha1_with_ecdsa_becomes_hyphenated_ecdsa_sha1() {
        assert_eq!(canonicalize_signature_algorithm("SHA1withECDSA".to_string()), "ecdsa-sha1");
    }

    #[test]
    fn unrelated_algorithm_is_left_untouched() {
        assert_eq!(canonicalize_signature_algorithm("AES".to_string()), "AES");
    }
}
