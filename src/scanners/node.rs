//! JavaScript/TypeScript scanner for the `node:crypto` API surface.
//!
//! Ported from `cbom_scanner.scanners.node`: resolves a matched argument
//! against same-file `const NAME = '...'` assignments before giving up,
//! skipping template-literal values that still contain `${` interpolation.

use super::common::{read_lossy, rule_matches, scan_regex};
use super::LanguageScanner;
use crate::ast::{self, languages};
use crate::errors::Result;
use crate::model::{RawFinding, RuleSet, ScanOptions};
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

fn const_assign_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\bconst\s+([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(['"`])([^\n]*?)\2"#)
            .expect("const_assign_re is a fixed pattern")
    })
}

fn collect_const_strings(text: &str) -> HashMap<String, String> {
    let mut constants = HashMap::new();
    for line in text.lines() {
        let Some(caps) = const_assign_re().captures(line) else {
            continue;
        };
        let quote = &caps[2];
        let value = &caps[3];
        if quote == "`" && value.contains("${") {
            continue;
        }
        constants.insert(caps[1].to_string(), value.to_string());
    }
    constants
}

fn resolve(arg: Option<&String>, constants: &HashMap<String, String>) -> Option<String> {
    let arg = arg?;
    if arg.is_empty() {
        return None;
    }
    if let Some(resolved) = constants.get(arg) {
        return Some(resolved.clone());
    }
    if arg.contains("${") {
        return None;
    }
    Some(arg.clone())
}

pub struct NodeScanner {
    rule_set: RuleSet,
}

impl NodeScanner {
    pub fn new(rule_set: RuleSet) -> Self {
        Self { rule_set }
    }
}

impl LanguageScanner for NodeScanner {
    fn language(&self) -> &'static str {
        "node"
    }

    fn supports(&self, path: &Path, options: &ScanOptions) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some("js") | Some("jsx") => true,
            Some("ts") | Some("tsx") => options.include_ts,
            _ => false,
        }
    }

    fn scan(&self, files: &[PathBuf]) -> Result<Vec<RawFinding>> {
        let mut findings = Vec::new();
        for path in files {
            let Some(text) = read_lossy(path) else {
                continue;
            };
            let is_tsx = path.extension().and_then(|e| e.to_str()) == Some("tsx");
            let is_ts = path.extension().and_then(|e| e.to_str()) == Some("ts");
            let spec = if is_tsx {
                &languages::TSX
            } else if is_ts {
                &languages::TYPESCRIPT
            } else {
                &languages::JAVASCRIPT
            };

            let call_sites = match ast::extract_call_sites(&text, spec) {
                Ok(sites) => sites,
                Err(_) => {
                    findings.extend(scan_regex(path, &text, &self.rule_set));
                    continue;
                }
            };

            let constants = collect_const_strings(&text);
            let file = path.display().to_string();
            for call_site in &call_sites {
                for rule in self.rule_set.calls.iter().filter(|r| rule_matches(r, &call_site.callee)) {
                    let algorithm = rule.algorithm.clone().or_else(|| {
                        resolve(
                            rule.arg_indexes.algorithm.and_then(|i| call_site.args.get(i)),
                            &constants,
                        )
                    });
                    let mode = rule.mode.clone().or_else(|| {
                        resolve(rule.arg_indexes.mode.and_then(|i| call_site.args.get(i)), &constants)
                    });
                    let key_size_bits = rule.key_size_bits.clone().or_else(|| {
                        resolve(
                            rule.arg_indexes.key_size_bits.and_then(|i| call_site.args.get(i)),
                            &constants,
                        )
                    });
                    findings.push(RawFinding {
                        file: file.clone(),
                        line: call_site.line,
                        column: call_site.column,
                        snippet: call_site.snippet.clone(),
                        function: call_site.function_context.clone(),
                        api: rule.api().to_string(),
                        library: rule.library().to_string(),
                        algorithm,
                        mode,
                        key_size_bits,
                        confidence: rule.confidence,
                        asset_type: rule.asset_type,
                        notes: None,
                    });
                }
            }
        }
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn const_alias_resolves_to_its_literal_value() {
        let text = "const ALGO = 'aes-256-gcm';\nconst c = crypto.createCipheriv(ALGO, key, iv);\n";
        let constants = collect_const_strings(text);
        assert_eq!(resolve(Some(&"ALGO".to_string()), &constants).as_deref(), Some("aes-256-gcm"));
    }

    #[test]
    fn template_literal_interpolation_is_unresolved() {
        let text = "const ALGO = `aes-${bits}-gcm`;\n";
        let constants = collect_const_strings(text);
        assert!(constants.get("ALGO").is_none());
    }
}
