//! Shared matching/finding-assembly logic used by every per-language scanner.
//!
//! `rule_matches` and the regex fallback mirror `cbom_scanner.scanners.common`
//! exactly: a rule matches a callee by suffix-or-equality, and the line-based
//! fallback tags every finding it produces with `notes: "heuristic"`.

use crate::model::{CallSite, RawFinding, Rule, RuleSet};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

fn literal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"['"`]([^'"`]+)['"`]"#).expect("literal_re is a fixed pattern"))
}

pub fn rule_matches(rule: &Rule, callee: &str) -> bool {
    callee.ends_with(&rule.call) || callee == rule.call
}

/// Read a file for scanning, tolerating non-UTF-8 bytes via lossy decoding
/// and an unreadable/missing file by yielding `None` rather than erroring —
/// a single bad file must never abort the rest of the scan.
pub fn read_lossy(path: &Path) -> Option<String> {
    std::fs::read(path)
        .ok()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}

fn safe_arg(args: &[String], index: Option<usize>) -> Option<String> {
    index.and_then(|i| args.get(i).cloned())
}

/// Build the `RawFinding`s for every rule that matches `call_site`, resolving
/// `algorithm`/`mode`/`key_size_bits` from the rule's literal value first and
/// the rule's `arg_indexes` against the call's arguments second.
pub fn call_site_findings(call_site: &CallSite, rule_set: &RuleSet, file: &str) -> Vec<RawFinding> {
    rule_set
        .calls
        .iter()
        .filter(|rule| rule_matches(rule, &call_site.callee))
        .map(|rule| RawFinding {
            file: file.to_string(),
            line: call_site.line,
            column: call_site.column,
            snippet: call_site.snippet.clone(),
            function: call_site.function_context.clone(),
            api: rule.api().to_string(),
            library: rule.library().to_string(),
            algorithm: rule
                .algorithm
                .clone()
                .or_else(|| safe_arg(&call_site.args, rule.arg_indexes.algorithm)),
            mode: rule
                .mode
                .clone()
                .or_else(|| safe_arg(&call_site.args, rule.arg_indexes.mode)),
            key_size_bits: rule
                .key_size_bits
                .clone()
                .or_else(|| safe_arg(&call_site.args, rule.arg_indexes.key_size_bits)),
            confidence: rule.confidence,
            asset_type: rule.asset_type,
            notes: None,
        })
        .collect()
}

/// Line-by-line substring match used when a grammar isn't linked (C#) or a
/// specific file fails to parse. Every finding here is heuristic: the literal
/// regex grabs the first quoted token on the matching line as a best-effort
/// algorithm guess when the rule doesn't already pin one down.
pub fn scan_regex(path: &Path, text: &str, rule_set: &RuleSet) -> Vec<RawFinding> {
    let file = path.display().to_string();
    let mut findings = Vec::new();
    for (index, line) in text.lines().enumerate() {
        for rule in &rule_set.calls {
            if !line.contains(rule.call.as_str()) {
                continue;
            }
            let column = line.find(rule.call.as_str()).unwrap_or(0) + 1;
            let algorithm = rule
                .algorithm
                .clone()
                .or_else(|| literal_re().captures(line).map(|c| c[1].to_string()));
            findings.push(RawFinding {
                file: file.clone(),
                line: index + 1,
                column,
                snippet: line.trim_end().to_string(),
                function: None,
                api: rule.api().to_string(),
                library: rule.library().to_string(),
                algorithm,
                mode: rule.mode.clone(),
                key_size_bits: rule.key_size_bits.clone(),
                confidence: rule.confidence,
                asset_type: rule.asset_type,
                notes: Some("heuristic".to_string()),
            });
        }
    }
    findings
}
