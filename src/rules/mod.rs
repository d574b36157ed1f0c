//! Declarative per-language rule catalogue: parsing and the embedded defaults.
//!
//! Mirrors the loading semantics of the original `cbom_scanner.core.rules` loader:
//! unknown top-level fields are ignored, `api` defaults to `call`, and an
//! `arg_indexes` entry that cannot be coerced to a non-negative integer is simply
//! dropped rather than failing the whole rule.

use crate::errors::{Error, Result};
use crate::model::{ArgIndexes, AssetType, Confidence, Rule, RuleSet};
use serde_json::Value;
use std::path::Path;

/// One embedded rule file per supported language, baked into the binary so a
/// scan never requires an external rules directory.
pub mod embedded {
    pub const NODE: &str = include_str!("embedded/node.json");
    pub const GO: &str = include_str!("embedded/go.json");
    pub const RUST: &str = include_str!("embedded/rust.json");
    pub const C: &str = include_str!("embedded/c.json");
    pub const CPP: &str = include_str!("embedded/cpp.json");
    pub const PYTHON: &str = include_str!("embedded/python.json");
    pub const JAVA: &str = include_str!("embedded/java.json");
    pub const CSHARP: &str = include_str!("embedded/csharp.json");
}

/// Parse a rule file already read into memory. `source_name` is only used for
/// error messages and as the fallback `language` tag.
pub fn parse_rules(text: &str, source_name: &str) -> Result<RuleSet> {
    let value: Value = serde_json::from_str(text).map_err(|e| Error::RuleFile {
        path: source_name.to_string(),
        source: Box::new(Error::SerdeJson(e)),
    })?;
    let obj = value
        .as_object()
        .ok_or_else(|| Error::RuleFileShape(source_name.to_string()))?;

    let language = obj
        .get("language")
        .and_then(Value::as_str)
        .unwrap_or(source_name)
        .to_string();

    let imports = obj
        .get("imports")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let calls = obj
        .get("calls")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(parse_rule).collect())
        .unwrap_or_default();

    Ok(RuleSet {
        language,
        imports,
        calls,
    })
}

/// Load and parse a rule file from disk.
pub fn load_rules(path: &Path) -> Result<RuleSet> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::RuleFile {
        path: path.display().to_string(),
        source: Box::new(Error::Io(e)),
    })?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("rules");
    parse_rules(&text, stem)
}

fn parse_rule(value: &Value) -> Option<Rule> {
    let obj = value.as_object()?;
    let id = obj.get("id")?.as_str()?.to_string();
    let call = obj.get("call")?.as_str()?.to_string();
    let api = obj.get("api").and_then(Value::as_str).map(str::to_string);
    let library = obj
        .get("library")
        .and_then(Value::as_str)
        .map(str::to_string);
    let asset_type = obj
        .get("asset_type")
        .and_then(Value::as_str)
        .and_then(parse_asset_type);
    let confidence = obj
        .get("confidence")
        .and_then(Value::as_str)
        .and_then(parse_confidence)
        .unwrap_or_default();
    let algorithm = obj
        .get("algorithm")
        .and_then(Value::as_str)
        .map(str::to_string);
    let mode = obj.get("mode").and_then(Value::as_str).map(str::to_string);
    let key_size_bits = obj
        .get("key_size_bits")
        .and_then(json_scalar_to_string);
    let arg_indexes = obj
        .get("arg_indexes")
        .and_then(Value::as_object)
        .map(parse_arg_indexes)
        .unwrap_or_default();

    Some(Rule {
        id,
        call,
        api,
        library,
        asset_type,
        confidence,
        algorithm,
        mode,
        key_size_bits,
        arg_indexes,
    })
}

fn parse_arg_indexes(obj: &serde_json::Map<String, Value>) -> ArgIndexes {
    ArgIndexes {
        algorithm: obj.get("algorithm").and_then(non_negative_index),
        mode: obj.get("mode").and_then(non_negative_index),
        key_size_bits: obj.get("key_size_bits").and_then(non_negative_index),
    }
}

/// Coerce a JSON value to a non-negative `usize`; anything else (strings,
/// floats with a fractional part, negative numbers, bools, null) is dropped
/// silently — the rule simply won't populate that attribute from an argument.
fn non_negative_index(value: &Value) -> Option<usize> {
    if let Some(i) = value.as_i64() {
        return usize::try_from(i).ok();
    }
    if let Some(u) = value.as_u64() {
        return usize::try_from(u).ok();
    }
    if let Some(s) = value.as_str() {
        return s.parse::<i64>().ok().and_then(|i| usize::try_from(i).ok());
    }
    None
}

fn json_scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_confidence(s: &str) -> Option<Confidence> {
    match s.to_ascii_uppercase().as_str() {
        "LOW" => Some(Confidence::Low),
        "MEDIUM" => Some(Confidence::Medium),
        "HIGH" => Some(Confidence::High),
        _ => None,
    }
}

fn parse_asset_type(s: &str) -> Option<AssetType> {
    match s.to_ascii_uppercase().as_str() {
        "HASH" => Some(AssetType::Hash),
        "MAC" => Some(AssetType::Mac),
        "KDF" => Some(AssetType::Kdf),
        "SYMMETRIC" => Some(AssetType::Symmetric),
        "ASYMMETRIC" => Some(AssetType::Asymmetric),
        "SIGNATURE" => Some(AssetType::Signature),
        "AEAD" => Some(AssetType::Aead),
        "PROTOCOL" => Some(AssetType::Protocol),
        "CERTIFICATE" => Some(AssetType::Certificate),
        _ => None,
    }
}

/// Load every embedded rule set, keyed by language tag.
pub fn load_embedded_rule_sets() -> Result<Vec<RuleSet>> {
    let entries = [
        (embedded::NODE, "node"),
        (embedded::GO, "go"),
        (embedded::RUST, "rust"),
        (embedded::C, "c"),
        (embedded::CPP, "cpp"),
        (embedded::PYTHON, "python"),
        (embedded::JAVA, "java"),
        (embedded::CSHARP, "csharp"),
    ];
    entries
        .iter()
        .map(|(text, name)| parse_rules(text, name))
        .collect()
}

/// Load the embedded rule sets, then let any same-named `*.json` file under
/// `rules_dir` replace its embedded counterpart (or add a new language
/// entirely) — "supplement or replace the embedded set at runtime".
pub fn load_rule_sets(rules_dir: Option<&Path>) -> Result<Vec<RuleSet>> {
    let mut rule_sets = load_embedded_rule_sets()?;

    let Some(dir) = rules_dir else {
        return Ok(rule_sets);
    };

    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| Error::RuleFile {
            path: dir.display().to_string(),
            source: Box::new(Error::Io(e)),
        })?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    entries.sort();

    for path in entries {
        let overriding = load_rules(&path)?;
        match rule_sets.iter_mut().find(|rs| rs.language == overriding.language) {
            Some(existing) => *existing = overriding,
            None => rule_sets.push(overriding),
        }
    }
    Ok(rule_sets)
}
