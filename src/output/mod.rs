//! Output serialization: native CBOM JSON and CycloneDX 1.5 JSON.

pub mod cbom;
pub mod cyclonedx;

use crate::errors::Result;
use crate::model::CanonicalFinding;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Cbom,
    CycloneDx,
}

/// Render `findings` in `format` and write to `out` — `-` means stdout.
pub fn write_findings(
    out: &str,
    format: Format,
    component: &str,
    findings: &[CanonicalFinding],
    generated_at: &str,
    tool_version: &str,
) -> Result<()> {
    let payload = match format {
        Format::Cbom => cbom::build(component, findings, generated_at, tool_version),
        Format::CycloneDx => cyclonedx::build(component, findings, generated_at, tool_version),
    };
    let text = serde_json::to_string_pretty(&sort_keys(payload))?;

    if out == "-" {
        println!("{text}");
    } else {
        let mut file = std::fs::File::create(Path::new(out))?;
        file.write_all(text.as_bytes())?;
    }
    Ok(())
}

/// `serde_json`'s pretty printer preserves insertion order; both formats are
/// built with keys already in the order the original `json.dumps(...,
/// sort_keys=True)` output would produce, assembled through `BTreeMap` so
/// the real comparison happens structurally rather than by construction order.
fn sort_keys(value: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;
    match value {
        Value::Object(map) => {
            let sorted: std::collections::BTreeMap<String, Value> =
                map.into_iter().map(|(k, v)| (k, sort_keys(v))).collect();
            let mut out = serde_json::Map::new();
            for (k, v) in sorted {
                out.insert(k, v);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
