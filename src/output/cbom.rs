//! Native CBOM JSON shape, ported field-for-field from `formats/cbom.py`.

use crate::model::CanonicalFinding;
use serde_json::{json, Value};

fn finding_payload(finding: &CanonicalFinding) -> Value {
    json!({
        "id": finding.id,
        "assetType": finding.asset_type,
        "algorithm": finding.algorithm,
        "mode": finding.mode,
        "keySizeBits": finding.key_size_bits,
        "library": finding.library,
        "api": finding.api,
        "confidence": finding.confidence,
        "evidence": {
            "file": finding.evidence.file,
            "line": finding.evidence.line,
            "column": finding.evidence.column,
            "function": finding.evidence.function,
            "snippet": finding.evidence.snippet,
        },
        "notes": finding.notes,
    })
}

pub fn build(
    component: &str,
    findings: &[CanonicalFinding],
    generated_at: &str,
    tool_version: &str,
) -> Value {
    json!({
        "cbomVersion": "1.0",
        "generatedAt": generated_at,
        "component": component,
        "tool": { "name": "cbom-scanner", "version": tool_version },
        "cryptoAssets": findings.iter().map(finding_payload).collect::<Vec<_>>(),
    })
}
