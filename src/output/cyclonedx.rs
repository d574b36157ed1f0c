//! CycloneDX 1.5 JSON shape, ported field-for-field from `formats/cyclonedx.py`.
//! Each finding becomes a `library` component whose `cbom:*` properties carry
//! the full canonical record, since CycloneDX has no native crypto-asset schema.

use crate::model::CanonicalFinding;
use serde_json::{json, Value};

fn finding_component(component: &str, finding: &CanonicalFinding) -> Value {
    let mut properties = vec![
        json!({"name": "cbom:algorithm", "value": finding.algorithm}),
        json!({"name": "cbom:mode", "value": finding.mode}),
        json!({"name": "cbom:keySizeBits", "value": finding.key_size_bits}),
        json!({"name": "cbom:library", "value": finding.library}),
        json!({"name": "cbom:api", "value": finding.api}),
        json!({"name": "cbom:assetType", "value": finding.asset_type}),
        json!({"name": "cbom:confidence", "value": finding.confidence}),
        json!({"name": "cbom:evidence:file", "value": finding.evidence.file}),
        json!({"name": "cbom:evidence:line", "value": finding.evidence.line.to_string()}),
        json!({"name": "cbom:evidence:column", "value": finding.evidence.column.to_string()}),
        json!({"name": "cbom:evidence:snippet", "value": finding.evidence.snippet}),
    ];
    if let Some(function) = &finding.evidence.function {
        properties.push(json!({"name": "cbom:evidence:function", "value": function}));
    }
    if let Some(notes) = &finding.notes {
        properties.push(json!({"name": "cbom:notes", "value": notes}));
    }

    json!({
        "type": "library",
        "name": format!("{}-{}", finding.algorithm, finding.mode),
        "version": finding.key_size_bits,
        "properties": properties,
        "bom-ref": finding.id,
        "supplier": { "name": finding.library },
        "description": format!("Crypto usage in {component}"),
    })
}

pub fn build(
    component: &str,
    findings: &[CanonicalFinding],
    generated_at: &str,
    tool_version: &str,
) -> Value {
    json!({
        "bomFormat": "CycloneDX",
        "specVersion": "1.5",
        "version": 1,
        "metadata": {
            "timestamp": generated_at,
            "tools": [{ "name": "cbom-scanner", "version": tool_version }],
            "component": { "name": component, "type": "application" },
        },
        "components": findings.iter().map(|f| finding_component(component, f)).collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Evidence;

    #[test]
    fn component_name_joins_algorithm_and_mode() {
        let finding = CanonicalFinding {
            id: "deadbeef".to_string(),
            asset_type: "SIGNATURE".to_string(),
            algorithm: "ECDSA".to_string(),
            mode: "SHA-256".to_string(),
            key_size_bits: "256".to_string(),
            library: "crypto/ecdsa".to_string(),
            api: "ecdsa.GenerateKey".to_string(),
            confidence: "HIGH".to_string(),
            evidence: Evidence {
                file: "main.go".to_string(),
                line: 9,
                column: 2,
                function: Some("main".to_string()),
                snippet: "ecdsa.GenerateKey(elliptic.P256(), rand.Reader)".to_string(),
            },
            notes: None,
        };
        let payload = build("demo-app", std::slice::from_ref(&finding), "2026-01-01T00:00:00Z", "0.1.0");
        assert_eq!(payload["components"][0]["name"], "ECDSA-SHA-256");
        assert_eq!(payload["components"][0]["bom-ref"], "deadbeef");
        assert_eq!(payload["specVersion"], "1.5");
    }
}
