//! Collapses a [`RawFinding`] into a canonical [`CanonicalFinding`].
//!
//! The discrimination order below mirrors the original `cbom_scanner.core.normalizer`
//! module call for call: AES prefix forms, `EVP_`-prefixed OpenSSL names, the compact
//! taxonomy lookup, bare `sha*` tokens, literal taxonomy entries (with the
//! ChaCha20-Poly1305 mode special case), a loose `chacha20`+`poly1305` substring match,
//! RSA/ECDSA-SHA<N> signature splitting, and finally an uppercase fallback.

use crate::model::{CanonicalFinding, Evidence, RawFinding, UNKNOWN};
use sha2::{Digest, Sha256};

const AES_PREFIXES: [&str; 3] = ["aes-", "aes_", "aes/"];

fn alg_map(token: &str) -> Option<(&'static str, &'static str)> {
    Some(match token {
        "sha1" => ("SHA-1", "HASH"),
        "sha224" => ("SHA-224", "HASH"),
        "sha256" => ("SHA-256", "HASH"),
        "sha384" => ("SHA-384", "HASH"),
        "sha512" => ("SHA-512", "HASH"),
        "sha3-256" => ("SHA3-256", "HASH"),
        "sha3-384" => ("SHA3-384", "HASH"),
        "sha3-512" => ("SHA3-512", "HASH"),
        "md5" => ("MD5", "HASH"),
        "rsa" => ("RSA", "ASYMMETRIC"),
        "ecdsa" => ("ECDSA", "SIGNATURE"),
        "ed25519" => ("ED25519", "SIGNATURE"),
        "hmac" => ("HMAC", "MAC"),
        "hkdf" => ("HKDF", "KDF"),
        "pbkdf2" => ("PBKDF2", "KDF"),
        "scrypt" => ("SCRYPT", "KDF"),
        "chacha20" => ("CHACHA20", "AEAD"),
        "chacha20-poly1305" => ("CHACHA20", "AEAD"),
        "tls" => ("TLS", "PROTOCOL"),
        "ssh" => ("SSH", "PROTOCOL"),
        "x.509" => ("X.509", "CERTIFICATE"),
        _ => return None,
    })
}

fn stable_id(raw: &RawFinding, algorithm: &str, mode: &str) -> String {
    let payload = format!("{}|{}|{}|{}|{}", raw.file, raw.line, raw.api, algorithm, mode);
    let digest = Sha256::digest(payload.as_bytes());
    hex_lower(&digest)
}

fn hex_lower(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        write!(out, "{:02x}", b).expect("writing to a String never fails");
    }
    out
}

/// Splits an `AES-<size>-<mode>`-shaped token (dashes, underscores, or slashes as
/// separators) into (`"AES"`, mode, key size); missing parts become `UNKNOWN`.
fn parse_aes(algorithm: &str) -> (String, String, String) {
    let normalized = algorithm.to_lowercase().replace('_', "-").replace('/', "-");
    let parts: Vec<&str> = normalized.split('-').collect();
    let key_size = parts
        .get(1)
        .filter(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
        .map(|p| p.to_string())
        .unwrap_or_else(|| UNKNOWN.to_string());
    let mode = parts
        .get(2)
        .map(|p| p.to_uppercase())
        .unwrap_or_else(|| UNKNOWN.to_string());
    ("AES".to_string(), mode, key_size)
}

/// Detects `RSA-SHA<N>` / `ECDSA-SHA<N>`-shaped signature algorithm tokens.
fn parse_signature_algorithm(algorithm: &str) -> Option<(String, String)> {
    let normalized = algorithm.to_lowercase().replace('_', "-").replace('/', "-");
    const DIGESTS: [&str; 5] = ["sha1", "sha224", "sha256", "sha384", "sha512"];
    if normalized.contains("rsa") && normalized.contains("sha") {
        for digest in DIGESTS {
            if normalized.contains(digest) {
                let (name, _) = alg_map(digest).expect("digest token is in alg_map");
                return Some(("RSA".to_string(), name.to_string()));
            }
        }
    }
    if normalized.contains("ecdsa") && normalized.contains("sha") {
        for digest in DIGESTS {
            if normalized.contains(digest) {
                let (name, _) = alg_map(digest).expect("digest token is in alg_map");
                return Some(("ECDSA".to_string(), name.to_string()));
            }
        }
    }
    None
}

fn normalize_mode(mode: Option<&str>) -> String {
    match mode {
        None => UNKNOWN.to_string(),
        Some(m) if m.is_empty() => UNKNOWN.to_string(),
        Some(m) => m.replace('_', "-").replace('/', "-").to_uppercase(),
    }
}

/// Maps named-curve tokens (`p256`, `secp256r1`, `NID_X9_62_prime256v1`, ...) to their
/// bit size; any other value passes through unchanged.
fn normalize_key_size(key_size_bits: Option<&str>) -> String {
    let raw = match key_size_bits {
        None => return UNKNOWN.to_string(),
        Some(s) if s.is_empty() => return UNKNOWN.to_string(),
        Some(s) => s,
    };
    const CURVE_MAP: [(&str, &str); 14] = [
        ("p256", "256"),
        ("p-256", "256"),
        ("prime256v1", "256"),
        ("secp256r1", "256"),
        ("secp256k1", "256"),
        ("nid-x9-62-prime256v1", "256"),
        ("p384", "384"),
        ("p-384", "384"),
        ("secp384r1", "384"),
        ("nid-secp384r1", "384"),
        ("p521", "521"),
        ("p-521", "521"),
        ("secp521r1", "521"),
        ("nid-secp521r1", "521"),
    ];
    let normalized = raw.replace('_', "-");
    let lowered = normalized.to_lowercase();
    for (key, size) in CURVE_MAP {
        if lowered.contains(key) {
            return size.to_string();
        }
    }
    raw.to_string()
}

struct Normalized {
    algorithm: String,
    mode: String,
    key_size: String,
    asset_type: Option<String>,
}

fn normalize_algorithm(raw: &RawFinding) -> Normalized {
    let mut mode = raw.mode.clone().unwrap_or_else(|| UNKNOWN.to_string());
    let mut key_size = raw.key_size_bits.clone().unwrap_or_else(|| UNKNOWN.to_string());
    let mut asset_type = raw.asset_type.map(|a| a.to_string());

    let algorithm = match &raw.algorithm {
        None => "UNKNOWN".to_string(),
        Some(algorithm) => {
            let lowered = algorithm.to_lowercase();
            let compact = lowered.replace('-', "").replace('_', "");

            if AES_PREFIXES.iter().any(|p| lowered.starts_with(p)) {
                let (alg, parsed_mode, parsed_size) = parse_aes(algorithm);
                mode = parsed_mode;
                key_size = parsed_size;
                asset_type = asset_type.or(Some("SYMMETRIC".to_string()));
                alg
            } else if let Some(rest) = lowered.strip_prefix("evp_") {
                let normalized = rest.replace("()", "");
                if let Some(aes_rest) = normalized.strip_prefix("aes_") {
                    let (alg, parsed_mode, parsed_size) = parse_aes(aes_rest);
                    mode = parsed_mode;
                    key_size = parsed_size;
                    asset_type = asset_type.or(Some("SYMMETRIC".to_string()));
                    alg
                } else if let Some((name, mapped_type)) = alg_map(&normalized) {
                    asset_type = asset_type.or(Some(mapped_type.to_string()));
                    name.to_string()
                } else {
                    algorithm.to_uppercase()
                }
            } else if let Some((name, mapped_type)) = alg_map(&compact) {
                asset_type = asset_type.or(Some(mapped_type.to_string()));
                name.to_string()
            } else if lowered.starts_with("sha") && !lowered.contains('-') {
                if let Some((name, mapped_type)) = alg_map(&lowered) {
                    asset_type = asset_type.or(Some(mapped_type.to_string()));
                    name.to_string()
                } else {
                    algorithm.to_uppercase()
                }
            } else if let Some((name, mapped_type)) = alg_map(&lowered) {
                asset_type = asset_type.or(Some(mapped_type.to_string()));
                if lowered == "chacha20-poly1305" {
                    mode = "POLY1305".to_string();
                }
                name.to_string()
            } else if lowered.starts_with("chacha20") && lowered.contains("poly1305") {
                asset_type = asset_type.or(Some("AEAD".to_string()));
                mode = "POLY1305".to_string();
                "CHACHA20".to_string()
            } else if let Some((alg, sig_mode)) = parse_signature_algorithm(algorithm) {
                asset_type = asset_type.or(Some("SIGNATURE".to_string()));
                mode = sig_mode;
                alg
            } else {
                algorithm.to_uppercase()
            }
        }
    };

    Normalized {
        algorithm,
        mode: normalize_mode(Some(&mode)),
        key_size: normalize_key_size(Some(&key_size)),
        asset_type,
    }
}

/// Collapses one raw call-site finding into its canonical, CBOM-ready form.
pub fn normalize(raw: &RawFinding) -> CanonicalFinding {
    let normalized = normalize_algorithm(raw);
    let asset_type = normalized.asset_type.unwrap_or_else(|| UNKNOWN.to_string());
    let evidence = Evidence {
        file: raw.file.clone(),
        line: raw.line,
        column: raw.column,
        function: raw.function.clone(),
        snippet: raw.snippet.clone(),
    };
    let id = stable_id(raw, &normalized.algorithm, &normalized.mode);
    CanonicalFinding {
        id,
        asset_type,
        algorithm: normalized.algorithm,
        mode: normalized.mode,
        key_size_bits: normalized.key_size,
        library: raw.library.clone(),
        api: raw.api.clone(),
        confidence: raw.confidence.to_string(),
        evidence,
        notes: raw.notes.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssetType, Confidence};

    fn raw(algorithm: Option<&str>, mode: Option<&str>, key_size: Option<&str>) -> RawFinding {
        RawFinding {
            file: "src/app.js".to_string(),
            line: 10,
            column: 4,
            snippet: "createCipheriv(...)".to_string(),
            function: Some("encrypt".to_string()),
            api: "crypto.createCipheriv".to_string(),
            library: "node:crypto".to_string(),
            algorithm: algorithm.map(str::to_string),
            mode: mode.map(str::to_string),
            key_size_bits: key_size.map(str::to_string),
            confidence: Confidence::High,
            asset_type: None,
            notes: None,
        }
    }

    #[test]
    fn aes_256_gcm_node_form() {
        let finding = normalize(&raw(Some("aes-256-gcm"), None, None));
        assert_eq!(finding.algorithm, "AES");
        assert_eq!(finding.mode, "GCM");
        assert_eq!(finding.key_size_bits, "256");
        assert_eq!(finding.asset_type, "SYMMETRIC");
    }

    #[test]
    fn aes_192_cbc_node_form() {
        let finding = normalize(&raw(Some("aes-192-cbc"), None, None));
        assert_eq!(finding.algorithm, "AES");
        assert_eq!(finding.mode, "CBC");
        assert_eq!(finding.key_size_bits, "192");
    }

    #[test]
    fn evp_aes_256_gcm_openssl_form() {
        let finding = normalize(&raw(Some("EVP_aes_256_gcm"), None, None));
        assert_eq!(finding.algorithm, "AES");
        assert_eq!(finding.mode, "GCM");
        assert_eq!(finding.key_size_bits, "256");
        assert_eq!(finding.asset_type, "SYMMETRIC");
    }

    #[test]
    fn evp_sha256_maps_through_taxonomy() {
        let finding = normalize(&raw(Some("EVP_sha256"), None, None));
        assert_eq!(finding.algorithm, "SHA-256");
        assert_eq!(finding.asset_type, "HASH");
    }

    #[test]
    fn bare_sha256_token() {
        let finding = normalize(&raw(Some("sha256"), None, None));
        assert_eq!(finding.algorithm, "SHA-256");
        assert_eq!(finding.asset_type, "HASH");
    }

    #[test]
    fn chacha20_poly1305_literal_gets_poly1305_mode() {
        let finding = normalize(&raw(Some("chacha20-poly1305"), None, None));
        assert_eq!(finding.algorithm, "CHACHA20");
        assert_eq!(finding.mode, "POLY1305");
        assert_eq!(finding.asset_type, "AEAD");
    }

    #[test]
    fn chacha20poly1305_compact_token_matches_loose_branch() {
        let finding = normalize(&raw(Some("chacha20poly1305"), None, None));
        assert_eq!(finding.algorithm, "CHACHA20");
        assert_eq!(finding.mode, "POLY1305");
    }

    #[test]
    fn rsa_sha256_signature_splits_into_algorithm_and_mode() {
        let finding = normalize(&raw(Some("RSA-SHA256"), None, None));
        assert_eq!(finding.algorithm, "RSA");
        assert_eq!(finding.mode, "SHA-256");
        assert_eq!(finding.asset_type, "SIGNATURE");
    }

    #[test]
    fn ecdsa_sha384_signature_splits_into_algorithm_and_mode() {
        let finding = normalize(&raw(Some("ecdsa-with-SHA384"), None, None));
        assert_eq!(finding.algorithm, "ECDSA");
        assert_eq!(finding.mode, "SHA-384");
    }

    #[test]
    fn unrecognized_algorithm_falls_back_to_uppercase() {
        let finding = normalize(&raw(Some("blowfish"), None, None));
        assert_eq!(finding.algorithm, "BLOWFISH");
        assert_eq!(finding.asset_type, "UNKNOWN");
    }

    #[test]
    fn named_curve_key_size_resolves_to_bits() {
        let finding = normalize(&raw(Some("ecdsa"), None, Some("secp256r1")));
        assert_eq!(finding.key_size_bits, "256");
    }

    #[test]
    fn nid_prefixed_curve_name_resolves_to_bits() {
        let finding = normalize(&raw(Some("ecdsa"), None, Some("NID_X9_62_prime256v1")));
        assert_eq!(finding.key_size_bits, "256");
    }

    #[test]
    fn missing_algorithm_is_unknown() {
        let finding = normalize(&raw(None, None, None));
        assert_eq!(finding.algorithm, "UNKNOWN");
        assert_eq!(finding.mode, "UNKNOWN");
        assert_eq!(finding.key_size_bits, "UNKNOWN");
    }

    #[test]
    fn id_is_stable_for_identical_inputs() {
        let a = normalize(&raw(Some("aes-256-gcm"), None, None));
        let b = normalize(&raw(Some("aes-256-gcm"), None, None));
        assert_eq!(a.id, b.id);
        assert_eq!(a.id.len(), 64);
    }

    #[test]
    fn id_changes_with_line_number() {
        let mut r = raw(Some("aes-256-gcm"), None, None);
        let a = normalize(&r);
        r.line = 11;
        let b = normalize(&r);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn explicit_asset_type_is_not_overridden() {
        let mut r = raw(Some("custom-thing"), None, None);
        r.asset_type = Some(AssetType::Protocol);
        let finding = normalize(&r);
        assert_eq!(finding.asset_type, "PROTOCOL");
    }
}
