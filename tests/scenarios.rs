//! Fixture-driven scenario tests: each builds a tiny throwaway repository and
//! asserts the exact canonical output the scanner should produce for it.

use cbom_scanner::model::{CanonicalFinding, ScanOptions};
use cbom_scanner::orchestrator;
use cbom_scanner::rules;
use std::path::Path;
use tempfile::tempdir;

fn scan_fixture(files: &[(&str, &str)], options: &ScanOptions) -> Vec<CanonicalFinding> {
    let dir = tempdir().expect("tempdir");
    for (relative, contents) in files {
        let path = dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }
    let rule_sets = rules::load_embedded_rule_sets().expect("embedded rule sets parse");
    orchestrator::scan(dir.path(), options, &rule_sets).expect("scan succeeds")
}

fn find<'a>(findings: &'a [CanonicalFinding], api: &str) -> &'a CanonicalFinding {
    findings
        .iter()
        .find(|f| f.api == api)
        .unwrap_or_else(|| panic!("no finding for api {api} among {findings:?}"))
}

#[test]
fn node_aes_gcm_256() {
    let findings = scan_fixture(
        &[("app.js", "crypto.createCipheriv(\"aes-256-gcm\", key, iv);\n")],
        &ScanOptions::default(),
    );
    let f = find(&findings, "crypto.createCipheriv");
    assert_eq!((f.algorithm.as_str(), f.mode.as_str(), f.key_size_bits.as_str()), ("AES", "GCM", "256"));
}

#[test]
fn node_aes_cbc_192() {
    let findings = scan_fixture(
        &[("app.js", "crypto.createCipheriv(\"aes-192-cbc\", k, iv);\n")],
        &ScanOptions::default(),
    );
    let f = find(&findings, "crypto.createCipheriv");
    assert_eq!((f.algorithm.as_str(), f.mode.as_str(), f.key_size_bits.as_str()), ("AES", "CBC", "192"));
}

#[test]
fn node_sha256_hash() {
    let findings = scan_fixture(
        &[("app.js", "crypto.createHash(\"sha256\");\n")],
        &ScanOptions::default(),
    );
    let f = find(&findings, "crypto.createHash");
    assert_eq!(f.algorithm, "SHA-256");
    assert_eq!(f.mode, "UNKNOWN");
    assert_eq!(f.key_size_bits, "UNKNOWN");
    assert_eq!(f.asset_type, "HASH");
}

#[test]
fn go_rsa_2048() {
    let findings = scan_fixture(
        &[(
            "main.go",
            "package main\nfunc main() {\n  rsa.GenerateKey(rand.Reader, 2048)\n}\n",
        )],
        &ScanOptions::default(),
    );
    let f = find(&findings, "rsa.GenerateKey");
    assert_eq!(f.algorithm, "RSA");
    assert_eq!(f.key_size_bits, "2048");
    assert_eq!(f.asset_type, "ASYMMETRIC");
}

#[test]
fn go_ecdsa_p256() {
    let findings = scan_fixture(
        &[(
            "main.go",
            "package main\nfunc main() {\n  ecdsa.GenerateKey(elliptic.P256(), rand.Reader)\n}\n",
        )],
        &ScanOptions::default(),
    );
    let f = find(&findings, "ecdsa.GenerateKey");
    assert_eq!(f.algorithm, "ECDSA");
    assert_eq!(f.key_size_bits, "256");
}

#[test]
fn c_openssl_evp_aes_gcm() {
    let findings = scan_fixture(
        &[(
            "cipher.c",
            "void setup(void) {\n  const EVP_CIPHER *c = EVP_aes_256_gcm();\n}\n",
        )],
        &ScanOptions::default(),
    );
    let f = find(&findings, "EVP_aes_256_gcm");
    assert_eq!((f.algorithm.as_str(), f.mode.as_str(), f.key_size_bits.as_str()), ("AES", "GCM", "256"));
}

#[test]
fn cross_language_rsa_sha256_signature_string() {
    let findings = scan_fixture(
        &[(
            "Signer.java",
            "class Signer {\n  void sign() {\n    Signature.getInstance(\"SHA256withRSA\");\n  }\n}\n",
        )],
        &ScanOptions::default(),
    );
    let f = find(&findings, "Signature.getInstance");
    assert_eq!(f.algorithm, "RSA");
    assert_eq!(f.mode, "SHA-256");
    assert_eq!(f.asset_type, "SIGNATURE");
}

#[test]
fn chacha20_poly1305_aead() {
    let findings = scan_fixture(
        &[(
            "main.go",
            "package main\nfunc main() {\n  chacha20poly1305.New(key)\n}\n",
        )],
        &ScanOptions::default(),
    );
    let f = find(&findings, "chacha20poly1305.New");
    assert_eq!(f.algorithm, "CHACHA20");
    assert_eq!(f.mode, "POLY1305");
    assert_eq!(f.asset_type, "AEAD");
}

#[test]
fn csharp_fallback_is_tagged_heuristic() {
    let findings = scan_fixture(
        &[("Program.cs", "var aes = Aes.Create();\n")],
        &ScanOptions::default(),
    );
    let f = find(&findings, "Aes.Create");
    assert_eq!(f.notes.as_deref(), Some("heuristic"));
}

#[test]
fn crypto_zoo_covers_the_full_algorithm_set_in_one_scan() {
    let files: &[(&str, &str)] = &[
        ("node/app.js", "crypto.createCipheriv('aes-256-gcm', key, iv);\ncrypto.createHash('sha256');\ncrypto.pbkdf2Sync(pw, salt, 100000, 32, 'sha256');\ncrypto.scryptSync(pw, salt, 32);\ncrypto.hkdfSync('sha256', ikm, salt, info, 32);\n"),
        ("go/main.go", "package main\nfunc main() {\n  rsa.GenerateKey(rand.Reader, 2048)\n  ed25519.GenerateKey(rand.Reader)\n  tls.Dial(\"tcp\", addr, cfg)\n  ssh.Dial(\"tcp\", addr, cfg)\n  cipher.NewCBCEncrypter(block, iv)\n  cipher.NewCTR(block, iv)\n}\n"),
        ("py/ecdh.py", "def make():\n    return ec.generate_private_key(ec.SECP256R1())\n"),
    ];
    let findings = scan_fixture(files, &ScanOptions::default());

    let algorithms: std::collections::HashSet<&str> =
        findings.iter().map(|f| f.algorithm.as_str()).collect();
    for expected in [
        "AES", "SHA-256", "PBKDF2", "SCRYPT", "HKDF", "RSA", "ED25519", "TLS", "SSH", "ECDSA",
    ] {
        assert!(algorithms.contains(expected), "missing algorithm {expected} in {algorithms:?}");
    }

    let modes: std::collections::HashSet<&str> = findings.iter().map(|f| f.mode.as_str()).collect();
    for expected in ["GCM", "CBC", "CTR"] {
        assert!(modes.contains(expected), "missing mode {expected} in {modes:?}");
    }

    for finding in &findings {
        assert!(!finding.evidence.file.is_empty());
        assert!(finding.evidence.line >= 1);
        assert!(finding.evidence.column >= 1);
    }
}

#[test]
fn canonical_fields_are_never_empty() {
    let findings = scan_fixture(
        &[("app.js", "crypto.createHash('sha256');\n")],
        &ScanOptions::default(),
    );
    for f in &findings {
        assert!(!f.algorithm.is_empty());
        assert!(!f.mode.is_empty());
        assert!(!f.key_size_bits.is_empty());
        assert!(!f.asset_type.is_empty());
    }
}

#[test]
fn repeated_scans_are_bitwise_identical() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("app.js"),
        "crypto.createCipheriv('aes-256-gcm', key, iv);\n",
    )
    .unwrap();
    let rule_sets = rules::load_embedded_rule_sets().unwrap();
    let options = ScanOptions::default();
    let first = orchestrator::scan(dir.path(), &options, &rule_sets).unwrap();
    let second = orchestrator::scan(dir.path(), &options, &rule_sets).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn findings_round_trip_through_json() {
    let findings = scan_fixture(
        &[("app.js", "crypto.createHash('sha256');\n")],
        &ScanOptions::default(),
    );
    let text = serde_json::to_string(&findings).unwrap();
    let parsed: Vec<CanonicalFinding> = serde_json::from_str(&text).unwrap();
    assert_eq!(findings, parsed);
}

#[test]
fn repository_root_must_exist() {
    let rule_sets = rules::load_embedded_rule_sets().unwrap();
    let err = orchestrator::scan(Path::new("/nonexistent/repo/path"), &ScanOptions::default(), &rule_sets);
    assert!(err.is_err());
}
