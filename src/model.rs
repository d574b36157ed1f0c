//! Core data model shared by the rule loader, extractors, scanners, and normalizer.
//!
//! Conventions:
//! - Raw, pre-normalization fields are `Option<String>`: "not observed" and "observed as
//!   empty" are different things until the normalizer collapses them.
//! - Canonical fields are plain `String`, with `"UNKNOWN"` as the sentinel for absence —
//!   that collapse only happens at the normalization boundary (see `normalizer`).

use serde::{Deserialize, Serialize};

pub const UNKNOWN: &str = "UNKNOWN";

/// Confidence a rule author assigns to a detection pattern.
///
/// Parsed leniently from rule files by `rules::parse_confidence`, not via serde,
/// so an unrecognized string falls back to `Low` instead of failing the whole load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Default for Confidence {
    fn default() -> Self {
        Confidence::Low
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Confidence::Low => "LOW",
            Confidence::Medium => "MEDIUM",
            Confidence::High => "HIGH",
        };
        f.write_str(s)
    }
}

/// Category of cryptographic primitive a rule or finding belongs to.
///
/// Parsed leniently from rule files by `rules::parse_asset_type`; an unrecognized
/// or absent string leaves the rule's `asset_type` as `None`, not a hard error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetType {
    Hash,
    Mac,
    Kdf,
    Symmetric,
    Asymmetric,
    Signature,
    Aead,
    Protocol,
    Certificate,
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AssetType::Hash => "HASH",
            AssetType::Mac => "MAC",
            AssetType::Kdf => "KDF",
            AssetType::Symmetric => "SYMMETRIC",
            AssetType::Asymmetric => "ASYMMETRIC",
            AssetType::Signature => "SIGNATURE",
            AssetType::Aead => "AEAD",
            AssetType::Protocol => "PROTOCOL",
            AssetType::Certificate => "CERTIFICATE",
        };
        f.write_str(s)
    }
}

/// Which positional call argument feeds a given attribute, per rule.
#[derive(Debug, Clone, Default)]
pub struct ArgIndexes {
    pub algorithm: Option<usize>,
    pub mode: Option<usize>,
    pub key_size_bits: Option<usize>,
}

/// One detection pattern, per language.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: String,
    pub call: String,
    pub api: Option<String>,
    pub library: Option<String>,
    pub asset_type: Option<AssetType>,
    pub confidence: Confidence,
    pub algorithm: Option<String>,
    pub mode: Option<String>,
    pub key_size_bits: Option<String>,
    pub arg_indexes: ArgIndexes,
}

impl Rule {
    /// Label recorded on output; defaults to `call` when `api` is absent.
    pub fn api(&self) -> &str {
        self.api.as_deref().unwrap_or(&self.call)
    }

    /// Library label; defaults to `UNKNOWN`.
    pub fn library(&self) -> &str {
        self.library.as_deref().unwrap_or(UNKNOWN)
    }
}

/// Per-language bundle of detection rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub language: String,
    pub imports: Vec<String>,
    pub calls: Vec<Rule>,
}

/// Options threaded through the orchestrator into each scanner's `supports`/`scan`.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub include_ts: bool,
}

/// A syntactic call site produced by the AST extractor or the regex fallback.
#[derive(Debug, Clone)]
pub struct CallSite {
    pub callee: String,
    pub args: Vec<String>,
    pub line: usize,
    pub column: usize,
    pub snippet: String,
    pub function_context: Option<String>,
}

/// A single call-site hit before normalization.
#[derive(Debug, Clone)]
pub struct RawFinding {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub snippet: String,
    pub function: Option<String>,
    pub api: String,
    pub library: String,
    pub algorithm: Option<String>,
    pub mode: Option<String>,
    pub key_size_bits: Option<String>,
    pub confidence: Confidence,
    pub asset_type: Option<AssetType>,
    pub notes: Option<String>,
}

/// Source location and context justifying a canonical finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub function: Option<String>,
    pub snippet: String,
}

/// Post-normalization cryptographic-asset record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalFinding {
    pub id: String,
    pub asset_type: String,
    pub algorithm: String,
    pub mode: String,
    pub key_size_bits: String,
    pub library: String,
    pub api: String,
    pub confidence: String,
    pub evidence: Evidence,
    pub notes: Option<String>,
}
