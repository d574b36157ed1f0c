//! Per-language scanners and the trait the orchestrator drives them through.
//!
//! Mirrors `cbom_scanner.scanners.base.LanguageScanner`: each scanner knows
//! which files it claims (`supports`) and how to turn those files into raw,
//! pre-normalization findings (`scan`).

mod c_cpp;
pub mod common;
mod csharp;
mod go;
mod java;
mod node;
mod python;
mod rust_lang;

use crate::errors::Result;
use crate::model::{RawFinding, RuleSet, ScanOptions};
use std::path::{Path, PathBuf};

pub trait LanguageScanner {
    fn language(&self) -> &'static str;
    fn supports(&self, path: &Path, options: &ScanOptions) -> bool;
    fn scan(&self, files: &[PathBuf]) -> Result<Vec<RawFinding>>;
}

/// Every scanner, in the fixed order the orchestrator fans out over them.
pub fn default_scanners(rule_sets: &[RuleSet]) -> Vec<Box<dyn LanguageScanner + Send + Sync>> {
    let rs = |name: &str| -> RuleSet {
        rule_sets
            .iter()
            .find(|r| r.language == name)
            .cloned_or_empty(name)
    };

    vec![
        Box::new(node::NodeScanner::new(rs("node"))),
        Box::new(go::GoScanner::new(rs("go"))),
        Box::new(rust_lang::RustScanner::new(rs("rust"))),
        Box::new(c_cpp::CScanner::new(rs("c"))),
        Box::new(c_cpp::CppScanner::new(rs("cpp"))),
        Box::new(python::PythonScanner::new(rs("python"))),
        Box::new(java::JavaScanner::new(rs("java"))),
        Box::new(csharp::CSharpScanner::new(rs("csharp"))),
    ]
}

trait RuleSetLookup {
    fn cloned_or_empty(&self, language: &str) -> RuleSet;
}

impl RuleSetLookup for Option<&RuleSet> {
    fn cloned_or_empty(&self, language: &str) -> RuleSet {
        match self {
            Some(rs) => (*rs).clone(),
            None => RuleSet {
                language: language.to_string(),
                imports: Vec::new(),
                calls: Vec::new(),
            },
        }
    }
}
