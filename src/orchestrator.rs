//! Enumerates a repository, fans scanning out across languages, and folds raw
//! findings into a sorted, deduplicated list of canonical findings.
//!
//! File discovery generalizes the teacher's `fs_scan` exclusion list (VCS and
//! build-output directories) to this domain; scanner dispatch and the final
//! sort-by-id mirror `cbom_scanner.core.orchestrator.Orchestrator.scan`
//! exactly, with per-file work inside each scanner fanned out via `rayon`.

use crate::errors::{Error, Result};
use crate::model::{CanonicalFinding, RuleSet, ScanOptions};
use crate::normalizer::normalize;
use crate::scanners::{default_scanners, LanguageScanner};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const EXCLUDED_SUBSTRINGS: &[&str] = &[
    "/.git/",
    "/node_modules/",
    "/target/",
    "/build/",
    "/.dart_tool/",
    "/dist/",
    "/vendor/",
    "/.venv/",
    "/__pycache__/",
];

/// Recursively list every regular file under `repo`, sorted by path, skipping
/// VCS metadata and build-output directories.
pub fn discover_files(repo: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(repo)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            let s = path.to_string_lossy().replace('\\', "/");
            !EXCLUDED_SUBSTRINGS.iter().any(|needle| s.contains(needle))
        })
        .collect();
    files.sort();
    files
}

/// Scan `repo` with the given options, returning canonical findings sorted
/// and deduplicated by stable id.
pub fn scan(repo: &Path, options: &ScanOptions, rule_sets: &[RuleSet]) -> Result<Vec<CanonicalFinding>> {
    if !repo.is_dir() {
        return Err(Error::RepoNotFound(repo.display().to_string()));
    }

    let files = discover_files(repo);
    let scanners = default_scanners(rule_sets);

    let mut findings = Vec::new();
    for scanner in &scanners {
        let supported: Vec<PathBuf> = files
            .iter()
            .filter(|path| scanner.supports(path, options))
            .cloned()
            .collect();
        if supported.is_empty() {
            continue;
        }
        tracing::debug!(language = scanner.language(), files = supported.len(), "scanning");
        let raw = scan_parallel(scanner.as_ref(), &supported)?;
        findings.extend(raw.iter().map(normalize));
    }

    findings.sort_by(|a, b| a.id.cmp(&b.id));
    findings.dedup_by(|a, b| a.id == b.id);
    Ok(findings)
}

/// Fans a scanner's `scan` out one file at a time across the `rayon` pool,
/// then flattens the per-file results back together; per-file order within
/// a language scanner doesn't matter since the orchestrator sorts by id.
fn scan_parallel(
    scanner: &(dyn LanguageScanner + Send + Sync),
    files: &[PathBuf],
) -> Result<Vec<crate::model::RawFinding>> {
    files
        .par_iter()
        .map(|file| scanner.scan(std::slice::from_ref(file)))
        .collect::<Result<Vec<_>>>()
        .map(|groups| groups.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excludes_git_and_node_modules_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        std::fs::write(dir.path().join(".git/HEAD"), "ref: refs/heads/main\n").unwrap();
        std::fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
        std::fs::write(dir.path().join("node_modules/pkg/index.js"), "").unwrap();
        std::fs::write(dir.path().join("app.js"), "crypto.createHash('sha256');\n").unwrap();

        let files = discover_files(dir.path());
        assert!(files.iter().any(|p| p.ends_with("app.js")));
        assert!(!files.iter().any(|p| p.to_string_lossy().contains(".git")));
        assert!(!files.iter().any(|p| p.to_string_lossy().contains("node_modules")));
    }

    #[test]
    fn missing_repository_is_an_error() {
        let err = scan(Path::new("/no/such/path"), &ScanOptions::default(), &[]).unwrap_err();
        assert!(matches!(err, Error::RepoNotFound(_)));
    }
}
