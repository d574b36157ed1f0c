//! `clap`-derive command-line front end: a single `scan` subcommand that
//! wires its flags through to the orchestrator and a serializer.

use crate::errors::Result;
use crate::model::ScanOptions;
use crate::output::Format;
use crate::{orchestrator, output, rules};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "cbom-scanner", author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan a repository and emit a Cryptographic Bill of Materials.
    Scan(ScanArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cbom,
    Cyclonedx,
}

#[derive(Debug, Parser)]
pub struct ScanArgs {
    /// Path to the repository to scan.
    pub repo: PathBuf,

    /// Output path, or `-` for stdout.
    #[arg(long, default_value = "-")]
    pub out: String,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Cyclonedx)]
    pub format: OutputFormat,

    /// Also scan `.ts`/`.tsx` files with the Node scanner.
    #[arg(long)]
    pub include_ts: bool,

    /// Directory of rule files that supplement or replace the embedded catalogue.
    #[arg(long)]
    pub rules_dir: Option<PathBuf>,

    /// Raise log verbosity to debug.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the parsed CLI. The caller maps a returned `Err` to a non-zero exit code.
pub fn run(args: Arguments) -> Result<()> {
    let Command::Scan(scan_args) = args.command;
    crate::logging::init(scan_args.verbose);

    let rule_sets = rules::load_rule_sets(scan_args.rules_dir.as_deref())?;
    let options = ScanOptions {
        include_ts: scan_args.include_ts,
    };

    let started = std::time::Instant::now();
    let findings = orchestrator::scan(&scan_args.repo, &options, &rule_sets)?;
    tracing::info!(
        files_scanned_ms = started.elapsed().as_millis() as u64,
        findings = findings.len(),
        "scan complete"
    );

    let component = scan_args
        .repo
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("repository")
        .to_string();

    let format = match scan_args.format {
        OutputFormat::Cbom => Format::Cbom,
        OutputFormat::Cyclonedx => Format::CycloneDx,
    };

    let generated_at = chrono::Utc::now().to_rfc3339();
    output::write_findings(
        &scan_args.out,
        format,
        &component,
        &findings,
        &generated_at,
        env!("CARGO_PKG_VERSION"),
    )
}
