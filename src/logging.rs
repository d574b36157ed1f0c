//! Structured logging setup, scaled down from the teacher workspace's
//! per-crate `telemetry` module to what a single CLI binary needs: a
//! compact `tracing-subscriber` formatter whose verbosity is driven by
//! `-v`/`--verbose` with `RUST_LOG` free to override it.

use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber. `verbose` raises the default level from
/// `info` to `debug`; `RUST_LOG`, when set, takes precedence either way.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
