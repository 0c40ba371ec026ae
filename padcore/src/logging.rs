//! Log setup.
//!
//! Everything logs through `tracing`. The subscriber writes to stderr and is
//! filtered by `RUST_LOG`, falling back to `info` for our own crates.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "warn,padcore=info,plainpad=info";

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
