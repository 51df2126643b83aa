//! Tracing subscriber setup.
//!
//! `RUST_LOG` takes precedence over the default level, e.g.
//! `RUST_LOG=mtg_etl=debug`.

use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber. Safe to call more than once.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Verbose subscriber that writes through the test harness.
#[cfg(test)]
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
