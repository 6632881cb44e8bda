//! Development-time tracing for the tracker.
//!
//! Diagnostics go to stderr and are filtered by `RUST_LOG`. Command output
//! (stdout) is never mixed with log lines, so `gymlog export -` stays pipeable.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `warn` if unset, which surfaces dropped
/// storage slots and rejected imports.
///
/// # Example
/// ```bash
/// RUST_LOG=gymlog=debug gymlog status
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
