//! Tracing/logging initialization.
//!
//! Auth events log identity ids, roles, and decisions; never passwords,
//! secrets, or token bodies. Keep it that way when adding fields.

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the process.
///
/// JSON logs, timestamps, `RUST_LOG`-configurable filtering (default
/// `info`). Repeated calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
