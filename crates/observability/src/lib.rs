//! Tracing/logging setup shared by embedding processes.
//!
//! The engines themselves only emit `tracing` events; initializing a
//! subscriber is left to the process hosting them, and this is the default
//! one.

use tracing_subscriber::EnvFilter;

/// Initialize JSON logging for the process, filtered via `RUST_LOG`.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
