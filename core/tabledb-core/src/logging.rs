//! Logging utilities for tabledb
//!
//! The engine logs through `tracing`; these helpers install a subscriber.
//! Index-maintenance failures that are recovered after a mutation commits
//! are emitted at `warn`, every mutation at `debug`.

#[cfg(feature = "logging")]
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize logging with default settings
///
/// # Environment Variables
/// - `RUST_LOG` - Log level filter (default: "info")
///
/// # Example
/// ```rust
/// tabledb_core::logging::init();
/// ```
#[cfg(feature = "logging")]
pub fn init() {
    init_with_level("info")
}

/// Initialize logging with a specific level
///
/// # Arguments
/// * `level` - Log level (trace, debug, info, warn, error)
#[cfg(feature = "logging")]
pub fn init_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .try_init();
}

/// Initialize logging for tests
///
/// Debug level, routed through the test writer so output is captured per test.
#[cfg(feature = "logging")]
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

// Stub implementations when logging feature is disabled
#[cfg(not(feature = "logging"))]
pub fn init() {}

#[cfg(not(feature = "logging"))]
pub fn init_with_level(_level: &str) {}

#[cfg(not(feature = "logging"))]
pub fn init_test() {}
