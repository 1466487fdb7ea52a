//! Logging initialization for the auth client.
//!
//! All client components log through `tracing`; this module wires up a
//! `tracing-subscriber` writing to stderr, filtered by the `MENTORA_LOG`
//! env var or the configured default level.

use tracing_subscriber::EnvFilter;

/// Initialize the logging system.
///
/// # Arguments
///
/// * `level` - Default log level (trace, debug, info, warn, error)
///
/// # Example
///
/// ```ignore
/// init_logging("info");
/// tracing::info!("Auth client started");
/// ```
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_env("MENTORA_LOG")
        .unwrap_or_else(|_| EnvFilter::new(level));

    // try_init so a second call (e.g. from tests) is a no-op rather than a panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

/// Parse a log level string into a tracing Level.
pub fn parse_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" | "warning" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
