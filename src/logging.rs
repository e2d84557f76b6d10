// ==========================================
// Logging setup
// ==========================================
// tracing + tracing-subscriber
// Level from RUST_LOG, else the caller's default
// Logs go to stderr; stdout carries only the run summary
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Default filter when RUST_LOG is unset
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Initialise the global subscriber
///
/// # Environment
/// - RUST_LOG: filter directives (e.g. `RUST_LOG=brand_backfill=trace`),
///   takes precedence over `verbose`
///
/// # Example
/// ```no_run
/// use brand_backfill::logging;
/// logging::init(false);
/// ```
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Test subscriber at debug level, captured by the test harness
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
