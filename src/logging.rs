//! Logging setup for the command line front-end.
//!
//! Logs go to stderr so command output on stdout stays clean. Set
//! `DEBUG_LOGGING=1` to enable debug output for the digiclock crates.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Filter used when `DEBUG_LOGGING` is set
const DEBUG_FILTER: &str = "info,digiclock=debug,digiclock_skin=debug";

/// Initialize stderr logging. Safe to call once per process.
pub fn init() {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let filter_directive = if debug_logging { DEBUG_FILTER } else { "info" };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(EnvFilter::new(filter_directive))
        .init();

    tracing::debug!(debug_logging, "Digiclock logging initialized");
}
