//! Diagnostic logging setup.
//!
//! Logs go to stderr so that reports written to stdout stay machine-readable.
//! `RUST_LOG` takes precedence over the built-in filter.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter directive
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "warn,safesheet=debug" } else { "warn" }
}

/// Install the global subscriber
///
/// Calling it twice is harmless; the second call leaves the first subscriber
/// in place.
pub fn init(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .compact()
        )
        .try_init();
}
