//! # campus-logging
//!
//! Structured logging with `tracing`.
//!
//! [`init_subscriber`] installs a global `fmt` subscriber writing to stderr,
//! either compact human-readable lines or one JSON object per line. The
//! `RUST_LOG` environment variable takes precedence over the configured
//! level.

#![deny(unsafe_code)]

pub use campus_settings::LogFormat;

use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` if set and valid, otherwise `level`.
///
/// An unparsable `level` falls back to `info`.
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global tracing subscriber.
///
/// Call once at application startup. Subsequent calls are no-ops.
pub fn init_subscriber(level: &str, format: LogFormat) {
    let filter = build_filter(level);

    // try_init fails (and does nothing) when a global subscriber is already set
    let _ = match format {
        LogFormat::Compact => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .compact()
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .try_init(),
    };
}
