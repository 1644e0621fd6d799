//! Diagnostic logging setup.
//!
//! User-facing progress goes through `OutputContext`; this subscriber only
//! carries `tracing` events, filtered by `RUST_LOG` and written to stderr so
//! streamed Terraform output on stdout stays clean.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn";

/// Install the global `tracing` subscriber.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
