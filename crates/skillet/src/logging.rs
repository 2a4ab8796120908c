//! Logging setup helpers.
//!
//! Thin wrappers over `tracing-subscriber` for binaries that don't bring
//! their own subscriber. The filter honors `RUST_LOG` and falls back to the
//! given default directive:
//!
//! ```rust,ignore
//! skillet::logging::init("skillet=debug");
//! ```
//!
//! Caller-misuse diagnostics go through the injected
//! [`DiagnosticSink`](skillet_core::DiagnosticSink), whose default
//! implementation lands here as `tracing` warnings.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs a fmt subscriber with an env-filter.
///
/// Fails if a global subscriber is already set.
pub fn try_init(default_directive: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init()
}

/// Like [`try_init`], but ignores an already-installed subscriber.
pub fn init(default_directive: &str) {
    try_init(default_directive).ok();
}
