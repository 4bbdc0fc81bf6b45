//! Structured logging setup for the Lambda binaries.
//!
//! Events are emitted as one JSON object per line so CloudWatch can index
//! the `component`, `event` and `record_id` fields.

use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global JSON subscriber. Calling it again is harmless.
pub fn init_tracing() {
    let _ = fmt()
        .json()
        .with_env_filter(env_filter())
        .with_current_span(false)
        .with_target(false)
        .try_init();
}
