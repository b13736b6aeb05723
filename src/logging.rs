//! Stderr logging for the pipeline.
//!
//! All harness diagnostics go to stderr via `tracing`. Stdout must stay
//! clean: `docker load` inherits it, and interleaving our own output with a
//! tool's would corrupt what the user sees.
//!
//! Reads `RUST_LOG`. Defaults to `info` so stage progress is visible.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
