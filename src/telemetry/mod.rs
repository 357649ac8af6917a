//! Tracing and diagnostics bootstrap.
//!
//! Call [`init`] once at process start. Filtering follows `RUST_LOG`; the
//! default keeps graphtune at `info` and everything else at `warn`.

use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the tracing subscriber and the miette panic hook.
///
/// Safe to call from tests and binaries alike; a second call is a no-op
/// (the subscriber can only be set once per process).
pub fn init() {
    let fmt_layer = fmt::layer().with_target(false);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn,graphtune=info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .try_init();

    miette::set_panic_hook();
}
