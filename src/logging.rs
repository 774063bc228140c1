//! Log setup for the command-line entry point.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Install a stderr fmt layer. `RUST_LOG` wins over `default_filter`; an
/// unparsable default falls back to `info`.
///
/// Calling this more than once is harmless: later calls leave the first
/// subscriber in place.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let log_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_filter(filter);

    let _ = tracing_subscriber::registry().with(log_layer).try_init();
}
