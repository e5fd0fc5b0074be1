//! Logging bootstrap

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Install the global `tracing` subscriber.
///
/// Honors `RUST_LOG`, falling back to [`DEFAULT_LOG_FILTER`]. With `json` the
/// output is one JSON object per line. Calling it twice is harmless.
pub fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    match result {
        Ok(()) => info!("Sync logging initialized"),
        Err(e) => debug!("Logging already initialized: {}", e),
    }
}
