use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::DEFAULT_LOG_FILTER;

/// Initialize logging with tracing
///
/// Reads the filter from `RUST_LOG` when set, otherwise falls back to
/// `"hotbind=debug,warn"`.
///
/// # Example
///
/// ```no_run
/// use hotbind::utils::logging::init_logging;
///
/// init_logging();
/// ```
pub fn init_logging() {
    init_logging_with(DEFAULT_LOG_FILTER);
}

/// Initialize logging with an explicit fallback filter
///
/// Returns false when a global subscriber was already installed.
pub fn init_logging_with(fallback: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let installed = tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("hotbind logging initialized");
    }
    installed
}
