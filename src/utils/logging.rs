//! Structured logging setup.
//!
//! Installs a `tracing-subscriber` fmt subscriber driven by [`LoggingConfig`].
//! `RUST_LOG` takes precedence over the configured level.

use crate::config::LoggingConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter used by [`init_logging`].
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    let level = config.log_level.to_string().to_lowercase();
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed; in that case the
/// existing one is left untouched. Calling this twice is harmless.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let filter = env_filter(config);
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json_format {
        registry
            .with(fmt::layer().json().with_target(true))
            .try_init()
            .is_ok()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_thread_names(true))
            .try_init()
            .is_ok()
    };

    if installed {
        tracing::debug!(app = %config.app_name, "Logging initialized");
    }
    installed
}
