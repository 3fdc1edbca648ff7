//! Logging initialization

use rowbound_core::{Error, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::TelemetryConfig;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
///
/// # Errors
///
/// Returns a configuration error if the level directive is invalid or a
/// global subscriber is already installed.
pub fn init_logging(config: &TelemetryConfig) -> Result<()> {
    let level = if config.log_level.is_empty() {
        "info"
    } else {
        config.log_level.as_str()
    };

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| Error::config(format!("Invalid log level '{level}': {e}")))?,
    };

    let fmt_layer = if config.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer().with_target(true).boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| Error::config(format!("Failed to initialize logging: {e}")))?;

    tracing::debug!(service.name = %config.service_name, "logging initialized");
    Ok(())
}
