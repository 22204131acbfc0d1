//! Log subscriber setup.

use herald_error::ConfigError;
use tracing_subscriber::{
    EnvFilter,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `log_level`. With `json_logs` every event
/// is written as one JSON object per line.
///
/// # Errors
///
/// Fails on an invalid filter or if a subscriber is already installed.
pub fn init_observability(log_level: &str, json_logs: bool) -> Result<(), ConfigError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|e| ConfigError::new(format!("Invalid log filter '{}': {}", log_level, e)))?;

    let fmt_layer = if json_logs {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| ConfigError::new(format!("Failed to install subscriber: {}", e)))
}
