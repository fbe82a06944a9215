use tracing_subscriber::{EnvFilter, fmt};

use crate::app::AppError;

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init(default_level: &str) -> Result<(), AppError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_level).map_err(AppError::config)?,
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(AppError::logging_init)
}
