mod config;
mod error;
mod logging;
mod runtime;

pub use error::AppError;
pub use runtime::{VehicleReport, build_report, report_once};

pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    let config = config::AppConfig::from_env()?;
    logging::init(&config.log_level)?;

    tracing::info!(
        snapshot_path = %config.snapshot_path,
        use_metric_units = config.use_metric_units,
        "application bootstrap initialized"
    );

    runtime::run(config)
}
