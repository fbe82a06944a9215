use crate::app::AppError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub snapshot_path: String,
    pub use_metric_units: bool,
    pub log_level: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let snapshot_path = lookup("VEHICLE_SNAPSHOT_PATH")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::config("VEHICLE_SNAPSHOT_PATH is required"))?;

        Ok(Self {
            snapshot_path,
            use_metric_units: parse_or_default(&lookup, "USE_METRIC_UNITS", true)?,
            log_level: lookup("LOG_LEVEL")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or_default<T, F>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr + Copy,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .to_ascii_lowercase()
            .parse::<T>()
            .map_err(|_| AppError::config(format!("{key} has an invalid value: {raw}"))),
        None => Ok(default),
    }
}
