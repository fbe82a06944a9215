use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to load vehicle snapshot: {0}")]
    Snapshot(String),
    #[error("failed to read vehicle state: {0}")]
    Status(String),
}

impl AppError {
    pub fn logging_init<E: std::fmt::Display>(error: E) -> Self {
        Self::LoggingInit(error.to_string())
    }

    pub fn config<E: std::fmt::Display>(error: E) -> Self {
        Self::Config(error.to_string())
    }

    pub fn snapshot<E: std::fmt::Display>(error: E) -> Self {
        Self::Snapshot(error.to_string())
    }

    pub fn status<E: std::fmt::Display>(error: E) -> Self {
        Self::Status(error.to_string())
    }
}
