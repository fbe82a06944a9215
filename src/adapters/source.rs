use thiserror::Error;

use crate::domain::snapshot::VehicleSnapshot;

/// Produces raw snapshots for the normalization layer. Implementations own
/// whatever transport they need; the domain code only sees the result.
pub trait SnapshotSource: Send + Sync + 'static {
    fn fetch(&self) -> Result<VehicleSnapshot, SnapshotSourceError>;
}

#[derive(Debug, Error)]
pub enum SnapshotSourceError {
    #[error("failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse snapshot as JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid snapshot: {0}")]
    InvalidData(String),
}
