use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::adapters::source::{SnapshotSource, SnapshotSourceError};
use crate::domain::accessor::RawMap;
use crate::domain::snapshot::VehicleSnapshot;
use crate::domain::timestamp::parse_datetime;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotFile {
    vin: Option<String>,
    attributes: Option<RawMap>,
    capabilities: Option<RawMap>,
    status: Option<RawMap>,
    properties: Option<RawMap>,
    fetched_at: Option<String>,
}

impl SnapshotFile {
    fn into_snapshot(self, now: DateTime<Utc>) -> Result<VehicleSnapshot, SnapshotSourceError> {
        if self.status.is_none() && self.properties.is_none() && self.attributes.is_none() {
            return Err(SnapshotSourceError::InvalidData(
                "snapshot must contain at least one of: attributes, status, properties".to_string(),
            ));
        }

        let fetched_at = match self.fetched_at.as_deref() {
            Some(raw) => parse_datetime(raw)
                .map(|parsed| parsed.with_timezone(&Utc))
                .ok_or_else(|| {
                    SnapshotSourceError::InvalidData(format!("unparseable fetchedAt: {raw}"))
                })?,
            None => now,
        };

        Ok(VehicleSnapshot {
            vin: self.vin,
            attributes: self.attributes,
            capabilities: self.capabilities,
            status: self.status,
            properties: self.properties,
            fetched_at,
        })
    }
}

/// Parses a snapshot document. `fetchedAt` defaults to the current time.
pub fn parse_snapshot(content: &str) -> Result<VehicleSnapshot, SnapshotSourceError> {
    let file: SnapshotFile = serde_json::from_str(content)?;
    file.into_snapshot(Utc::now())
}

/// Reads a previously captured backend payload from disk on every fetch.
#[derive(Debug, Clone)]
pub struct SnapshotFileSource {
    path: PathBuf,
}

impl SnapshotFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSource for SnapshotFileSource {
    fn fetch(&self) -> Result<VehicleSnapshot, SnapshotSourceError> {
        let content = fs::read_to_string(&self.path)?;
        let snapshot = parse_snapshot(&content)?;

        tracing::debug!(
            path = %self.path.display(),
            vin = snapshot.vin.as_deref().unwrap_or("unknown"),
            "snapshot loaded"
        );

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{ErrorKind, Write};

    use chrono::{TimeZone, Utc};

    use super::{SnapshotFileSource, parse_snapshot};
    use crate::adapters::source::{SnapshotSource, SnapshotSourceError};

    fn fixture(path: &str) -> String {
        format!(
            "{}/testdata/snapshots/{path}",
            env!("CARGO_MANIFEST_DIR").replace("\\", "/")
        )
    }

    #[test]
    fn loads_electric_vehicle_fixture() {
        let source = SnapshotFileSource::new(fixture("i3_rex.json"));

        let snapshot = source.fetch().expect("fixture should load");

        assert_eq!(snapshot.vin.as_deref(), Some("WBY00000000REXI01"));
        assert!(snapshot.status.is_some());
        assert!(snapshot.properties.is_some());
        assert_eq!(
            snapshot.fetched_at,
            Utc.with_ymd_and_hms(2022, 3, 1, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn reads_file_again_on_every_fetch() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file should be created");
        write!(file, r#"{{"vin": "A", "status": {{}}, "properties": {{}}}}"#)
            .expect("temp file should be writable");
        let source = SnapshotFileSource::new(file.path());

        assert_eq!(source.fetch().expect("first fetch").vin.as_deref(), Some("A"));

        std::fs::write(
            file.path(),
            r#"{"vin": "B", "status": {}, "properties": {}}"#,
        )
        .expect("temp file should be rewritable");

        assert_eq!(source.fetch().expect("second fetch").vin.as_deref(), Some("B"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let source = SnapshotFileSource::new(fixture("does_not_exist.json"));

        match source.fetch() {
            Err(SnapshotSourceError::Io(io)) => assert_eq!(io.kind(), ErrorKind::NotFound),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_json() {
        let parsed = parse_snapshot("{not json");

        assert!(matches!(parsed, Err(SnapshotSourceError::Json(_))));
    }

    #[test]
    fn rejects_snapshot_without_payloads() {
        let parsed = parse_snapshot(r#"{"vin": "A"}"#);

        assert!(matches!(parsed, Err(SnapshotSourceError::InvalidData(_))));
    }

    #[test]
    fn rejects_unparseable_fetched_at() {
        let parsed = parse_snapshot(r#"{"status": {}, "fetchedAt": "yesterday"}"#);

        assert!(matches!(parsed, Err(SnapshotSourceError::InvalidData(_))));
    }

    #[test]
    fn keeps_absent_payloads_absent() {
        let snapshot = parse_snapshot(r#"{"attributes": {"model": "X5"}}"#).expect("must parse");

        assert!(snapshot.status.is_none());
        assert!(snapshot.properties.is_none());
        assert!(snapshot.capabilities.is_none());
    }
}
