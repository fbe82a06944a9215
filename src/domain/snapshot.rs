use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::accessor::RawMap;

/// Raw backend payloads captured by one fetch.
///
/// A snapshot is never updated in place: every poll produces a new one and all
/// derived values are recomputed from it.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleSnapshot {
    pub vin: Option<String>,
    pub attributes: Option<RawMap>,
    pub capabilities: Option<RawMap>,
    pub status: Option<RawMap>,
    pub properties: Option<RawMap>,
    pub fetched_at: DateTime<Utc>,
}

impl VehicleSnapshot {
    pub fn new(
        status: Option<RawMap>,
        properties: Option<RawMap>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            vin: None,
            attributes: None,
            capabilities: None,
            status,
            properties,
            fetched_at,
        }
    }

    /// Builds a snapshot from a combined state payload with `status` and
    /// `properties` members. Members that are not JSON objects are treated as
    /// absent.
    pub fn from_state(state: &Value, fetched_at: DateTime<Utc>) -> Self {
        Self::new(
            object_member(state, "status"),
            object_member(state, "properties"),
            fetched_at,
        )
    }

    pub fn with_profile(
        mut self,
        vin: impl Into<String>,
        attributes: RawMap,
        capabilities: RawMap,
    ) -> Self {
        self.vin = Some(vin.into());
        self.attributes = Some(attributes);
        self.capabilities = Some(capabilities);
        self
    }
}

fn object_member(value: &Value, key: &str) -> Option<RawMap> {
    value.get(key).and_then(Value::as_object).cloned()
}
