use chrono::{DateTime, FixedOffset};

use crate::domain::accessor::{
    FieldResult, RawMap, StatusError, absorb_missing, as_array, as_bool, as_f64, as_i64,
    as_object, as_str, field, optional, path,
};
use crate::domain::lids::{self, Lid, Window};
use crate::domain::range::{ValueWithUnit, total_range};
use crate::domain::reports::{
    self, CheckControlMessage, ConditionBasedServiceItem, active_check_control_messages,
    condition_based_services_from,
};
use crate::domain::snapshot::VehicleSnapshot;
use crate::domain::states::{ChargingState, ConnectionStatus, LockState};
use crate::domain::timestamp::parse_datetime;

/// Read-only view over the `status` and `properties` payloads of a snapshot.
///
/// Every accessor fails with [`StatusError::NoData`] when either payload is
/// absent. A missing key inside a payload resolves to `Ok(None)`.
#[derive(Debug, Clone, Copy)]
pub struct VehicleStatus<'a> {
    snapshot: &'a VehicleSnapshot,
}

impl<'a> VehicleStatus<'a> {
    pub fn new(snapshot: &'a VehicleSnapshot) -> Self {
        Self { snapshot }
    }

    fn containers(&self) -> Result<(&'a RawMap, &'a RawMap), StatusError> {
        match (&self.snapshot.status, &self.snapshot.properties) {
            (Some(status), Some(properties)) => Ok((status, properties)),
            _ => Err(StatusError::NoData),
        }
    }

    fn read<T>(
        &self,
        attribute: &'static str,
        lookup: impl FnOnce(&'a RawMap, &'a RawMap) -> FieldResult<T>,
    ) -> Result<Option<T>, StatusError> {
        let (status, properties) = self.containers()?;
        absorb_missing(attribute, lookup(status, properties))
    }

    /// Latest of the `lastUpdatedAt` stamps of both payloads.
    pub fn timestamp(&self) -> Result<Option<DateTime<FixedOffset>>, StatusError> {
        self.read("timestamp", |status, properties| {
            let from_properties = as_str(field(properties, "lastUpdatedAt")?, "lastUpdatedAt")?;
            let from_status = as_str(field(status, "lastUpdatedAt")?, "lastUpdatedAt")?;

            Ok(parse_datetime(from_properties).max(parse_datetime(from_status)))
        })
        .map(Option::flatten)
    }

    pub fn is_vehicle_tracking_enabled(&self) -> Result<bool, StatusError> {
        let (_, properties) = self.containers()?;
        Ok(properties.contains_key("vehicleLocation"))
    }

    pub fn is_vehicle_active(&self) -> Result<Option<bool>, StatusError> {
        self.read("is_vehicle_active", |_, properties| {
            as_bool(field(properties, "inMotion")?, "inMotion")
        })
    }

    fn position_available(&self) -> Result<bool, StatusError> {
        if !self.is_vehicle_tracking_enabled()? {
            tracing::warn!("vehicle tracking is disabled");
            return Ok(false);
        }
        if self.is_vehicle_active()?.unwrap_or(false) {
            tracing::warn!("vehicle was moving at last update, no position available");
            return Ok(false);
        }
        Ok(true)
    }

    pub fn gps_position(&self) -> Result<Option<(f64, f64)>, StatusError> {
        if !self.position_available()? {
            return Ok(None);
        }

        self.read("gps_position", |_, properties| {
            let latitude = path(properties, &["vehicleLocation", "coordinates", "latitude"])?;
            let longitude = path(properties, &["vehicleLocation", "coordinates", "longitude"])?;
            Ok((as_f64(latitude, "latitude")?, as_f64(longitude, "longitude")?))
        })
    }

    pub fn gps_heading(&self) -> Result<Option<i64>, StatusError> {
        if !self.position_available()? {
            return Ok(None);
        }

        self.read("gps_heading", |_, properties| {
            as_i64(path(properties, &["vehicleLocation", "heading"])?, "heading")
        })
    }

    pub fn mileage(&self) -> Result<Option<ValueWithUnit>, StatusError> {
        self.read("mileage", |status, _| {
            let mileage = as_object(field(status, "currentMileage")?, "currentMileage")?;
            ValueWithUnit::from_object(mileage, "mileage")
        })
    }

    pub fn remaining_range_fuel(&self) -> Result<Option<ValueWithUnit>, StatusError> {
        self.read("remaining_range_fuel", |_, properties| {
            ValueWithUnit::distance_below(properties, "combustionRange")
        })
    }

    pub fn remaining_range_electric(&self) -> Result<Option<ValueWithUnit>, StatusError> {
        self.read("remaining_range_electric", |_, properties| {
            ValueWithUnit::distance_below(properties, "electricRange")
        })
    }

    /// Fuel range plus electric range. See [`total_range`] for the unit rule.
    pub fn remaining_range_total(&self) -> Result<Option<ValueWithUnit>, StatusError> {
        let fuel = self.remaining_range_fuel()?;
        let electric = self.remaining_range_electric()?;

        Ok(total_range(fuel.as_ref(), electric.as_ref()))
    }

    pub fn remaining_fuel(&self) -> Result<Option<ValueWithUnit>, StatusError> {
        self.read("remaining_fuel", |_, properties| {
            let level = as_object(field(properties, "fuelLevel")?, "fuelLevel")?;
            ValueWithUnit::from_object(level, "value")
        })
    }

    pub fn fuel_percent(&self) -> Result<Option<i64>, StatusError> {
        self.read("fuel_percent", |_, properties| {
            as_i64(path(properties, &["fuelPercentage", "value"])?, "value")
        })
    }

    /// Can be used to identify range extender vehicles with an electric drive train.
    pub fn fuel_indicator_count(&self) -> Result<Option<usize>, StatusError> {
        self.read("fuel_indicator_count", |status, _| {
            Ok(as_array(field(status, "fuelIndicators")?, "fuelIndicators")?.len())
        })
    }

    pub fn lids(&self) -> Result<Option<Vec<Lid>>, StatusError> {
        self.read("lids", |_, properties| {
            lids::lids_from(as_object(
                field(properties, "doorsAndWindows")?,
                "doorsAndWindows",
            )?)
        })
    }

    pub fn open_lids(&self) -> Result<Option<Vec<Lid>>, StatusError> {
        Ok(self.lids()?.map(|items| lids::open_items(&items)))
    }

    pub fn all_lids_closed(&self) -> Result<Option<bool>, StatusError> {
        Ok(self.lids()?.map(|items| lids::all_closed(&items)))
    }

    pub fn windows(&self) -> Result<Option<Vec<Window>>, StatusError> {
        self.read("windows", |_, properties| {
            lids::windows_from(as_object(
                field(properties, "doorsAndWindows")?,
                "doorsAndWindows",
            )?)
        })
    }

    pub fn open_windows(&self) -> Result<Option<Vec<Window>>, StatusError> {
        Ok(self.windows()?.map(|items| lids::open_items(&items)))
    }

    pub fn all_windows_closed(&self) -> Result<Option<bool>, StatusError> {
        Ok(self.windows()?.map(|items| lids::all_closed(&items)))
    }

    pub fn door_lock_state(&self) -> Result<Option<LockState>, StatusError> {
        self.read("door_lock_state", |status, _| {
            Ok(as_str(field(status, "doorsGeneralState")?, "doorsGeneralState")?
                .parse::<LockState>()?)
        })
    }

    pub fn last_update_reason(&self) -> Result<Option<String>, StatusError> {
        self.read("last_update_reason", |status, _| {
            Ok(as_str(field(status, "timestampMessage")?, "timestampMessage")?.to_string())
        })
    }

    pub fn connection_status(&self) -> Result<Option<ConnectionStatus>, StatusError> {
        self.read("connection_status", |_, properties| {
            let connected = as_bool(
                path(properties, &["chargingState", "isChargerConnected"])?,
                "isChargerConnected",
            )?;

            Ok(if connected {
                ConnectionStatus::Connected
            } else {
                ConnectionStatus::Disconnected
            })
        })
    }

    pub fn charging_status(&self) -> Result<Option<ChargingState>, StatusError> {
        self.read("charging_status", |_, properties| {
            Ok(as_str(path(properties, &["chargingState", "state"])?, "state")?
                .parse::<ChargingState>()?)
        })
    }

    pub fn charging_level_hv(&self) -> Result<Option<i64>, StatusError> {
        self.read("charging_level_hv", |_, properties| {
            as_i64(
                path(properties, &["electricRangeAndStatus", "chargePercentage"])?,
                "chargePercentage",
            )
        })
    }

    pub fn condition_based_services(
        &self,
    ) -> Result<Option<Vec<ConditionBasedServiceItem>>, StatusError> {
        self.read("condition_based_services", |_, properties| {
            condition_based_services_from(field(properties, "serviceRequired")?)
        })
    }

    pub fn are_all_cbs_ok(&self) -> Result<Option<bool>, StatusError> {
        Ok(self
            .condition_based_services()?
            .map(|items| reports::are_all_ok(&items)))
    }

    /// Active check control messages; entries in state `OK` are dropped.
    pub fn check_control_messages(
        &self,
    ) -> Result<Option<Vec<CheckControlMessage>>, StatusError> {
        self.read("check_control_messages", |status, _| {
            match optional(field(status, "checkControlMessages"))? {
                Some(raw) => {
                    active_check_control_messages(as_array(raw, "checkControlMessages")?)
                }
                None => Ok(Vec::new()),
            }
        })
    }

    pub fn has_check_control_messages(&self) -> Result<Option<bool>, StatusError> {
        Ok(self
            .check_control_messages()?
            .map(|messages| !messages.is_empty()))
    }
}
