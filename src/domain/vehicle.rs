use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::domain::accessor::{
    FieldResult, RawMap, StatusError, absorb_missing, as_bool, as_f64, as_object, as_str, field,
};
use crate::domain::range::ValueWithUnit;
use crate::domain::snapshot::VehicleSnapshot;
use crate::domain::states::{CarBrand, DriveTrainType, LscType};
use crate::domain::timestamp::parse_datetime;
use crate::domain::vehicle_status::VehicleStatus;

const ALWAYS_AVAILABLE: &[&str] = &["remaining_range_total", "mileage"];

const ELECTRIC_ATTRIBUTES: &[&str] = &[
    "charging_time_remaining",
    "charging_start_time",
    "charging_end_time",
    "charging_time_label",
    "charging_status",
    "connection_status",
    "remaining_battery_percent",
    "remaining_range_electric",
    "last_charging_end_result",
    "ac_current_limit",
    "charging_target",
    "charging_mode",
    "charging_preferences",
    "is_pre_entry_climatization_enabled",
];

const COMBUSTION_ATTRIBUTES: &[&str] = &[
    "remaining_fuel",
    "remaining_range_fuel",
    "remaining_fuel_percent",
];

const GENERIC_ATTRIBUTES: &[&str] = &["gps_position", "vin"];

const LSC_ATTRIBUTES: &[&str] = &[
    "condition_based_services",
    "check_control_messages",
    "door_lock_state",
    "timestamp",
    "lids",
    "windows",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSystem {
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn from_metric_flag(use_metric_units: bool) -> Self {
        if use_metric_units {
            UnitSystem::Metric
        } else {
            UnitSystem::Imperial
        }
    }

    pub fn distance_unit(self) -> &'static str {
        match self {
            UnitSystem::Metric => "km",
            UnitSystem::Imperial => "mi",
        }
    }
}

/// One vehicle of an account: its static attributes, remote capabilities and
/// the status captured in the latest snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    snapshot: VehicleSnapshot,
    units: UnitSystem,
}

impl Vehicle {
    pub fn new(snapshot: VehicleSnapshot, units: UnitSystem) -> Self {
        Self { snapshot, units }
    }

    pub fn snapshot(&self) -> &VehicleSnapshot {
        &self.snapshot
    }

    pub fn status(&self) -> VehicleStatus<'_> {
        VehicleStatus::new(&self.snapshot)
    }

    fn attributes(&self) -> Result<&RawMap, StatusError> {
        self.snapshot.attributes.as_ref().ok_or(StatusError::NoProfile)
    }

    fn read_attribute<T>(
        &self,
        attribute: &'static str,
        lookup: impl FnOnce(&RawMap) -> FieldResult<T>,
    ) -> Result<Option<T>, StatusError> {
        absorb_missing(attribute, lookup(self.attributes()?))
    }

    fn capability(&self, key: &str) -> Option<&Value> {
        self.snapshot
            .capabilities
            .as_ref()
            .and_then(|capabilities| capabilities.get(key))
    }

    fn capability_flag(&self, key: &str) -> bool {
        self.capability(key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    fn status_value(&self, key: &str) -> Option<&Value> {
        self.snapshot
            .status
            .as_ref()
            .and_then(|status| status.get(key))
    }

    pub fn vin(&self) -> Option<&str> {
        self.snapshot.vin.as_deref()
    }

    pub fn brand(&self) -> Result<Option<CarBrand>, StatusError> {
        self.read_attribute("brand", |attributes| {
            Ok(as_str(field(attributes, "brand")?, "brand")?.parse::<CarBrand>()?)
        })
    }

    pub fn name(&self) -> Result<Option<String>, StatusError> {
        self.read_attribute("name", |attributes| {
            Ok(as_str(field(attributes, "model")?, "model")?.to_string())
        })
    }

    pub fn drive_train(&self) -> Result<Option<DriveTrainType>, StatusError> {
        self.read_attribute("drive_train", |attributes| {
            Ok(as_str(field(attributes, "driveTrain")?, "driveTrain")?
                .parse::<DriveTrainType>()?)
        })
    }

    pub fn has_electric_drivetrain(&self) -> Result<bool, StatusError> {
        Ok(self
            .drive_train()?
            .is_some_and(DriveTrainType::has_hv_battery))
    }

    pub fn has_combustion_drivetrain(&self) -> Result<bool, StatusError> {
        Ok(self
            .drive_train()?
            .is_some_and(DriveTrainType::has_combustion_engine))
    }

    /// Odometer reading in the configured unit system.
    ///
    /// Older payloads report `currentMileage` as an object carrying its own
    /// unit; that form is read as-is. An absent reading counts as zero.
    pub fn mileage(&self) -> Result<ValueWithUnit, StatusError> {
        let unit = self.units.distance_unit();
        let zero = || ValueWithUnit::new(0.0, unit);

        let reading = match self.status_value("currentMileage") {
            None | Some(Value::Null) => return Ok(zero()),
            Some(Value::Object(legacy)) => absorb_missing(
                "mileage",
                ValueWithUnit::from_object(legacy, "mileage"),
            )?,
            Some(value) => absorb_missing(
                "mileage",
                as_f64(value, "currentMileage").map(|value| ValueWithUnit::new(value, unit)),
            )?,
        };

        Ok(reading.unwrap_or_else(zero))
    }

    /// Latest of the `lastFetched` stamps of attributes and status.
    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        let from_attributes = self
            .snapshot
            .attributes
            .as_ref()
            .and_then(|attributes| attributes.get("lastFetched"));

        [from_attributes, self.status_value("lastFetched")]
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .filter_map(parse_datetime)
            .max()
    }

    pub fn is_charging_plan_supported(&self) -> bool {
        self.capability_flag("isChargingPlanSupported")
    }

    pub fn is_vehicle_tracking_enabled(&self) -> bool {
        self.capability_flag("vehicleFinder")
    }

    pub fn lsc_type(&self) -> Result<LscType, StatusError> {
        match self.capability("lastStateCallState") {
            None | Some(Value::Null) => Ok(LscType::NotCapable),
            Some(value) => {
                let raw = value.as_str().ok_or_else(|| StatusError::UnexpectedType {
                    field: "lastStateCallState".to_string(),
                    expected: "string",
                })?;
                Ok(raw.parse::<LscType>()?)
            }
        }
    }

    pub fn is_lsc_enabled(&self) -> Result<Option<bool>, StatusError> {
        let status = self.snapshot.status.as_ref().ok_or(StatusError::NoData)?;
        absorb_missing(
            "is_lsc_enabled",
            field(status, "isLscSupported").and_then(|value| as_bool(value, "isLscSupported")),
        )
    }

    pub fn is_remote_set_target_soc_enabled(&self) -> bool {
        self.capability_flag("isChargingTargetSocEnabled")
    }

    pub fn is_remote_set_ac_limit_enabled(&self) -> bool {
        self.capability_flag("isChargingPowerLimitEnabled")
    }

    pub fn is_remote_sendpoi_enabled(&self) -> bool {
        self.capability_flag("sendPoi")
    }

    pub fn is_remote_horn_enabled(&self) -> bool {
        self.capability_flag("horn")
    }

    pub fn is_remote_lights_enabled(&self) -> bool {
        self.capability_flag("lights")
    }

    pub fn is_remote_lock_enabled(&self) -> bool {
        self.capability_flag("lock")
    }

    pub fn is_remote_unlock_enabled(&self) -> bool {
        self.capability_flag("unlock")
    }

    pub fn is_remote_climate_start_enabled(&self) -> bool {
        self.capability_flag("climateNow")
    }

    pub fn is_remote_climate_stop_enabled(&self) -> bool {
        self.status_value("climateControlState").is_some()
    }

    fn has_charging_command(&self, command: &str) -> bool {
        self.capability("remoteChargingCommands")
            .and_then(|commands| as_object(commands, "remoteChargingCommands").ok())
            .and_then(|commands| commands.get("chargingControl"))
            .and_then(Value::as_array)
            .is_some_and(|control| control.iter().any(|entry| entry.as_str() == Some(command)))
    }

    pub fn is_remote_charge_start_enabled(&self) -> bool {
        self.has_charging_command("START")
    }

    pub fn is_remote_charge_stop_enabled(&self) -> bool {
        self.has_charging_command("STOP")
    }

    /// Attributes that exist for the drive train of this vehicle. Depending on
    /// the snapshot, some of them may still resolve to `None`.
    pub fn drive_train_attributes(&self) -> Result<Vec<&'static str>, StatusError> {
        let mut result = ALWAYS_AVAILABLE.to_vec();
        if self.has_electric_drivetrain()? {
            result.extend_from_slice(ELECTRIC_ATTRIBUTES);
        }
        if self.has_combustion_drivetrain()? {
            result.extend_from_slice(COMBUSTION_ATTRIBUTES);
        }
        Ok(result)
    }

    pub fn available_attributes(&self) -> Result<Vec<&'static str>, StatusError> {
        let mut result = GENERIC_ATTRIBUTES.to_vec();
        if self.is_lsc_enabled()?.unwrap_or(false) {
            result.extend(self.drive_train_attributes()?);
            result.extend_from_slice(LSC_ATTRIBUTES);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::{Value, json};

    use super::{UnitSystem, Vehicle};
    use crate::domain::accessor::StatusError;
    use crate::domain::range::ValueWithUnit;
    use crate::domain::snapshot::VehicleSnapshot;
    use crate::domain::states::{CarBrand, DriveTrainType, LscType};
    use crate::domain::vehicle_status::VehicleStatus;

    fn object(value: Value) -> serde_json::Map<String, Value> {
        value.as_object().cloned().expect("fixture must be an object")
    }

    fn vehicle(
        attributes: Value,
        capabilities: Value,
        status: Value,
        units: UnitSystem,
    ) -> Vehicle {
        let snapshot = VehicleSnapshot::new(
            Some(object(status)),
            Some(object(json!({}))),
            Utc.with_ymd_and_hms(2022, 3, 1, 8, 0, 0).unwrap(),
        )
        .with_profile("WBY00000000REXI01", object(attributes), object(capabilities));

        Vehicle::new(snapshot, units)
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn snapshot_and_views_are_send_and_sync() {
        assert_send_sync::<VehicleSnapshot>();
        assert_send_sync::<Vehicle>();
        assert_send_sync::<VehicleStatus<'static>>();
    }

    #[test]
    fn reads_profile_attributes() {
        let car = vehicle(
            json!({"brand": "BMW", "model": "i3 (+ REX)", "driveTrain": "ELECTRIC"}),
            json!({}),
            json!({}),
            UnitSystem::Metric,
        );

        assert_eq!(car.vin(), Some("WBY00000000REXI01"));
        assert_eq!(car.brand(), Ok(Some(CarBrand::Bmw)));
        assert_eq!(car.name(), Ok(Some("i3 (+ REX)".to_string())));
        assert_eq!(car.drive_train(), Ok(Some(DriveTrainType::Electric)));
        assert_eq!(car.has_electric_drivetrain(), Ok(true));
        assert_eq!(car.has_combustion_drivetrain(), Ok(false));
    }

    #[test]
    fn unknown_drive_train_fails_loudly() {
        let car = vehicle(
            json!({"driveTrain": "STEAM"}),
            json!({}),
            json!({}),
            UnitSystem::Metric,
        );

        assert!(matches!(
            car.drive_train(),
            Err(StatusError::UnknownState(_))
        ));
    }

    #[test]
    fn missing_attributes_container_is_no_profile() {
        let snapshot = VehicleSnapshot::new(Some(object(json!({}))), None, Utc::now());
        let car = Vehicle::new(snapshot, UnitSystem::Metric);

        assert_eq!(car.brand(), Err(StatusError::NoProfile));
        assert_eq!(car.has_electric_drivetrain(), Err(StatusError::NoProfile));
        assert!(!car.is_remote_lock_enabled());
    }

    #[test]
    fn mileage_uses_configured_unit() {
        let car = vehicle(
            json!({}),
            json!({}),
            json!({"currentMileage": 1_121}),
            UnitSystem::Imperial,
        );

        assert_eq!(car.mileage(), Ok(ValueWithUnit::new(1_121.0, "mi")));
    }

    #[test]
    fn mileage_defaults_to_zero_and_reads_legacy_object() {
        let missing = vehicle(json!({}), json!({}), json!({}), UnitSystem::Metric);
        assert_eq!(missing.mileage(), Ok(ValueWithUnit::new(0.0, "km")));

        let legacy = vehicle(
            json!({}),
            json!({}),
            json!({"currentMileage": {"mileage": 2_000, "units": "mls"}}),
            UnitSystem::Metric,
        );
        assert_eq!(legacy.mileage(), Ok(ValueWithUnit::new(2_000.0, "mls")));
    }

    #[test]
    fn timestamp_takes_latest_fetch() {
        let car = vehicle(
            json!({"lastFetched": "2022-03-01T07:55:00.000Z"}),
            json!({}),
            json!({"lastFetched": "2022-03-01T07:58:12.000Z"}),
            UnitSystem::Metric,
        );

        assert_eq!(
            car.timestamp(),
            Some(
                Utc.with_ymd_and_hms(2022, 3, 1, 7, 58, 12)
                    .unwrap()
                    .fixed_offset()
            )
        );
    }

    #[test]
    fn capability_flags_default_to_false() {
        let car = vehicle(
            json!({}),
            json!({
                "lock": true,
                "unlock": true,
                "horn": false,
                "vehicleFinder": true,
                "remoteChargingCommands": {"chargingControl": ["START"]}
            }),
            json!({"climateControlState": {"activity": "STANDBY"}}),
            UnitSystem::Metric,
        );

        assert!(car.is_remote_lock_enabled());
        assert!(car.is_remote_unlock_enabled());
        assert!(!car.is_remote_horn_enabled());
        assert!(!car.is_remote_lights_enabled());
        assert!(!car.is_remote_sendpoi_enabled());
        assert!(car.is_vehicle_tracking_enabled());
        assert!(car.is_remote_charge_start_enabled());
        assert!(!car.is_remote_charge_stop_enabled());
        assert!(car.is_remote_climate_stop_enabled());
        assert!(!car.is_remote_climate_start_enabled());
        assert!(!car.is_charging_plan_supported());
        assert_eq!(car.lsc_type(), Ok(LscType::NotCapable));
    }

    #[test]
    fn resolves_attribute_lists_for_plugin_hybrid() {
        let car = vehicle(
            json!({"driveTrain": "PLUGIN_HYBRID"}),
            json!({"lastStateCallState": "ACTIVATED"}),
            json!({"isLscSupported": true}),
            UnitSystem::Metric,
        );

        let drive_train = car.drive_train_attributes().expect("attributes");
        assert!(drive_train.contains(&"charging_status"));
        assert!(drive_train.contains(&"remaining_range_fuel"));
        assert_eq!(drive_train[..2], ["remaining_range_total", "mileage"]);

        let available = car.available_attributes().expect("attributes");
        assert_eq!(available[..2], ["gps_position", "vin"]);
        assert!(available.contains(&"lids"));
        assert_eq!(car.lsc_type(), Ok(LscType::Activated));
    }

    #[test]
    fn combustion_vehicle_without_lsc_lists_generic_attributes_only() {
        let car = vehicle(
            json!({"driveTrain": "COMBUSTION"}),
            json!({}),
            json!({"isLscSupported": false}),
            UnitSystem::Metric,
        );

        let drive_train = car.drive_train_attributes().expect("attributes");
        assert!(!drive_train.contains(&"charging_status"));
        assert!(drive_train.contains(&"remaining_fuel"));
        assert_eq!(car.available_attributes(), Ok(vec!["gps_position", "vin"]));
    }
}
