use chrono::{DateTime, FixedOffset};

use crate::adapters::snapshot_file::SnapshotFileSource;
use crate::adapters::source::SnapshotSource;
use crate::app::config::AppConfig;
use crate::app::error::AppError;
use crate::domain::accessor::StatusError;
use crate::domain::range::ValueWithUnit;
use crate::domain::states::{ChargingState, DriveTrainType, LockState};
use crate::domain::vehicle::{UnitSystem, Vehicle};

/// Normalized state of one vehicle, as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleReport {
    pub vin: Option<String>,
    pub name: Option<String>,
    pub drive_train: Option<DriveTrainType>,
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub mileage: ValueWithUnit,
    pub remaining_range_total: Option<ValueWithUnit>,
    pub door_lock_state: Option<LockState>,
    pub open_lids: Option<Vec<String>>,
    pub open_windows: Option<Vec<String>>,
    pub charging_status: Option<ChargingState>,
    pub charging_level_hv: Option<i64>,
    pub are_all_cbs_ok: Option<bool>,
    pub check_control_message_count: Option<usize>,
}

// Snapshots without profile attributes still carry a reportable status.
fn without_profile<T: Default>(result: Result<T, StatusError>) -> Result<T, StatusError> {
    match result {
        Err(StatusError::NoProfile) => Ok(T::default()),
        other => other,
    }
}

pub fn build_report(vehicle: &Vehicle) -> Result<VehicleReport, StatusError> {
    let status = vehicle.status();
    let electric = without_profile(vehicle.has_electric_drivetrain())?;

    Ok(VehicleReport {
        vin: vehicle.vin().map(str::to_string),
        name: without_profile(vehicle.name())?,
        drive_train: without_profile(vehicle.drive_train())?,
        timestamp: status.timestamp()?.or_else(|| vehicle.timestamp()),
        mileage: vehicle.mileage()?,
        remaining_range_total: status.remaining_range_total()?,
        door_lock_state: status.door_lock_state()?,
        open_lids: status
            .open_lids()?
            .map(|lids| lids.into_iter().map(|lid| lid.name).collect()),
        open_windows: status
            .open_windows()?
            .map(|windows| windows.into_iter().map(|window| window.0.name).collect()),
        charging_status: if electric {
            status.charging_status()?
        } else {
            None
        },
        charging_level_hv: if electric {
            status.charging_level_hv()?
        } else {
            None
        },
        are_all_cbs_ok: status.are_all_cbs_ok()?,
        check_control_message_count: status
            .check_control_messages()?
            .map(|messages| messages.len()),
    })
}

pub fn report_once<S: SnapshotSource>(
    source: &S,
    units: UnitSystem,
) -> Result<VehicleReport, AppError> {
    let snapshot = source.fetch().map_err(AppError::snapshot)?;
    let vehicle = Vehicle::new(snapshot, units);
    let report = build_report(&vehicle).map_err(AppError::status)?;

    tracing::info!(
        vin = report.vin.as_deref().unwrap_or("unknown"),
        name = report.name.as_deref().unwrap_or("unknown"),
        drive_train = ?report.drive_train,
        mileage = %report.mileage,
        "vehicle profile"
    );
    tracing::info!(
        range_total = ?report.remaining_range_total.as_ref().map(ToString::to_string),
        door_lock_state = ?report.door_lock_state,
        open_lids = ?report.open_lids,
        open_windows = ?report.open_windows,
        charging_status = ?report.charging_status,
        charging_level_hv = ?report.charging_level_hv,
        "vehicle state"
    );
    if report.are_all_cbs_ok == Some(false) {
        tracing::warn!("condition based services need attention");
    }
    if let Some(count) = report.check_control_message_count
        && count > 0
    {
        tracing::warn!(count, "active check control messages");
    }

    Ok(report)
}

pub fn run(config: AppConfig) -> Result<(), AppError> {
    let source = SnapshotFileSource::new(&config.snapshot_path);
    report_once(&source, UnitSystem::from_metric_flag(config.use_metric_units))?;
    Ok(())
}
