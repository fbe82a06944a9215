use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unrecognized {kind} code: {code:?}")]
pub struct UnknownStateCode {
    pub kind: &'static str,
    pub code: String,
}

impl UnknownStateCode {
    fn new(kind: &'static str, code: &str) -> Self {
        Self {
            kind,
            code: code.to_string(),
        }
    }
}

/// State of a door, hatch, trunk, window or sun roof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LidState {
    Closed,
    Open,
    OpenTilt,
    Intermediate,
    Invalid,
}

impl LidState {
    pub const ALL: [LidState; 5] = [
        LidState::Closed,
        LidState::Open,
        LidState::OpenTilt,
        LidState::Intermediate,
        LidState::Invalid,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LidState::Closed => "CLOSED",
            LidState::Open => "OPEN",
            LidState::OpenTilt => "OPEN_TILT",
            LidState::Intermediate => "INTERMEDIATE",
            LidState::Invalid => "INVALID",
        }
    }
}

impl FromStr for LidState {
    type Err = UnknownStateCode;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "CLOSED" => Ok(LidState::Closed),
            "OPEN" => Ok(LidState::Open),
            "OPEN_TILT" => Ok(LidState::OpenTilt),
            "INTERMEDIATE" => Ok(LidState::Intermediate),
            "INVALID" => Ok(LidState::Invalid),
            other => Err(UnknownStateCode::new("lid state", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockState {
    Locked,
    Secured,
    SelectiveLocked,
    Unlocked,
    Unknown,
}

impl LockState {
    pub fn as_str(self) -> &'static str {
        match self {
            LockState::Locked => "LOCKED",
            LockState::Secured => "SECURED",
            LockState::SelectiveLocked => "SELECTIVE_LOCKED",
            LockState::Unlocked => "UNLOCKED",
            LockState::Unknown => "UNKNOWN",
        }
    }
}

impl FromStr for LockState {
    type Err = UnknownStateCode;

    /// The backend reports lock states in mixed case, so the code is upper-cased first.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_uppercase().as_str() {
            "LOCKED" => Ok(LockState::Locked),
            "SECURED" => Ok(LockState::Secured),
            "SELECTIVE_LOCKED" => Ok(LockState::SelectiveLocked),
            "UNLOCKED" => Ok(LockState::Unlocked),
            "UNKNOWN" => Ok(LockState::Unknown),
            _ => Err(UnknownStateCode::new("lock state", raw)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionBasedServiceStatus {
    Ok,
    Overdue,
    Pending,
}

impl ConditionBasedServiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ConditionBasedServiceStatus::Ok => "OK",
            ConditionBasedServiceStatus::Overdue => "OVERDUE",
            ConditionBasedServiceStatus::Pending => "PENDING",
        }
    }
}

impl FromStr for ConditionBasedServiceStatus {
    type Err = UnknownStateCode;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "OK" => Ok(ConditionBasedServiceStatus::Ok),
            "OVERDUE" => Ok(ConditionBasedServiceStatus::Overdue),
            "PENDING" => Ok(ConditionBasedServiceStatus::Pending),
            other => Err(UnknownStateCode::new("condition based service status", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChargingState {
    Charging,
    Error,
    Complete,
    FinishedFullyCharged,
    FinishedNotFull,
    Invalid,
    NotCharging,
    WaitingForCharging,
}

impl ChargingState {
    pub fn as_str(self) -> &'static str {
        match self {
            ChargingState::Charging => "CHARGING",
            ChargingState::Error => "ERROR",
            ChargingState::Complete => "COMPLETE",
            ChargingState::FinishedFullyCharged => "FINISHED_FULLY_CHARGED",
            ChargingState::FinishedNotFull => "FINISHED_NOT_FULL",
            ChargingState::Invalid => "INVALID",
            ChargingState::NotCharging => "NOT_CHARGING",
            ChargingState::WaitingForCharging => "WAITING_FOR_CHARGING",
        }
    }
}

impl FromStr for ChargingState {
    type Err = UnknownStateCode;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "CHARGING" => Ok(ChargingState::Charging),
            "ERROR" => Ok(ChargingState::Error),
            "COMPLETE" => Ok(ChargingState::Complete),
            "FINISHED_FULLY_CHARGED" => Ok(ChargingState::FinishedFullyCharged),
            "FINISHED_NOT_FULL" => Ok(ChargingState::FinishedNotFull),
            "INVALID" => Ok(ChargingState::Invalid),
            "NOT_CHARGING" => Ok(ChargingState::NotCharging),
            "WAITING_FOR_CHARGING" => Ok(ChargingState::WaitingForCharging),
            other => Err(UnknownStateCode::new("charging state", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

impl ConnectionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "CONNECTED",
            ConnectionStatus::Disconnected => "DISCONNECTED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriveTrainType {
    Combustion,
    PluginHybrid,
    Electric,
    MildHybrid,
    Unknown,
}

impl DriveTrainType {
    pub fn as_str(self) -> &'static str {
        match self {
            DriveTrainType::Combustion => "COMBUSTION",
            DriveTrainType::PluginHybrid => "PLUGIN_HYBRID",
            DriveTrainType::Electric => "ELECTRIC",
            DriveTrainType::MildHybrid => "MILD_HYBRID",
            DriveTrainType::Unknown => "UNKNOWN",
        }
    }

    /// Drive trains equipped with a high voltage battery.
    pub fn has_hv_battery(self) -> bool {
        matches!(self, DriveTrainType::PluginHybrid | DriveTrainType::Electric)
    }

    pub fn has_combustion_engine(self) -> bool {
        matches!(
            self,
            DriveTrainType::Combustion | DriveTrainType::PluginHybrid | DriveTrainType::MildHybrid
        )
    }
}

impl FromStr for DriveTrainType {
    type Err = UnknownStateCode;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "COMBUSTION" => Ok(DriveTrainType::Combustion),
            "PLUGIN_HYBRID" => Ok(DriveTrainType::PluginHybrid),
            "ELECTRIC" => Ok(DriveTrainType::Electric),
            "MILD_HYBRID" => Ok(DriveTrainType::MildHybrid),
            "UNKNOWN" => Ok(DriveTrainType::Unknown),
            other => Err(UnknownStateCode::new("drive train", other)),
        }
    }
}

/// Last-state-call capability of the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LscType {
    NotCapable,
    NotSupported,
    Activated,
    Unknown,
}

impl LscType {
    pub fn as_str(self) -> &'static str {
        match self {
            LscType::NotCapable => "NOT_CAPABLE",
            LscType::NotSupported => "NOT_SUPPORTED",
            LscType::Activated => "ACTIVATED",
            LscType::Unknown => "UNKNOWN",
        }
    }
}

impl FromStr for LscType {
    type Err = UnknownStateCode;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "NOT_CAPABLE" => Ok(LscType::NotCapable),
            "NOT_SUPPORTED" => Ok(LscType::NotSupported),
            "ACTIVATED" => Ok(LscType::Activated),
            "UNKNOWN" => Ok(LscType::Unknown),
            other => Err(UnknownStateCode::new("lsc type", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarBrand {
    Bmw,
    Mini,
}

impl CarBrand {
    pub fn as_str(self) -> &'static str {
        match self {
            CarBrand::Bmw => "bmw",
            CarBrand::Mini => "mini",
        }
    }
}

impl FromStr for CarBrand {
    type Err = UnknownStateCode;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "bmw" => Ok(CarBrand::Bmw),
            "mini" => Ok(CarBrand::Mini),
            _ => Err(UnknownStateCode::new("car brand", raw)),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

display_as_str!(
    LidState,
    LockState,
    ConditionBasedServiceStatus,
    ChargingState,
    ConnectionStatus,
    DriveTrainType,
    LscType,
    CarBrand,
);
