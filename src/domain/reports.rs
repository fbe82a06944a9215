use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::domain::accessor::{
    FieldResult, RawMap, as_array, as_i64, as_object, as_str, field, optional,
};
use crate::domain::range::ValueWithUnit;
use crate::domain::states::ConditionBasedServiceStatus;
use crate::domain::timestamp::parse_optional_datetime;

const CHECK_CONTROL_OK: &str = "OK";

/// Entry in the list of condition based services.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionBasedServiceItem {
    pub due_date: Option<DateTime<FixedOffset>>,
    pub state: ConditionBasedServiceStatus,
    pub service_type: String,
    pub due_distance: Option<ValueWithUnit>,
}

impl ConditionBasedServiceItem {
    pub(crate) fn from_raw(raw: &Value) -> FieldResult<Self> {
        let object = as_object(raw, "serviceRequired")?;

        let raw_date = optional(field(object, "dateTime"))?
            .map(|value| as_str(value, "dateTime"))
            .transpose()?;
        let state = as_str(field(object, "status")?, "status")?
            .parse::<ConditionBasedServiceStatus>()?;
        let service_type = as_str(field(object, "type")?, "type")?.to_string();
        let due_distance = optional(field(object, "distance"))?
            .map(|value| {
                as_object(value, "distance")
                    .and_then(|distance| ValueWithUnit::from_object(distance, "value"))
            })
            .transpose()?;

        Ok(Self {
            due_date: parse_optional_datetime(raw_date),
            state,
            service_type,
            due_distance,
        })
    }

    pub fn is_ok(&self) -> bool {
        self.state == ConditionBasedServiceStatus::Ok
    }
}

pub(crate) fn condition_based_services_from(
    raw: &Value,
) -> FieldResult<Vec<ConditionBasedServiceItem>> {
    as_array(raw, "serviceRequired")?
        .iter()
        .map(ConditionBasedServiceItem::from_raw)
        .collect()
}

/// Vacuously true for an empty list.
pub fn are_all_ok(items: &[ConditionBasedServiceItem]) -> bool {
    items.iter().all(ConditionBasedServiceItem::is_ok)
}

/// Warning or fault notification generated by the vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckControlMessage {
    pub description_long: Option<String>,
    pub description_short: Option<String>,
    pub ccm_id: Option<i64>,
    pub state: String,
}

impl CheckControlMessage {
    fn from_object(object: &RawMap, state: &str) -> FieldResult<Self> {
        let text = |key: &str| -> FieldResult<Option<String>> {
            optional(field(object, key))?
                .map(|value| as_str(value, key).map(str::to_string))
                .transpose()
        };

        Ok(Self {
            description_long: text("longDescription")?,
            description_short: text("title")?,
            ccm_id: optional(field(object, "id"))?
                .map(|value| as_i64(value, "id"))
                .transpose()?,
            state: state.to_string(),
        })
    }
}

/// Keeps only messages whose state is not `OK`.
pub(crate) fn active_check_control_messages(
    raw: &[Value],
) -> FieldResult<Vec<CheckControlMessage>> {
    let mut result = Vec::new();

    for entry in raw {
        let object = as_object(entry, "checkControlMessages")?;
        let state = as_str(field(object, "state")?, "state")?;
        if state == CHECK_CONTROL_OK {
            continue;
        }

        result.push(CheckControlMessage::from_object(object, state)?);
    }

    Ok(result)
}
