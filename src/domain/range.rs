use std::fmt;

use crate::domain::accessor::{FieldResult, RawMap, as_f64, as_str, field, path};

#[derive(Debug, Clone, PartialEq)]
pub struct ValueWithUnit {
    pub value: f64,
    pub unit: String,
}

impl ValueWithUnit {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }

    /// Reads `{<value_key>: number, "units": string}` from `object`.
    pub(crate) fn from_object(object: &RawMap, value_key: &str) -> FieldResult<Self> {
        let value = as_f64(field(object, value_key)?, value_key)?;
        let unit = as_str(field(object, "units")?, "units")?;
        Ok(Self::new(value, unit))
    }

    /// Reads `{"distance": {"value": number, "units": string}}` below `key`.
    pub(crate) fn distance_below(object: &RawMap, key: &str) -> FieldResult<Self> {
        let value = as_f64(path(object, &[key, "distance", "value"])?, "value")?;
        let unit = as_str(path(object, &[key, "distance", "units"])?, "units")?;
        Ok(Self::new(value, unit))
    }
}

impl fmt::Display for ValueWithUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

/// Sums fuel and electric range, counting an absent component as zero.
///
/// The unit is taken from the fuel range when it is present, otherwise from
/// the electric range. Mixed units are not converted.
pub fn total_range(
    fuel: Option<&ValueWithUnit>,
    electric: Option<&ValueWithUnit>,
) -> Option<ValueWithUnit> {
    let unit = fuel.or(electric)?.unit.clone();
    let value = fuel.map_or(0.0, |range| range.value) + electric.map_or(0.0, |range| range.value);

    Some(ValueWithUnit { value, unit })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ValueWithUnit, total_range};

    #[test]
    fn fuel_only_total() {
        let fuel = ValueWithUnit::new(100.0, "km");

        assert_eq!(
            total_range(Some(&fuel), None),
            Some(ValueWithUnit::new(100.0, "km"))
        );
    }

    #[test]
    fn electric_only_total() {
        let electric = ValueWithUnit::new(212.0, "mi");

        assert_eq!(
            total_range(None, Some(&electric)),
            Some(ValueWithUnit::new(212.0, "mi"))
        );
    }

    #[test]
    fn combined_total_prefers_fuel_unit() {
        let fuel = ValueWithUnit::new(50.0, "km");
        let electric = ValueWithUnit::new(30.0, "km");

        assert_eq!(
            total_range(Some(&fuel), Some(&electric)),
            Some(ValueWithUnit::new(80.0, "km"))
        );

        let electric_miles = ValueWithUnit::new(30.0, "mi");
        let mixed = total_range(Some(&fuel), Some(&electric_miles)).expect("total");
        assert_eq!(mixed.unit, "km");
    }

    #[test]
    fn no_components_no_total() {
        assert_eq!(total_range(None, None), None);
    }

    #[test]
    fn reads_distance_object() {
        let data = json!({"electricRange": {"distance": {"value": 174, "units": "KM"}}});
        let object = data.as_object().expect("object");

        let range = ValueWithUnit::distance_below(object, "electricRange").expect("range");

        assert_eq!(range, ValueWithUnit::new(174.0, "KM"));
        assert_eq!(range.to_string(), "174 KM");
    }
}
