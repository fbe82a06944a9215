use crate::domain::accessor::{FieldResult, RawMap, as_object, as_str, field};
use crate::domain::states::{LidState, UnknownStateCode};

pub const LIDS: &[&str] = &[
    "driverFront",
    "passengerFront",
    "driverRear",
    "passengerRear",
    "hood",
    "trunk",
];

pub const WINDOWS: &[&str] = &[
    "driverFront",
    "passengerFront",
    "driverRear",
    "passengerRear",
    "rearWindow",
    "sunroof",
];

/// Entries of `doorsAndWindows` reported next to the nested `doors` mapping.
const HATCH_KEYS: &[&str] = &["hood", "trunk"];

/// A door, hood or trunk of the vehicle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lid {
    pub name: String,
    pub state: LidState,
}

impl Lid {
    pub fn new(name: impl Into<String>, raw_state: &str) -> Result<Self, UnknownStateCode> {
        Ok(Self {
            name: name.into(),
            state: raw_state.parse()?,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.state == LidState::Closed
    }
}

/// A window or the sun roof. Behaves exactly like a [`Lid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window(pub Lid);

impl Window {
    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn state(&self) -> LidState {
        self.0.state
    }

    pub fn is_closed(&self) -> bool {
        self.0.is_closed()
    }
}

pub trait Closable {
    fn is_closed(&self) -> bool;
}

impl Closable for Lid {
    fn is_closed(&self) -> bool {
        Lid::is_closed(self)
    }
}

impl Closable for Window {
    fn is_closed(&self) -> bool {
        Window::is_closed(self)
    }
}

pub fn open_items<T: Closable + Clone>(items: &[T]) -> Vec<T> {
    items.iter().filter(|item| !item.is_closed()).cloned().collect()
}

pub fn all_closed<T: Closable>(items: &[T]) -> bool {
    !items.iter().any(|item| !item.is_closed())
}

fn push_entry(result: &mut Vec<Lid>, name: &str, value: &serde_json::Value) -> FieldResult<()> {
    let raw_state = as_str(value, name)?;
    if raw_state == LidState::Invalid.as_str() {
        return Ok(());
    }

    result.push(Lid::new(name, raw_state)?);
    Ok(())
}

/// Builds the lid list from a `doorsAndWindows` object: the hood and trunk
/// entries first, then every entry of the nested `doors` mapping.
pub(crate) fn lids_from(doors_and_windows: &RawMap) -> FieldResult<Vec<Lid>> {
    let mut result = Vec::new();

    for (key, value) in doors_and_windows {
        if HATCH_KEYS.contains(&key.as_str()) {
            push_entry(&mut result, key, value)?;
        }
    }

    let doors = as_object(field(doors_and_windows, "doors")?, "doors")?;
    for (key, value) in doors {
        push_entry(&mut result, key, value)?;
    }

    Ok(result)
}

pub(crate) fn windows_from(doors_and_windows: &RawMap) -> FieldResult<Vec<Window>> {
    let windows = as_object(field(doors_and_windows, "windows")?, "windows")?;

    let mut result = Vec::new();
    for (key, value) in windows {
        push_entry(&mut result, key, value)?;
    }

    Ok(result.into_iter().map(Window).collect())
}
