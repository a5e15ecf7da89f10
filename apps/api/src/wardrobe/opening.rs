//! Opening record: the installer's measurements and selections for one calculation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::wardrobe::rules::{
    DoorStyle, DoorSystem, EndPanels, FixedDoorWidth, Housebuilder, Vocabulary, MAX_DOOR_COUNT,
    MIN_DOOR_COUNT,
};

/// Raw installer input, kept as loose JSON so a bad selection falls back to
/// its default instead of failing the request. [`Opening::from_request`]
/// normalises it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OpeningRequest {
    pub width_mm: Option<Value>,
    pub height_mm: Option<Value>,
    pub door_count: Option<Value>,
    pub housebuilder: Option<Value>,
    pub door_system: Option<Value>,
    pub door_style: Option<Value>,
    pub end_panel_count: Option<Value>,
    pub fixed_door_width_mm: Option<Value>,
}

/// Dimensions are the only input that cannot be defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpeningError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{0} must be a number of millimetres")]
    NotANumber(&'static str),

    #[error("{0} must be greater than 0")]
    NotPositive(&'static str),

    #[error("{0} is too large")]
    TooLarge(&'static str),
}

/// A normalised opening. Every field holds a legal value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Opening {
    pub width_mm: u32,
    pub height_mm: u32,
    pub door_count: u32,
    pub housebuilder: Housebuilder,
    pub door_system: DoorSystem,
    pub door_style: DoorStyle,
    #[serde(rename = "end_panel_count")]
    pub end_panels: EndPanels,
    #[serde(rename = "fixed_door_width_mm")]
    pub fixed_door_width: FixedDoorWidth,
}

impl Opening {
    pub fn from_request(request: &OpeningRequest) -> Result<Self, OpeningError> {
        let door_count = count_field("door_count", request.door_count.as_ref())
            .unwrap_or(i64::from(MIN_DOOR_COUNT));

        Ok(Opening {
            width_mm: dimension("width_mm", request.width_mm.as_ref())?,
            height_mm: dimension("height_mm", request.height_mm.as_ref())?,
            door_count: clamp_door_count(door_count),
            housebuilder: Housebuilder::parse_or_default(&selection(request.housebuilder.as_ref())),
            door_system: DoorSystem::parse_or_default(&selection(request.door_system.as_ref())),
            door_style: DoorStyle::parse_or_default(&selection(request.door_style.as_ref())),
            end_panels: EndPanels::from_count(
                count_field("end_panel_count", request.end_panel_count.as_ref()).unwrap_or(0),
            ),
            fixed_door_width: FixedDoorWidth::from_mm_or_default(count_field(
                "fixed_door_width_mm",
                request.fixed_door_width_mm.as_ref(),
            )),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

/// Numbers and numeric strings, rounded to whole millimetres.
fn as_whole_number(value: &Value) -> Option<i64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    // `as` saturates at the i64 bounds.
    number.is_finite().then(|| number.round() as i64)
}

fn dimension(field: &'static str, value: Option<&Value>) -> Result<u32, OpeningError> {
    let value = value.ok_or(OpeningError::Missing(field))?;
    let mm = as_whole_number(value).ok_or(OpeningError::NotANumber(field))?;
    if mm <= 0 {
        return Err(OpeningError::NotPositive(field));
    }
    u32::try_from(mm).map_err(|_| OpeningError::TooLarge(field))
}

/// Absent or null is `None` without a warning; anything non-numeric warns.
fn count_field(field: &'static str, value: Option<&Value>) -> Option<i64> {
    let value = value?;
    let count = as_whole_number(value);
    if count.is_none() {
        warn!(field, value = %value, "Not a number, using default");
    }
    count
}

fn selection(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::String(label)) => label.clone(),
        Some(other) => other.to_string(),
    }
}

fn clamp_door_count(requested: i64) -> u32 {
    let min = i64::from(MIN_DOOR_COUNT);
    let max = i64::from(MAX_DOOR_COUNT);
    let clamped = requested.clamp(min, max);
    if clamped != requested {
        warn!(requested, clamped, "Door count out of range, clamped");
    }
    // Within MIN_DOOR_COUNT..=MAX_DOOR_COUNT, so always fits.
    clamped as u32
}
