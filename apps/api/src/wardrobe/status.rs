//! Feasibility statuses reported alongside every solve.
//!
//! Infeasible openings are data, not errors: each status renders the exact
//! message shown to the installer through `Display`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Formats a millimetre value without a trailing `.0` for whole numbers.
pub fn fmt_mm(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WidthStatus {
    Ok,
    /// Side build-out leaves nothing for the doors.
    NoNetWidth { net_width_mm: f64 },
    /// Doors do not reach across the net opening; more build-out is needed.
    TooWide { shortfall_mm: f64 },
    /// Door run overlaps more than needed; fewer or narrower doors required.
    TooNarrow { excess_mm: f64 },
}

impl WidthStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, WidthStatus::Ok)
    }
}

impl fmt::Display for WidthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidthStatus::Ok => f.write_str("OK"),
            WidthStatus::NoNetWidth { net_width_mm } => write!(
                f,
                "Opening too small once side liners applied (net width {}mm).",
                fmt_mm(*net_width_mm)
            ),
            WidthStatus::TooWide { shortfall_mm } => write!(
                f,
                "Opening too wide: doors short by {}mm, more build-out needed.",
                fmt_mm(*shortfall_mm)
            ),
            WidthStatus::TooNarrow { excess_mm } => write!(
                f,
                "Opening too narrow: doors overrun by {}mm.",
                fmt_mm(*excess_mm)
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeightStatus {
    Ok,
    /// Bottom liner, trackset and dropdown alone exceed the opening height.
    TooShort { shortfall_mm: f64 },
    /// The fixed door does not fit under the trackset.
    TooShortForFixedDoor {
        door_height_mm: f64,
        shortfall_mm: f64,
    },
    /// Made-to-measure door would exceed the tallest door made.
    DoorHeightCapped { required_mm: f64, max_mm: f64 },
    /// Fixed door leaves a gap larger than the tallest dropdown.
    DropdownExceedsMax { required_mm: f64, max_mm: f64 },
}

impl HeightStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, HeightStatus::Ok)
    }
}

impl fmt::Display for HeightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeightStatus::Ok => f.write_str("OK"),
            HeightStatus::TooShort { shortfall_mm } => write!(
                f,
                "Opening too small once bottom + trackset + dropdown applied (short by {}mm).",
                fmt_mm(*shortfall_mm)
            ),
            HeightStatus::TooShortForFixedDoor {
                door_height_mm,
                shortfall_mm,
            } => write!(
                f,
                "Opening too small for fixed {}mm door + bottom + trackset (short by {}mm).",
                fmt_mm(*door_height_mm),
                fmt_mm(*shortfall_mm)
            ),
            HeightStatus::DoorHeightCapped {
                required_mm,
                max_mm,
            } => write!(
                f,
                "Door height required {}mm exceeds max {}mm; capped at {}mm.",
                fmt_mm(*required_mm),
                fmt_mm(*max_mm),
                fmt_mm(*max_mm)
            ),
            HeightStatus::DropdownExceedsMax {
                required_mm,
                max_mm,
            } => write!(
                f,
                "Dropdown required {}mm exceeds max {}mm.",
                fmt_mm(*required_mm),
                fmt_mm(*max_mm)
            ),
        }
    }
}

/// Overall verdict shown next to the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueFlag {
    #[serde(rename = "OK")]
    Ok,
    Check,
    /// Not a failure: sizes come from the housebuilder's floor plan.
    #[serde(rename = "Refer to floor plan")]
    ReferToFloorPlan,
}

impl IssueFlag {
    pub fn from_statuses(width: &WidthStatus, height: &HeightStatus) -> Self {
        if width.is_ok() && height.is_ok() {
            IssueFlag::Ok
        } else {
            IssueFlag::Check
        }
    }
}

impl fmt::Display for IssueFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IssueFlag::Ok => "OK",
            IssueFlag::Check => "Check",
            IssueFlag::ReferToFloorPlan => "Refer to floor plan",
        })
    }
}
