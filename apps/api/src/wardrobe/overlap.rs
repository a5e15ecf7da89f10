//! Door-meeting overlap policy.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::wardrobe::rules::DoorStyle;

/// Number of places adjacent doors overlap for a given door count.
///
/// The 3, 4 and 5 door cases follow the track layouts actually fitted and are
/// deliberately not `n - 1`.
pub fn meeting_overlap_count(door_count: u32) -> u32 {
    match door_count {
        2 => 1,
        3 | 4 => 2,
        5 => 4,
        n => n.saturating_sub(1),
    }
}

/// Total overlap across all meetings for a door style.
pub fn total_overlap_mm(door_count: u32, style: DoorStyle) -> f64 {
    f64::from(meeting_overlap_count(door_count)) * style.overlap_per_meeting_mm()
}

/// How total overlap is worked out for fixed-size doors.
///
/// Made-to-measure always uses the per-style figure. Older calculator revisions
/// used a flat tolerance for fixed doors instead; it is kept selectable because
/// the business has not settled which one is intended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    #[default]
    PerStyle,
    /// 75mm for a pair of doors, 150mm for three or more, whatever the style.
    ToleranceTable,
}

impl OverlapPolicy {
    pub fn total_overlap_mm(self, door_count: u32, style: DoorStyle) -> f64 {
        match self {
            OverlapPolicy::PerStyle => total_overlap_mm(door_count, style),
            OverlapPolicy::ToleranceTable => match door_count {
                0 | 1 => 0.0,
                2 => 75.0,
                _ => 150.0,
            },
        }
    }
}

impl FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per_style" | "per-style" | "style" => Ok(OverlapPolicy::PerStyle),
            "tolerance_table" | "tolerance-table" | "tolerance" => {
                Ok(OverlapPolicy::ToleranceTable)
            }
            other => Err(format!(
                "unknown overlap policy '{other}' (expected per_style or tolerance_table)"
            )),
        }
    }
}
