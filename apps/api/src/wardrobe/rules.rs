//! Static rule tables for the opening solver.
//!
//! Housebuilder fitting rules, door-style overlaps, the fixed door width options
//! and the physical constants of the track system. All dimensions are millimetres.
//!
//! Every selectable enum implements [`Vocabulary`]. Installer devices do not enforce
//! the vocabulary, so unknown labels fall back to a documented default (logged at
//! `warn`) instead of failing the calculation.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::wardrobe::overlap::OverlapPolicy;

// ────────────────────────────────────────────────────────────────────────────
// Physical constants
// ────────────────────────────────────────────────────────────────────────────

pub const BOTTOM_LINER_THICKNESS_MM: f64 = 36.0;
pub const TRACKSET_HEIGHT_MM: f64 = 54.0;
pub const BASE_SIDE_LINER_THICKNESS_MM: f64 = 18.0;
/// Smallest T-liner section that is fabricated. Anything between bare 18mm and
/// 18 + 50mm is rounded up to this.
pub const MIN_T_LINER_THICKNESS_MM: f64 = 50.0;
pub const MAX_DOOR_HEIGHT_MM: f64 = 2500.0;
pub const MAX_DROPDOWN_MM: f64 = 400.0;
pub const FIXED_DOOR_HEIGHT_MM: f64 = 2223.0;
/// Taller fixed-size door some housebuilders specify instead of the standard one.
pub const TALL_FIXED_DOOR_HEIGHT_MM: f64 = 2313.0;

/// Fixed-size doors may overrun or fall short of the net opening by this much.
pub const SPAN_TOLERANCE_MM: f64 = 5.0;

pub const MIN_DOOR_COUNT: u32 = 2;
pub const MAX_DOOR_COUNT: u32 = 10;

/// Height consumed below and above the doors regardless of door system.
pub const HEIGHT_STACK_MM: f64 = BOTTOM_LINER_THICKNESS_MM + TRACKSET_HEIGHT_MM;

// ────────────────────────────────────────────────────────────────────────────
// Vocabulary
// ────────────────────────────────────────────────────────────────────────────

/// A closed set of installer-selectable values with a lenient string boundary.
pub trait Vocabulary: Copy + fmt::Debug + 'static {
    /// Human name of the vocabulary, used in log lines.
    const KIND: &'static str;

    fn options() -> &'static [Self];

    fn label(self) -> &'static str;

    /// Value used when the input does not match any option.
    fn fallback() -> Self;

    /// Alternative spellings accepted besides the label.
    fn aliases(self) -> &'static [&'static str] {
        &[]
    }

    /// Strict lookup. Case, spacing and punctuation are ignored.
    fn from_label(input: &str) -> Option<Self> {
        let needle = normalize_label(input);
        if needle.is_empty() {
            return None;
        }
        Self::options().iter().copied().find(|option| {
            normalize_label(option.label()) == needle
                || option
                    .aliases()
                    .iter()
                    .any(|alias| normalize_label(alias) == needle)
        })
    }

    /// Lenient lookup: unknown input falls back to [`Vocabulary::fallback`].
    fn parse_or_default(input: &str) -> Self {
        Self::from_label(input).unwrap_or_else(|| {
            let fallback = Self::fallback();
            warn!(
                kind = Self::KIND,
                input,
                fallback = fallback.label(),
                "Unrecognised selection, using default"
            );
            fallback
        })
    }
}

fn normalize_label(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Housebuilders
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Housebuilder {
    Avant,
    #[serde(rename = "Homes By Honey")]
    HomesByHoney,
    Bloor,
    Story,
    Strata,
    #[serde(rename = "Jones Homes")]
    JonesHomes,
    /// Any housebuilder without a specific rule.
    Standard,
}

impl Vocabulary for Housebuilder {
    const KIND: &'static str = "housebuilder";

    fn options() -> &'static [Self] {
        &[
            Housebuilder::Avant,
            Housebuilder::HomesByHoney,
            Housebuilder::Bloor,
            Housebuilder::Story,
            Housebuilder::Strata,
            Housebuilder::JonesHomes,
            Housebuilder::Standard,
        ]
    }

    fn label(self) -> &'static str {
        match self {
            Housebuilder::Avant => "Avant",
            Housebuilder::HomesByHoney => "Homes By Honey",
            Housebuilder::Bloor => "Bloor",
            Housebuilder::Story => "Story",
            Housebuilder::Strata => "Strata",
            Housebuilder::JonesHomes => "Jones Homes",
            Housebuilder::Standard => "Standard",
        }
    }

    fn fallback() -> Self {
        Housebuilder::Standard
    }
}

impl fmt::Display for Housebuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fitting rule mandated by a housebuilder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HousebuilderRule {
    /// Dropdown height for made-to-measure doors.
    pub dropdown_mm: f64,
    /// When set, both sides are built out to exactly this total (liner included),
    /// whatever the opening needs.
    pub locked_build_out_per_side_mm: Option<f64>,
    /// Height of the off-the-shelf door used by the fixed-size system.
    /// 2223mm for every built-in rule; some sites order the 2313mm door.
    pub fixed_door_height_mm: f64,
    /// Whether the installer may pick the fixed door width. Otherwise 762mm is used.
    pub fixed_width_selectable: bool,
}

impl HousebuilderRule {
    const fn open(dropdown_mm: f64) -> Self {
        HousebuilderRule {
            dropdown_mm,
            locked_build_out_per_side_mm: None,
            fixed_door_height_mm: FIXED_DOOR_HEIGHT_MM,
            fixed_width_selectable: false,
        }
    }

    const fn locked(dropdown_mm: f64, build_out_per_side_mm: f64) -> Self {
        HousebuilderRule {
            dropdown_mm,
            locked_build_out_per_side_mm: Some(build_out_per_side_mm),
            fixed_door_height_mm: FIXED_DOOR_HEIGHT_MM,
            fixed_width_selectable: false,
        }
    }
}

/// The built-in rule for a housebuilder.
pub fn builtin_rule(housebuilder: Housebuilder) -> HousebuilderRule {
    match housebuilder {
        Housebuilder::Avant => HousebuilderRule {
            fixed_width_selectable: true,
            ..HousebuilderRule::open(90.0)
        },
        Housebuilder::HomesByHoney => HousebuilderRule::open(90.0),
        Housebuilder::Bloor => HousebuilderRule::open(108.0),
        Housebuilder::Story | Housebuilder::Strata | Housebuilder::JonesHomes => {
            HousebuilderRule::locked(50.0, 50.0)
        }
        Housebuilder::Standard => HousebuilderRule::open(108.0),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Door styles
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorStyle {
    Classic,
    Shaker,
    Heritage,
    Contour,
}

impl DoorStyle {
    /// Distance two adjacent doors overlap where they meet.
    pub fn overlap_per_meeting_mm(self) -> f64 {
        match self {
            DoorStyle::Classic => 35.0,
            DoorStyle::Shaker => 75.0,
            DoorStyle::Heritage => 25.0,
            DoorStyle::Contour => 36.0,
        }
    }
}

impl Vocabulary for DoorStyle {
    const KIND: &'static str = "door_style";

    fn options() -> &'static [Self] {
        &[
            DoorStyle::Classic,
            DoorStyle::Shaker,
            DoorStyle::Heritage,
            DoorStyle::Contour,
        ]
    }

    fn label(self) -> &'static str {
        match self {
            DoorStyle::Classic => "Classic",
            DoorStyle::Shaker => "Shaker",
            DoorStyle::Heritage => "Heritage",
            DoorStyle::Contour => "Contour",
        }
    }

    fn fallback() -> Self {
        DoorStyle::Classic
    }
}

impl fmt::Display for DoorStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Door systems
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorSystem {
    /// Doors cut to the opening; dropdown fixed by the housebuilder.
    #[serde(rename = "Made to measure")]
    MadeToMeasure,
    /// Off-the-shelf doors; build-out and dropdown are solved to fit them.
    #[serde(rename = "Fixed size")]
    FixedSize,
}

impl Vocabulary for DoorSystem {
    const KIND: &'static str = "door_system";

    fn options() -> &'static [Self] {
        &[DoorSystem::MadeToMeasure, DoorSystem::FixedSize]
    }

    fn label(self) -> &'static str {
        match self {
            DoorSystem::MadeToMeasure => "Made to measure",
            DoorSystem::FixedSize => "Fixed size",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            DoorSystem::MadeToMeasure => &["mtm", "made to measure doors"],
            DoorSystem::FixedSize => &["fixed", "fixed 2223mm doors", "fixed size doors"],
        }
    }

    fn fallback() -> Self {
        DoorSystem::MadeToMeasure
    }
}

impl fmt::Display for DoorSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fixed door widths
// ────────────────────────────────────────────────────────────────────────────

/// Widths the fixed-size door system is stocked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum FixedDoorWidth {
    W610,
    #[default]
    W762,
    W914,
}

impl FixedDoorWidth {
    pub const OPTIONS: [FixedDoorWidth; 3] =
        [FixedDoorWidth::W610, FixedDoorWidth::W762, FixedDoorWidth::W914];

    pub fn mm(self) -> u32 {
        match self {
            FixedDoorWidth::W610 => 610,
            FixedDoorWidth::W762 => 762,
            FixedDoorWidth::W914 => 914,
        }
    }

    pub fn from_mm(mm: u32) -> Option<Self> {
        Self::OPTIONS.into_iter().find(|w| w.mm() == mm)
    }

    /// Unknown or missing widths fall back to 762mm.
    pub fn from_mm_or_default(mm: Option<i64>) -> Self {
        match mm {
            None => FixedDoorWidth::default(),
            Some(mm) => u32::try_from(mm).ok().and_then(Self::from_mm).unwrap_or_else(|| {
                warn!(
                    requested_mm = mm,
                    fallback_mm = FixedDoorWidth::default().mm(),
                    "Unsupported fixed door width, using default"
                );
                FixedDoorWidth::default()
            }),
        }
    }
}

impl From<FixedDoorWidth> for u32 {
    fn from(width: FixedDoorWidth) -> u32 {
        width.mm()
    }
}

impl TryFrom<u32> for FixedDoorWidth {
    type Error = String;

    fn try_from(mm: u32) -> Result<Self, Self::Error> {
        FixedDoorWidth::from_mm(mm).ok_or_else(|| format!("{mm}mm is not a fixed door width"))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// End panels
// ────────────────────────────────────────────────────────────────────────────

/// Number of wardrobe end panels standing in for a wall at the opening sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", from = "u8")]
pub enum EndPanels {
    #[default]
    None,
    /// Fitted on the left; the right side is built out.
    One,
    Two,
}

impl EndPanels {
    /// Counts outside `0..=2` are clamped.
    pub fn from_count(count: i64) -> Self {
        match count {
            i64::MIN..=0 => EndPanels::None,
            1 => EndPanels::One,
            _ => EndPanels::Two,
        }
    }

    pub fn count(self) -> u8 {
        match self {
            EndPanels::None => 0,
            EndPanels::One => 1,
            EndPanels::Two => 2,
        }
    }
}

impl From<EndPanels> for u8 {
    fn from(panels: EndPanels) -> u8 {
        panels.count()
    }
}

impl From<u8> for EndPanels {
    fn from(count: u8) -> Self {
        EndPanels::from_count(i64::from(count))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rule book
// ────────────────────────────────────────────────────────────────────────────

/// The rule set the solver runs against. Built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct RuleBook {
    rules: HashMap<Housebuilder, HousebuilderRule>,
    floor_plan_only: HashSet<Housebuilder>,
    fixed_overlap_policy: OverlapPolicy,
}

impl RuleBook {
    /// Built-in rules, with Bloor as the only floor-plan-only housebuilder.
    pub fn builtin() -> Self {
        RuleBook {
            rules: Housebuilder::options()
                .iter()
                .map(|&hb| (hb, builtin_rule(hb)))
                .collect(),
            floor_plan_only: HashSet::from([Housebuilder::Bloor]),
            fixed_overlap_policy: OverlapPolicy::default(),
        }
    }

    /// Replaces the set of housebuilders whose openings are sized from their floor plan.
    pub fn with_floor_plan_only(mut self, housebuilders: impl IntoIterator<Item = Housebuilder>) -> Self {
        self.floor_plan_only = housebuilders.into_iter().collect();
        self
    }

    pub fn with_rule(mut self, housebuilder: Housebuilder, rule: HousebuilderRule) -> Self {
        self.rules.insert(housebuilder, rule);
        self
    }

    /// Switches the listed housebuilders to the taller fixed-size door.
    pub fn with_tall_fixed_doors(self, housebuilders: impl IntoIterator<Item = Housebuilder>) -> Self {
        housebuilders.into_iter().fold(self, |book, hb| {
            let rule = HousebuilderRule {
                fixed_door_height_mm: TALL_FIXED_DOOR_HEIGHT_MM,
                ..book.rule(hb)
            };
            book.with_rule(hb, rule)
        })
    }

    pub fn with_fixed_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.fixed_overlap_policy = policy;
        self
    }

    pub fn rule(&self, housebuilder: Housebuilder) -> HousebuilderRule {
        self.rules
            .get(&housebuilder)
            .copied()
            .unwrap_or_else(|| builtin_rule(housebuilder))
    }

    pub fn is_floor_plan_only(&self, housebuilder: Housebuilder) -> bool {
        self.floor_plan_only.contains(&housebuilder)
    }

    pub fn fixed_overlap_policy(&self) -> OverlapPolicy {
        self.fixed_overlap_policy
    }

    /// Everything an installer front-end needs to offer legal selections.
    pub fn catalog(&self) -> Catalog {
        Catalog {
            housebuilders: Housebuilder::options()
                .iter()
                .map(|&hb| {
                    let rule = self.rule(hb);
                    HousebuilderEntry {
                        name: hb.label(),
                        dropdown_mm: rule.dropdown_mm,
                        locked_build_out_per_side_mm: rule.locked_build_out_per_side_mm,
                        fixed_door_height_mm: rule.fixed_door_height_mm,
                        fixed_width_selectable: rule.fixed_width_selectable,
                        floor_plan_only: self.is_floor_plan_only(hb),
                    }
                })
                .collect(),
            door_styles: DoorStyle::options()
                .iter()
                .map(|&style| DoorStyleEntry {
                    name: style.label(),
                    overlap_per_meeting_mm: style.overlap_per_meeting_mm(),
                })
                .collect(),
            door_systems: DoorSystem::options().iter().map(|s| s.label()).collect(),
            fixed_door_widths_mm: FixedDoorWidth::OPTIONS.iter().map(|w| w.mm()).collect(),
            fixed_overlap_policy: self.fixed_overlap_policy,
            constants: Constants::default(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Catalog (serialised for the front-end)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub housebuilders: Vec<HousebuilderEntry>,
    pub door_styles: Vec<DoorStyleEntry>,
    pub door_systems: Vec<&'static str>,
    pub fixed_door_widths_mm: Vec<u32>,
    pub fixed_overlap_policy: OverlapPolicy,
    pub constants: Constants,
}

#[derive(Debug, Clone, Serialize)]
pub struct HousebuilderEntry {
    pub name: &'static str,
    pub dropdown_mm: f64,
    pub locked_build_out_per_side_mm: Option<f64>,
    pub fixed_door_height_mm: f64,
    pub fixed_width_selectable: bool,
    pub floor_plan_only: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoorStyleEntry {
    pub name: &'static str,
    pub overlap_per_meeting_mm: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Constants {
    pub bottom_liner_thickness_mm: f64,
    pub trackset_height_mm: f64,
    pub base_side_liner_thickness_mm: f64,
    pub min_t_liner_thickness_mm: f64,
    pub max_door_height_mm: f64,
    pub max_dropdown_mm: f64,
    pub min_door_count: u32,
    pub max_door_count: u32,
}

impl Default for Constants {
    fn default() -> Self {
        Constants {
            bottom_liner_thickness_mm: BOTTOM_LINER_THICKNESS_MM,
            trackset_height_mm: TRACKSET_HEIGHT_MM,
            base_side_liner_thickness_mm: BASE_SIDE_LINER_THICKNESS_MM,
            min_t_liner_thickness_mm: MIN_T_LINER_THICKNESS_MM,
            max_door_height_mm: MAX_DOOR_HEIGHT_MM,
            max_dropdown_mm: MAX_DROPDOWN_MM,
            min_door_count: MIN_DOOR_COUNT,
            max_door_count: MAX_DOOR_COUNT,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
