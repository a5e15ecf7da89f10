//! Opening solver.
//!
//! Branches once on the door system:
//! - made to measure: dropdown comes from the housebuilder rule, doors fill the rest;
//! - fixed size: door height and width are stock sizes, build-out and dropdown are
//!   solved around them.
//!
//! Floor-plan-only housebuilders are never sized here. The solver is total: every
//! infeasible opening comes back as a `Check` result with a status saying why.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::wardrobe::build_out::{resolve_build_out, BuildOutMode};
use crate::wardrobe::opening::Opening;
use crate::wardrobe::overlap::{meeting_overlap_count, total_overlap_mm};
use crate::wardrobe::rules::{
    DoorSystem, FixedDoorWidth, Housebuilder, HousebuilderRule, RuleBook, HEIGHT_STACK_MM,
    MAX_DOOR_HEIGHT_MM, MAX_DROPDOWN_MM,
};
use crate::wardrobe::status::{HeightStatus, IssueFlag, WidthStatus};

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// Sized result for an opening.
///
/// `net_width_mm = width - side_left_mm - side_right_mm` always holds. For made
/// to measure, `door_width_mm * door_count = net_width_mm + total_overlap_mm` up
/// to the 0.1mm rounding of `door_width_mm`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    pub door_height_mm: f64,
    /// Per door, rounded to 0.1mm. See [`SolveResult::door_width_display_mm`].
    pub door_width_mm: f64,
    pub dropdown_height_mm: f64,
    pub side_left_mm: f64,
    pub side_right_mm: f64,
    pub t_liner_left_mm: f64,
    pub t_liner_right_mm: f64,
    pub net_width_mm: f64,
    pub overlaps_count: u32,
    pub overlap_per_meeting_mm: f64,
    pub total_overlap_mm: f64,
    pub door_span_mm: f64,
    /// `door_span - (net_width + total_overlap)`. Positive is extra overlap,
    /// negative is an uncovered gap.
    pub span_diff_mm: f64,
    /// Whether the requested fixed door width was used (fixed size only).
    pub fixed_width_selected: bool,
    pub width_status: WidthStatus,
    pub height_status: HeightStatus,
    pub overall_issue_flag: IssueFlag,
}

impl SolveResult {
    /// Whole-mm door width for the installer, half rounded away from zero.
    pub fn door_width_display_mm(&self) -> i64 {
        self.door_width_mm.round() as i64
    }
}

/// Returned instead of sizes for housebuilders whose openings come from their floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorPlanGuidance {
    pub housebuilder: Housebuilder,
    pub dropdown_height_mm: f64,
    pub door_height_mm: f64,
    pub message: String,
    pub overall_issue_flag: IssueFlag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Sized(SolveResult),
    FloorPlan(FloorPlanGuidance),
}

impl Outcome {
    pub fn issue_flag(&self) -> IssueFlag {
        match self {
            Outcome::Sized(result) => result.overall_issue_flag,
            Outcome::FloorPlan(guidance) => guidance.overall_issue_flag,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry point
// ────────────────────────────────────────────────────────────────────────────

pub fn solve(opening: &Opening, rules: &RuleBook) -> Outcome {
    let rule = rules.rule(opening.housebuilder);

    if rules.is_floor_plan_only(opening.housebuilder) {
        debug!(housebuilder = %opening.housebuilder, "Floor-plan-only housebuilder, not sizing");
        return Outcome::FloorPlan(floor_plan_guidance(opening.housebuilder, &rule));
    }

    let result = match opening.door_system {
        DoorSystem::MadeToMeasure => solve_made_to_measure(opening, &rule),
        DoorSystem::FixedSize => solve_fixed_size(opening, &rule, rules),
    };

    debug!(
        width_mm = opening.width_mm,
        height_mm = opening.height_mm,
        doors = opening.door_count,
        system = %opening.door_system,
        door_width_mm = result.door_width_mm,
        door_height_mm = result.door_height_mm,
        flag = %result.overall_issue_flag,
        "Opening solved"
    );
    if result.overall_issue_flag == IssueFlag::Check {
        warn!(
            housebuilder = %opening.housebuilder,
            width_status = %result.width_status,
            height_status = %result.height_status,
            "Opening needs checking"
        );
    }

    Outcome::Sized(result)
}

// ────────────────────────────────────────────────────────────────────────────
// Door systems
// ────────────────────────────────────────────────────────────────────────────

fn solve_made_to_measure(opening: &Opening, rule: &HousebuilderRule) -> SolveResult {
    let width = f64::from(opening.width_mm);
    let height = f64::from(opening.height_mm);
    let doors = f64::from(opening.door_count);

    let dropdown = rule.dropdown_mm.min(MAX_DROPDOWN_MM);
    let build_out = resolve_build_out(rule, opening.end_panels, width, BuildOutMode::MadeToMeasure);

    let raw_door_height = height - HEIGHT_STACK_MM - dropdown;
    let (door_height, height_status) = if raw_door_height < 0.0 {
        (
            0.0,
            HeightStatus::TooShort {
                shortfall_mm: -raw_door_height,
            },
        )
    } else if raw_door_height > MAX_DOOR_HEIGHT_MM {
        (
            MAX_DOOR_HEIGHT_MM,
            HeightStatus::DoorHeightCapped {
                required_mm: raw_door_height,
                max_mm: MAX_DOOR_HEIGHT_MM,
            },
        )
    } else {
        (raw_door_height, HeightStatus::Ok)
    };

    let overlaps = meeting_overlap_count(opening.door_count);
    let total_overlap = total_overlap_mm(opening.door_count, opening.door_style);
    let door_span = (build_out.net_width_mm + total_overlap).max(0.0);
    let door_width = door_span / doors;

    let overall_issue_flag = IssueFlag::from_statuses(&build_out.status, &height_status);

    SolveResult {
        door_height_mm: door_height,
        door_width_mm: round_tenth(door_width),
        dropdown_height_mm: dropdown,
        side_left_mm: build_out.left.total_mm,
        side_right_mm: build_out.right.total_mm,
        t_liner_left_mm: build_out.left.t_liner_mm,
        t_liner_right_mm: build_out.right.t_liner_mm,
        net_width_mm: build_out.net_width_mm,
        overlaps_count: overlaps,
        overlap_per_meeting_mm: opening.door_style.overlap_per_meeting_mm(),
        total_overlap_mm: total_overlap,
        door_span_mm: door_span,
        span_diff_mm: door_span - (build_out.net_width_mm + total_overlap),
        fixed_width_selected: false,
        width_status: build_out.status,
        height_status,
        overall_issue_flag,
    }
}

fn solve_fixed_size(opening: &Opening, rule: &HousebuilderRule, rules: &RuleBook) -> SolveResult {
    let width = f64::from(opening.width_mm);
    let height = f64::from(opening.height_mm);

    let door_height = rule.fixed_door_height_mm;
    let (door_width, fixed_width_selected) = if rule.fixed_width_selectable {
        (opening.fixed_door_width, true)
    } else {
        (FixedDoorWidth::default(), false)
    };
    let door_width = f64::from(door_width.mm());
    let door_span = f64::from(opening.door_count) * door_width;

    let total_overlap = rules
        .fixed_overlap_policy()
        .total_overlap_mm(opening.door_count, opening.door_style);

    let build_out = resolve_build_out(
        rule,
        opening.end_panels,
        width,
        BuildOutMode::FixedSize {
            door_span_mm: door_span,
            total_overlap_mm: total_overlap,
        },
    );

    let raw_dropdown = height - HEIGHT_STACK_MM - door_height;
    let dropdown = raw_dropdown.clamp(0.0, MAX_DROPDOWN_MM);
    let height_status = if raw_dropdown < 0.0 {
        HeightStatus::TooShortForFixedDoor {
            door_height_mm: door_height,
            shortfall_mm: -raw_dropdown,
        }
    } else if raw_dropdown > MAX_DROPDOWN_MM {
        HeightStatus::DropdownExceedsMax {
            required_mm: raw_dropdown,
            max_mm: MAX_DROPDOWN_MM,
        }
    } else {
        HeightStatus::Ok
    };

    let overall_issue_flag = IssueFlag::from_statuses(&build_out.status, &height_status);

    SolveResult {
        door_height_mm: door_height,
        door_width_mm: door_width,
        dropdown_height_mm: dropdown,
        side_left_mm: build_out.left.total_mm,
        side_right_mm: build_out.right.total_mm,
        t_liner_left_mm: build_out.left.t_liner_mm,
        t_liner_right_mm: build_out.right.t_liner_mm,
        net_width_mm: build_out.net_width_mm,
        overlaps_count: meeting_overlap_count(opening.door_count),
        overlap_per_meeting_mm: opening.door_style.overlap_per_meeting_mm(),
        total_overlap_mm: total_overlap,
        door_span_mm: door_span,
        span_diff_mm: door_span - (build_out.net_width_mm + total_overlap),
        fixed_width_selected,
        width_status: build_out.status,
        height_status,
        overall_issue_flag,
    }
}

fn floor_plan_guidance(housebuilder: Housebuilder, rule: &HousebuilderRule) -> FloorPlanGuidance {
    FloorPlanGuidance {
        housebuilder,
        dropdown_height_mm: rule.dropdown_mm.min(MAX_DROPDOWN_MM),
        door_height_mm: rule.fixed_door_height_mm,
        message: format!(
            "{housebuilder} openings are sized from the site floor plan. Refer to the floor plan system for door sizes; do not size doors from this calculator."
        ),
        overall_issue_flag: IssueFlag::ReferToFloorPlan,
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wardrobe::overlap::OverlapPolicy;
    use crate::wardrobe::rules::{builtin_rule, DoorStyle, EndPanels};

    fn opening(width_mm: u32, height_mm: u32, door_count: u32) -> Opening {
        Opening {
            width_mm,
            height_mm,
            door_count,
            housebuilder: Housebuilder::Standard,
            door_system: DoorSystem::MadeToMeasure,
            door_style: DoorStyle::Classic,
            end_panels: EndPanels::None,
            fixed_door_width: FixedDoorWidth::W762,
        }
    }

    fn fixed(width_mm: u32, height_mm: u32, door_count: u32) -> Opening {
        Opening {
            door_system: DoorSystem::FixedSize,
            ..opening(width_mm, height_mm, door_count)
        }
    }

    fn sized(outcome: Outcome) -> SolveResult {
        match outcome {
            Outcome::Sized(result) => result,
            Outcome::FloorPlan(guidance) => panic!("expected sizes, got {guidance:?}"),
        }
    }

    // ── made to measure ─────────────────────────────────────────────────────

    #[test]
    fn test_made_to_measure_reference_opening() {
        let result = sized(solve(&opening(2200, 2600, 3), &RuleBook::builtin()));
        assert_eq!(result.overlaps_count, 2);
        assert_eq!(result.total_overlap_mm, 70.0);
        assert_eq!(result.net_width_mm, 2164.0);
        assert_eq!(result.door_width_mm, 744.7);
        assert_eq!(result.door_width_display_mm(), 745);
        assert_eq!(result.dropdown_height_mm, 108.0);
        assert_eq!(result.door_height_mm, 2402.0);
        assert_eq!(result.height_status, HeightStatus::Ok);
        assert_eq!(result.width_status, WidthStatus::Ok);
        assert_eq!(result.overall_issue_flag, IssueFlag::Ok);
    }

    #[test]
    fn test_made_to_measure_door_widths_cover_span() {
        let rules = RuleBook::builtin();
        for doors in 2..=10 {
            for style in [DoorStyle::Classic, DoorStyle::Shaker, DoorStyle::Heritage, DoorStyle::Contour] {
                for width in [1203, 2200, 3517, 4999] {
                    let mut o = opening(width, 2400, doors);
                    o.door_style = style;
                    let r = sized(solve(&o, &rules));
                    assert!(r.net_width_mm > 0.0);
                    let covered = r.door_width_mm * f64::from(doors);
                    let needed = r.net_width_mm + r.total_overlap_mm;
                    assert!(
                        (covered - needed).abs() <= 1.0,
                        "{doors} doors, {width}mm: {covered} vs {needed}"
                    );
                    assert_eq!(
                        r.net_width_mm,
                        f64::from(width) - r.side_left_mm - r.side_right_mm
                    );
                }
            }
        }
    }

    #[test]
    fn test_made_to_measure_locked_builder_uses_locked_sides_and_dropdown() {
        let mut o = opening(2200, 2400, 2);
        o.housebuilder = Housebuilder::Story;
        let r = sized(solve(&o, &RuleBook::builtin()));
        assert_eq!(r.side_left_mm, 50.0);
        assert_eq!(r.side_right_mm, 50.0);
        assert_eq!(r.t_liner_left_mm, 32.0);
        assert_eq!(r.dropdown_height_mm, 50.0);
        assert_eq!(r.net_width_mm, 2100.0);
        // (2100 + 35) / 2
        assert_eq!(r.door_width_mm, 1067.5);
        assert_eq!(r.door_height_mm, 2400.0 - 36.0 - 54.0 - 50.0);
    }

    #[test]
    fn test_made_to_measure_caps_tall_doors() {
        let r = sized(solve(&opening(2200, 2800, 3), &RuleBook::builtin()));
        assert_eq!(r.door_height_mm, 2500.0);
        assert_eq!(
            r.height_status,
            HeightStatus::DoorHeightCapped {
                required_mm: 2602.0,
                max_mm: 2500.0
            }
        );
        assert_eq!(r.overall_issue_flag, IssueFlag::Check);
    }

    #[test]
    fn test_made_to_measure_flags_short_opening() {
        let r = sized(solve(&opening(2200, 150, 2), &RuleBook::builtin()));
        assert_eq!(r.door_height_mm, 0.0);
        assert_eq!(r.height_status, HeightStatus::TooShort { shortfall_mm: 48.0 });
        assert_eq!(r.overall_issue_flag, IssueFlag::Check);
    }

    #[test]
    fn test_made_to_measure_flags_no_net_width() {
        let r = sized(solve(&opening(20, 2400, 2), &RuleBook::builtin()));
        assert_eq!(r.net_width_mm, -16.0);
        assert!(matches!(r.width_status, WidthStatus::NoNetWidth { .. }));
        assert!(r.door_width_mm >= 0.0);
        assert_eq!(r.overall_issue_flag, IssueFlag::Check);
    }

    #[test]
    fn test_two_end_panels_ignore_locked_rule() {
        let mut o = opening(2200, 2400, 3);
        o.housebuilder = Housebuilder::JonesHomes;
        o.end_panels = EndPanels::Two;
        let r = sized(solve(&o, &RuleBook::builtin()));
        assert_eq!(r.side_left_mm, 18.0);
        assert_eq!(r.side_right_mm, 18.0);
        assert_eq!(r.t_liner_left_mm, 0.0);
        assert_eq!(r.t_liner_right_mm, 0.0);
    }

    // ── fixed size ──────────────────────────────────────────────────────────

    #[test]
    fn test_fixed_reference_opening() {
        let r = sized(solve(&fixed(2200, 2600, 3), &RuleBook::builtin()));
        assert_eq!(r.door_height_mm, 2223.0);
        assert_eq!(r.door_width_mm, 762.0);
        assert_eq!(r.door_span_mm, 2286.0);
        assert_eq!(r.side_left_mm, 18.0);
        assert_eq!(r.side_right_mm, 18.0);
        assert_eq!(r.net_width_mm, 2164.0);
        // 2164 + 70 falls short of 2286 coverage, so the doors overrun
        assert_eq!(r.span_diff_mm, 52.0);
        assert_eq!(r.width_status, WidthStatus::TooNarrow { excess_mm: 52.0 });
        assert_eq!(r.dropdown_height_mm, 287.0);
        assert_eq!(r.height_status, HeightStatus::Ok);
        assert_eq!(r.overall_issue_flag, IssueFlag::Check);
    }

    #[test]
    fn test_fixed_locked_builder_forces_sides() {
        let mut o = fixed(2200, 2600, 3);
        o.housebuilder = Housebuilder::Story;
        let r = sized(solve(&o, &RuleBook::builtin()));
        assert_eq!(r.side_left_mm, 50.0);
        assert_eq!(r.side_right_mm, 50.0);
        assert_eq!(r.net_width_mm, 2100.0);
        assert_eq!(r.width_status, WidthStatus::TooNarrow { excess_mm: 116.0 });

        let mut o = fixed(3000, 2600, 3);
        o.housebuilder = Housebuilder::Story;
        let r = sized(solve(&o, &RuleBook::builtin()));
        assert_eq!(r.width_status, WidthStatus::TooWide { shortfall_mm: 684.0 });
        assert_eq!(r.span_diff_mm, -684.0);
        assert_eq!(r.overall_issue_flag, IssueFlag::Check);
    }

    #[test]
    fn test_fixed_solves_symmetric_t_liners() {
        let r = sized(solve(&fixed(2400, 2600, 3), &RuleBook::builtin()));
        assert_eq!(r.side_left_mm, 92.0);
        assert_eq!(r.side_right_mm, 92.0);
        assert_eq!(r.t_liner_left_mm, 74.0);
        assert_eq!(r.span_diff_mm, 0.0);
        assert_eq!(r.width_status, WidthStatus::Ok);
        assert_eq!(r.overall_issue_flag, IssueFlag::Ok);
    }

    #[test]
    fn test_fixed_door_run_wider_than_opening_is_checked() {
        let r = sized(solve(&fixed(1000, 2600, 3), &RuleBook::builtin()));
        assert_eq!(r.net_width_mm, 964.0);
        assert_eq!(r.span_diff_mm, 1252.0);
        assert_eq!(r.width_status, WidthStatus::TooNarrow { excess_mm: 1252.0 });
        assert_eq!(r.overall_issue_flag, IssueFlag::Check);
    }

    #[test]
    fn test_fixed_width_selection_only_for_selectable_builders() {
        let rules = RuleBook::builtin();

        let mut o = fixed(2000, 2500, 2);
        o.fixed_door_width = FixedDoorWidth::W914;
        let r = sized(solve(&o, &rules));
        assert_eq!(r.door_width_mm, 762.0);
        assert!(!r.fixed_width_selected);

        o.housebuilder = Housebuilder::Avant;
        let r = sized(solve(&o, &rules));
        assert_eq!(r.door_width_mm, 914.0);
        assert_eq!(r.door_span_mm, 1828.0);
        assert!(r.fixed_width_selected);
    }

    #[test]
    fn test_fixed_dropdown_limits() {
        let rules = RuleBook::builtin();

        let r = sized(solve(&fixed(2200, 2300, 3), &rules));
        assert_eq!(r.dropdown_height_mm, 0.0);
        assert_eq!(
            r.height_status,
            HeightStatus::TooShortForFixedDoor {
                door_height_mm: 2223.0,
                shortfall_mm: 13.0
            }
        );

        let r = sized(solve(&fixed(2200, 2800, 3), &rules));
        assert_eq!(r.dropdown_height_mm, 400.0);
        assert_eq!(
            r.height_status,
            HeightStatus::DropdownExceedsMax {
                required_mm: 487.0,
                max_mm: 400.0
            }
        );
        assert_eq!(r.overall_issue_flag, IssueFlag::Check);
    }

    #[test]
    fn test_fixed_uses_rule_door_height() {
        let tall = HousebuilderRule {
            fixed_door_height_mm: 2313.0,
            ..builtin_rule(Housebuilder::HomesByHoney)
        };
        let rules = RuleBook::builtin().with_rule(Housebuilder::HomesByHoney, tall);
        let mut o = fixed(2200, 2600, 3);
        o.housebuilder = Housebuilder::HomesByHoney;
        let r = sized(solve(&o, &rules));
        assert_eq!(r.door_height_mm, 2313.0);
        assert_eq!(r.dropdown_height_mm, 2600.0 - 90.0 - 2313.0);
    }

    #[test]
    fn test_tall_fixed_door_override_only_touches_listed_builders() {
        let rules = RuleBook::builtin().with_tall_fixed_doors([Housebuilder::Avant]);
        let mut o = fixed(2200, 2700, 3);
        o.housebuilder = Housebuilder::Avant;
        assert_eq!(sized(solve(&o, &rules)).door_height_mm, 2313.0);

        o.housebuilder = Housebuilder::HomesByHoney;
        assert_eq!(sized(solve(&o, &rules)).door_height_mm, 2223.0);
    }

    #[test]
    fn test_fixed_tolerance_table_policy() {
        let rules = RuleBook::builtin().with_fixed_overlap_policy(OverlapPolicy::ToleranceTable);
        let r = sized(solve(&fixed(2400, 2600, 3), &rules));
        assert_eq!(r.total_overlap_mm, 150.0);
        // required = 2400 - (2286 - 150) = 264 → 132 per side
        assert_eq!(r.side_left_mm, 132.0);

        // made to measure is unaffected
        let r = sized(solve(&opening(2200, 2600, 3), &rules));
        assert_eq!(r.total_overlap_mm, 70.0);
    }

    // ── floor plan ──────────────────────────────────────────────────────────

    #[test]
    fn test_floor_plan_builder_gets_guidance_not_sizes() {
        let rules = RuleBook::builtin();
        for (width, height) in [(2200, 2600), (0, 0), (u32::MAX, 10)] {
            for system in [DoorSystem::MadeToMeasure, DoorSystem::FixedSize] {
                let mut o = opening(width, height, 3);
                o.housebuilder = Housebuilder::Bloor;
                o.door_system = system;
                let outcome = solve(&o, &rules);
                assert!(matches!(outcome, Outcome::FloorPlan(_)));
                assert_eq!(outcome.issue_flag(), IssueFlag::ReferToFloorPlan);
                let Outcome::FloorPlan(guidance) = outcome else {
                    panic!("expected floor plan guidance");
                };
                assert_eq!(guidance.dropdown_height_mm, 108.0);
                assert_eq!(guidance.door_height_mm, 2223.0);
                assert!(guidance.message.contains("floor plan"));
            }
        }
    }

    #[test]
    fn test_floor_plan_outcome_json_has_no_door_width() {
        let mut o = opening(2200, 2600, 3);
        o.housebuilder = Housebuilder::Bloor;
        let value = serde_json::to_value(solve(&o, &RuleBook::builtin())).expect("serialise");
        assert_eq!(value["outcome"], "floor_plan");
        assert!(value.get("door_width_mm").is_none());
        assert_eq!(value["overall_issue_flag"], "Refer to floor plan");
    }

    #[test]
    fn test_floor_plan_list_follows_rule_book() {
        let rules = RuleBook::builtin().with_floor_plan_only([Housebuilder::Avant]);
        let mut o = opening(2200, 2600, 3);
        o.housebuilder = Housebuilder::Bloor;
        assert!(matches!(solve(&o, &rules), Outcome::Sized(_)));
        o.housebuilder = Housebuilder::Avant;
        assert!(matches!(solve(&o, &rules), Outcome::FloorPlan(_)));
    }
}
