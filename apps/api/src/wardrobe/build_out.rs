//! Side build-out resolver.
//!
//! Decides how much packing goes on each side of the aperture. Liner stock only
//! comes as a bare 18mm section or an 18mm section plus a T-liner of at least
//! 50mm, so a side needing anything in between is rounded up to 68mm.
//!
//! # Rule priority
//! 1. Two end panels: both sides bare 18mm.
//! 2. One end panel (left): left bare; right takes the locked total, or for
//!    fixed-size doors the solved remainder.
//! 3. Locked housebuilder: both sides forced to the locked total.
//! 4. Made to measure: both sides bare.
//! 5. Fixed-size doors: required build-out split evenly, each side through the
//!    T-liner rule.

use crate::wardrobe::rules::{
    EndPanels, HousebuilderRule, BASE_SIDE_LINER_THICKNESS_MM, MIN_T_LINER_THICKNESS_MM,
    SPAN_TOLERANCE_MM,
};
use crate::wardrobe::status::WidthStatus;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Build-out on one side of the opening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideBuildOut {
    /// Total thickness including the 18mm liner.
    pub total_mm: f64,
    /// T-liner part of `total_mm`; zero for a bare liner.
    pub t_liner_mm: f64,
}

impl SideBuildOut {
    pub const BARE: SideBuildOut = SideBuildOut {
        total_mm: BASE_SIDE_LINER_THICKNESS_MM,
        t_liner_mm: 0.0,
    };

    /// A housebuilder-mandated total, taken as-is.
    pub fn locked(total_mm: f64) -> Self {
        SideBuildOut {
            total_mm,
            t_liner_mm: (total_mm - BASE_SIDE_LINER_THICKNESS_MM).max(0.0),
        }
    }
}

/// What the resolver is sizing for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuildOutMode {
    MadeToMeasure,
    /// Fixed-size doors: build-out is solved so the door run covers the opening.
    FixedSize {
        door_span_mm: f64,
        total_overlap_mm: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildOut {
    pub left: SideBuildOut,
    pub right: SideBuildOut,
    pub net_width_mm: f64,
    pub status: WidthStatus,
}

// ────────────────────────────────────────────────────────────────────────────
// Core functions
// ────────────────────────────────────────────────────────────────────────────

/// Converts the build-out a side needs into one that can be fabricated.
pub fn apply_t_liner_rule(needed_mm: f64) -> SideBuildOut {
    if needed_mm <= BASE_SIDE_LINER_THICKNESS_MM {
        return SideBuildOut::BARE;
    }
    let t_liner_mm = (needed_mm - BASE_SIDE_LINER_THICKNESS_MM).max(MIN_T_LINER_THICKNESS_MM);
    SideBuildOut {
        total_mm: BASE_SIDE_LINER_THICKNESS_MM + t_liner_mm,
        t_liner_mm,
    }
}

/// Left + right build-out that makes a fixed door run fit `width_mm`.
///
/// `width - (door_span - total_overlap)`. May be negative when the doors are
/// wider than the opening.
pub fn required_build_out_mm(width_mm: f64, door_span_mm: f64, total_overlap_mm: f64) -> f64 {
    width_mm - (door_span_mm - total_overlap_mm)
}

pub fn resolve_build_out(
    rule: &HousebuilderRule,
    end_panels: EndPanels,
    width_mm: f64,
    mode: BuildOutMode,
) -> BuildOut {
    let (left, right) = match end_panels {
        EndPanels::Two => (SideBuildOut::BARE, SideBuildOut::BARE),
        EndPanels::One => {
            let right = match (rule.locked_build_out_per_side_mm, mode) {
                (Some(locked), _) => SideBuildOut::locked(locked),
                (None, BuildOutMode::MadeToMeasure) => SideBuildOut::BARE,
                (
                    None,
                    BuildOutMode::FixedSize {
                        door_span_mm,
                        total_overlap_mm,
                        ..
                    },
                ) => {
                    let required = required_build_out_mm(width_mm, door_span_mm, total_overlap_mm);
                    apply_t_liner_rule((required - BASE_SIDE_LINER_THICKNESS_MM).ceil())
                }
            };
            (SideBuildOut::BARE, right)
        }
        EndPanels::None => match (rule.locked_build_out_per_side_mm, mode) {
            (Some(locked), _) => (SideBuildOut::locked(locked), SideBuildOut::locked(locked)),
            (None, BuildOutMode::MadeToMeasure) => (SideBuildOut::BARE, SideBuildOut::BARE),
            (
                None,
                BuildOutMode::FixedSize {
                    door_span_mm,
                    total_overlap_mm,
                    ..
                },
            ) => {
                let required = required_build_out_mm(width_mm, door_span_mm, total_overlap_mm);
                if required <= 2.0 * BASE_SIDE_LINER_THICKNESS_MM {
                    (SideBuildOut::BARE, SideBuildOut::BARE)
                } else {
                    // Whole-mm stock: round the half up rather than under-build.
                    let side = apply_t_liner_rule((required / 2.0).ceil());
                    (side, side)
                }
            }
        },
    };

    let net_width_mm = width_mm - left.total_mm - right.total_mm;
    let status = width_status(net_width_mm, mode);

    BuildOut {
        left,
        right,
        net_width_mm,
        status,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

fn width_status(net_width_mm: f64, mode: BuildOutMode) -> WidthStatus {
    if net_width_mm <= 0.0 {
        return WidthStatus::NoNetWidth { net_width_mm };
    }
    match mode {
        BuildOutMode::MadeToMeasure => WidthStatus::Ok,
        BuildOutMode::FixedSize {
            door_span_mm,
            total_overlap_mm,
        } => {
            // Positive: door run longer than the net opening needs.
            let span_diff = door_span_mm - (net_width_mm + total_overlap_mm);
            if span_diff < -SPAN_TOLERANCE_MM {
                WidthStatus::TooWide {
                    shortfall_mm: -span_diff,
                }
            } else if span_diff > SPAN_TOLERANCE_MM {
                WidthStatus::TooNarrow {
                    excess_mm: span_diff,
                }
            } else {
                WidthStatus::Ok
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wardrobe::rules::{builtin_rule, Housebuilder};

    fn fixed(door_count: u32, door_width_mm: f64, total_overlap_mm: f64) -> BuildOutMode {
        BuildOutMode::FixedSize {
            door_span_mm: f64::from(door_count) * door_width_mm,
            total_overlap_mm,
        }
    }

    // ── apply_t_liner_rule ──────────────────────────────────────────────────

    #[test]
    fn test_t_liner_rule_bare_up_to_18() {
        assert_eq!(apply_t_liner_rule(18.0), SideBuildOut::BARE);
        assert_eq!(apply_t_liner_rule(3.0), SideBuildOut::BARE);
        assert_eq!(apply_t_liner_rule(-40.0), SideBuildOut::BARE);
    }

    #[test]
    fn test_t_liner_rule_jumps_to_minimum_section() {
        let side = apply_t_liner_rule(18.001);
        assert_eq!(side.total_mm, 68.0);
        assert_eq!(side.t_liner_mm, 50.0);
    }

    #[test]
    fn test_t_liner_rule_above_minimum_is_exact() {
        let side = apply_t_liner_rule(80.0);
        assert_eq!(side.total_mm, 80.0);
        assert_eq!(side.t_liner_mm, 62.0);
    }

    // ── end panels ──────────────────────────────────────────────────────────

    #[test]
    fn test_two_end_panels_always_bare() {
        for hb in [Housebuilder::Story, Housebuilder::Avant, Housebuilder::Standard] {
            let rule = builtin_rule(hb);
            for mode in [BuildOutMode::MadeToMeasure, fixed(3, 762.0, 70.0)] {
                let out = resolve_build_out(&rule, EndPanels::Two, 2400.0, mode);
                assert_eq!(out.left, SideBuildOut::BARE, "{hb:?}");
                assert_eq!(out.right, SideBuildOut::BARE, "{hb:?}");
            }
        }
    }

    #[test]
    fn test_one_end_panel_takes_locked_total_on_other_side() {
        let rule = builtin_rule(Housebuilder::Story);
        let out = resolve_build_out(&rule, EndPanels::One, 2200.0, BuildOutMode::MadeToMeasure);
        assert_eq!(out.left, SideBuildOut::BARE);
        assert_eq!(out.right.total_mm, 50.0);
        assert_eq!(out.right.t_liner_mm, 32.0);
        assert_eq!(out.net_width_mm, 2132.0);
    }

    #[test]
    fn test_one_end_panel_solves_remainder_for_fixed_doors() {
        // required = 2400 - (2286 - 70) = 184; left keeps 18, right needs 166
        let rule = builtin_rule(Housebuilder::Standard);
        let out = resolve_build_out(&rule, EndPanels::One, 2400.0, fixed(3, 762.0, 70.0));
        assert_eq!(out.left, SideBuildOut::BARE);
        assert_eq!(out.right.total_mm, 166.0);
        assert_eq!(out.right.t_liner_mm, 148.0);
        assert_eq!(out.net_width_mm, 2216.0);
        assert_eq!(out.status, WidthStatus::Ok);
    }

    #[test]
    fn test_one_end_panel_made_to_measure_without_lock_is_bare() {
        let rule = builtin_rule(Housebuilder::Avant);
        let out = resolve_build_out(&rule, EndPanels::One, 2000.0, BuildOutMode::MadeToMeasure);
        assert_eq!(out.left, SideBuildOut::BARE);
        assert_eq!(out.right, SideBuildOut::BARE);
    }

    // ── locked / made to measure ────────────────────────────────────────────

    #[test]
    fn test_locked_housebuilder_forces_both_sides() {
        let rule = builtin_rule(Housebuilder::JonesHomes);
        let out = resolve_build_out(&rule, EndPanels::None, 2200.0, fixed(3, 762.0, 70.0));
        assert_eq!(out.left.total_mm, 50.0);
        assert_eq!(out.right.total_mm, 50.0);
        assert_eq!(out.left.t_liner_mm, 32.0);
        assert_eq!(out.net_width_mm, 2100.0);
    }

    #[test]
    fn test_made_to_measure_without_lock_is_bare() {
        let rule = builtin_rule(Housebuilder::HomesByHoney);
        let out = resolve_build_out(&rule, EndPanels::None, 2200.0, BuildOutMode::MadeToMeasure);
        assert_eq!(out.left, SideBuildOut::BARE);
        assert_eq!(out.right, SideBuildOut::BARE);
        assert_eq!(out.net_width_mm, 2164.0);
        assert_eq!(out.status, WidthStatus::Ok);
    }

    #[test]
    fn test_made_to_measure_flags_no_net_width() {
        let rule = builtin_rule(Housebuilder::Standard);
        let out = resolve_build_out(&rule, EndPanels::None, 30.0, BuildOutMode::MadeToMeasure);
        assert_eq!(out.status, WidthStatus::NoNetWidth { net_width_mm: -6.0 });
    }

    // ── fixed-size solve ────────────────────────────────────────────────────

    #[test]
    fn test_fixed_small_requirement_stays_bare() {
        // required = 2200 - 2216 = -16 → 18/18, doors overrun 2164 + 70 by 52
        let rule = builtin_rule(Housebuilder::Standard);
        let out = resolve_build_out(&rule, EndPanels::None, 2200.0, fixed(3, 762.0, 70.0));
        assert_eq!(out.left, SideBuildOut::BARE);
        assert_eq!(out.right, SideBuildOut::BARE);
        assert_eq!(out.status, WidthStatus::TooNarrow { excess_mm: 52.0 });
    }

    #[test]
    fn test_fixed_split_applies_t_liner_minimum() {
        // required = 2260 - 2216 = 44 → 22 per side → 68mm sections
        let rule = builtin_rule(Housebuilder::Standard);
        let out = resolve_build_out(&rule, EndPanels::None, 2260.0, fixed(3, 762.0, 70.0));
        assert_eq!(out.left.total_mm, 68.0);
        assert_eq!(out.right.t_liner_mm, 50.0);
        assert_eq!(out.net_width_mm, 2124.0);
        // 2286 - (2124 + 70): the 50mm minimum section overshoots
        assert_eq!(out.status, WidthStatus::TooNarrow { excess_mm: 92.0 });
    }

    #[test]
    fn test_fixed_split_balances_span_exactly() {
        // required = 2400 - 2216 = 184 → 92 per side
        let rule = builtin_rule(Housebuilder::Standard);
        let out = resolve_build_out(&rule, EndPanels::None, 2400.0, fixed(3, 762.0, 70.0));
        assert_eq!(out.left.total_mm, 92.0);
        assert_eq!(out.right.total_mm, 92.0);
        assert_eq!(out.net_width_mm + 70.0, 2286.0);
        assert_eq!(out.status, WidthStatus::Ok);
    }

    #[test]
    fn test_fixed_odd_requirement_rounds_each_side_up() {
        // required = 2321 - 2216 = 105 → 52.5 → 53 per side
        let rule = builtin_rule(Housebuilder::Standard);
        let out = resolve_build_out(&rule, EndPanels::None, 2321.0, fixed(3, 762.0, 70.0));
        assert_eq!(out.left.total_mm, 68.0);
        assert_eq!(out.net_width_mm, 2185.0);

        // required = 2357 - 2216 = 141 → 70.5 → 71 per side, above the T-liner floor
        let out = resolve_build_out(&rule, EndPanels::None, 2357.0, fixed(3, 762.0, 70.0));
        assert_eq!(out.left.total_mm, 71.0);
        assert_eq!(out.right.total_mm, 71.0);
        // rounding up leaves the doors 1mm long, inside tolerance
        assert_eq!(out.status, WidthStatus::Ok);
    }

    #[test]
    fn test_fixed_locked_sides_can_leave_doors_short() {
        let rule = builtin_rule(Housebuilder::Strata);
        let out = resolve_build_out(&rule, EndPanels::None, 3000.0, fixed(3, 762.0, 70.0));
        assert_eq!(out.status, WidthStatus::TooWide { shortfall_mm: 684.0 });
    }

    #[test]
    fn test_fixed_two_end_panels_can_leave_doors_short() {
        let rule = builtin_rule(Housebuilder::Standard);
        let out = resolve_build_out(&rule, EndPanels::Two, 2400.0, fixed(3, 762.0, 70.0));
        assert_eq!(out.status, WidthStatus::TooWide { shortfall_mm: 148.0 });
    }

    #[test]
    fn test_fixed_door_wider_than_opening_is_too_narrow() {
        // 1524 - (664 + 35)
        let rule = builtin_rule(Housebuilder::Standard);
        let out = resolve_build_out(&rule, EndPanels::None, 700.0, fixed(2, 762.0, 35.0));
        assert_eq!(out.status, WidthStatus::TooNarrow { excess_mm: 825.0 });
    }

    #[test]
    fn test_fixed_door_run_far_wider_than_opening() {
        // three 762mm doors in a 964mm net opening
        let rule = builtin_rule(Housebuilder::Standard);
        let out = resolve_build_out(&rule, EndPanels::None, 1000.0, fixed(3, 762.0, 70.0));
        assert_eq!(out.net_width_mm, 964.0);
        assert_eq!(out.status, WidthStatus::TooNarrow { excess_mm: 1252.0 });
    }

    #[test]
    fn test_fixed_span_tolerance_boundaries() {
        let rule = builtin_rule(Housebuilder::Standard);
        let doors = fixed(3, 762.0, 70.0);

        // bare/bare: span_diff = 2286 - (width - 36 + 70) = 2252 - width
        let at_limit = resolve_build_out(&rule, EndPanels::None, 2247.0, doors);
        assert_eq!(at_limit.status, WidthStatus::Ok);
        let over = resolve_build_out(&rule, EndPanels::None, 2246.0, doors);
        assert_eq!(over.status, WidthStatus::TooNarrow { excess_mm: 6.0 });

        // end panels pin both sides bare, so the doors can fall short
        let at_limit = resolve_build_out(&rule, EndPanels::Two, 2257.0, doors);
        assert_eq!(at_limit.status, WidthStatus::Ok);
        let short = resolve_build_out(&rule, EndPanels::Two, 2258.0, doors);
        assert_eq!(short.status, WidthStatus::TooWide { shortfall_mm: 6.0 });
    }

    #[test]
    fn test_required_build_out_formula() {
        assert_eq!(required_build_out_mm(2400.0, 2286.0, 70.0), 184.0);
        assert_eq!(required_build_out_mm(2200.0, 2286.0, 70.0), -16.0);
    }
}
