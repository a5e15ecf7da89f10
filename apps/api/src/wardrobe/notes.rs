//! Customer specification notes shown above every result.

use crate::wardrobe::opening::Opening;
use crate::wardrobe::rules::{DoorSystem, RuleBook, MAX_DROPDOWN_MM};
use crate::wardrobe::status::fmt_mm;

/// Installer banner for the housebuilder and door system of an opening.
pub fn specification_notes(opening: &Opening, rules: &RuleBook) -> Vec<String> {
    let housebuilder = opening.housebuilder;
    let rule = rules.rule(housebuilder);
    let dropdown = fmt_mm(rule.dropdown_mm.min(MAX_DROPDOWN_MM));

    if rules.is_floor_plan_only(housebuilder) {
        return vec![
            format!("CUSTOMER SPECIFICATION – {housebuilder}"),
            "Door sizes are not calculated for this housebuilder".to_string(),
            format!("Refer to the {housebuilder} floor plan for every opening"),
            format!("Dropdown {dropdown}mm; fixed door height {}mm", fmt_mm(rule.fixed_door_height_mm)),
        ];
    }

    match (opening.door_system, rule.locked_build_out_per_side_mm) {
        (DoorSystem::MadeToMeasure, Some(locked)) => vec![
            "CUSTOMER SPECIFICATION – MADE TO MEASURE DOORS".to_string(),
            format!("Housebuilder {housebuilder} mandates a fixed {dropdown}mm dropdown"),
            format!(
                "Total side build-out per side is fixed at {}mm (includes 18mm liner)",
                fmt_mm(locked)
            ),
            "Door sizes are calculated to suit the remaining opening".to_string(),
            "No adjustment is permitted.".to_string(),
        ],
        (DoorSystem::MadeToMeasure, None) => vec![
            "CUSTOMER SPECIFICATION – MADE TO MEASURE DOORS".to_string(),
            format!("Housebuilder {housebuilder} mandates a fixed {dropdown}mm dropdown"),
            "Standard 18mm liners per side".to_string(),
            "Door sizes calculated to suit net opening".to_string(),
            "Dropdown must not be altered.".to_string(),
        ],
        (DoorSystem::FixedSize, _) => vec![
            format!(
                "CUSTOMER SPECIFICATION – FIXED {}mm DOORS",
                fmt_mm(rule.fixed_door_height_mm)
            ),
            format!("Door height fixed at {}mm", fmt_mm(rule.fixed_door_height_mm)),
            "Dropdown calculated from remaining opening".to_string(),
            "Side build-out may vary".to_string(),
            "Final sizes must be checked before order.".to_string(),
        ],
    }
}
