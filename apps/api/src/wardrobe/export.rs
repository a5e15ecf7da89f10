//! Flat CSV export: one row per calculation, opening fields then result fields.
//!
//! Column headers are the field names. Floor-plan-only results leave the sizing
//! columns empty.

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::wardrobe::opening::Opening;
use crate::wardrobe::rules::Vocabulary;
use crate::wardrobe::solver::Outcome;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// One exported calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub width_mm: u32,
    pub height_mm: u32,
    pub door_count: u32,
    pub housebuilder: String,
    pub door_system: String,
    pub door_style: String,
    pub end_panel_count: u8,
    pub fixed_door_width_mm: u32,
    pub door_height_mm: Option<f64>,
    pub door_width_mm: Option<f64>,
    /// Whole-mm door width as quoted to the installer.
    pub door_width_rounded_mm: Option<i64>,
    pub dropdown_height_mm: Option<f64>,
    pub side_left_mm: Option<f64>,
    pub side_right_mm: Option<f64>,
    pub t_liner_left_mm: Option<f64>,
    pub t_liner_right_mm: Option<f64>,
    pub net_width_mm: Option<f64>,
    pub overlaps_count: Option<u32>,
    pub overlap_per_meeting_mm: Option<f64>,
    pub total_overlap_mm: Option<f64>,
    pub door_span_mm: Option<f64>,
    pub span_diff_mm: Option<f64>,
    pub fixed_width_selected: Option<bool>,
    pub width_status: Option<String>,
    pub height_status: Option<String>,
    pub overall_issue_flag: String,
    /// Guidance text for floor-plan-only housebuilders.
    pub message: Option<String>,
}

impl ExportRecord {
    pub fn new(opening: &Opening, outcome: &Outcome) -> Self {
        let mut record = ExportRecord {
            width_mm: opening.width_mm,
            height_mm: opening.height_mm,
            door_count: opening.door_count,
            housebuilder: opening.housebuilder.label().to_string(),
            door_system: opening.door_system.label().to_string(),
            door_style: opening.door_style.label().to_string(),
            end_panel_count: opening.end_panels.count(),
            fixed_door_width_mm: opening.fixed_door_width.mm(),
            door_height_mm: None,
            door_width_mm: None,
            door_width_rounded_mm: None,
            dropdown_height_mm: None,
            side_left_mm: None,
            side_right_mm: None,
            t_liner_left_mm: None,
            t_liner_right_mm: None,
            net_width_mm: None,
            overlaps_count: None,
            overlap_per_meeting_mm: None,
            total_overlap_mm: None,
            door_span_mm: None,
            span_diff_mm: None,
            fixed_width_selected: None,
            width_status: None,
            height_status: None,
            overall_issue_flag: outcome.issue_flag().to_string(),
            message: None,
        };

        match outcome {
            Outcome::Sized(result) => {
                record.door_height_mm = Some(result.door_height_mm);
                record.door_width_mm = Some(result.door_width_mm);
                record.door_width_rounded_mm = Some(result.door_width_display_mm());
                record.dropdown_height_mm = Some(result.dropdown_height_mm);
                record.side_left_mm = Some(result.side_left_mm);
                record.side_right_mm = Some(result.side_right_mm);
                record.t_liner_left_mm = Some(result.t_liner_left_mm);
                record.t_liner_right_mm = Some(result.t_liner_right_mm);
                record.net_width_mm = Some(result.net_width_mm);
                record.overlaps_count = Some(result.overlaps_count);
                record.overlap_per_meeting_mm = Some(result.overlap_per_meeting_mm);
                record.total_overlap_mm = Some(result.total_overlap_mm);
                record.door_span_mm = Some(result.door_span_mm);
                record.span_diff_mm = Some(result.span_diff_mm);
                record.fixed_width_selected = Some(result.fixed_width_selected);
                record.width_status = Some(result.width_status.to_string());
                record.height_status = Some(result.height_status.to_string());
            }
            Outcome::FloorPlan(guidance) => {
                record.door_height_mm = Some(guidance.door_height_mm);
                record.dropdown_height_mm = Some(guidance.dropdown_height_mm);
                record.message = Some(guidance.message.clone());
            }
        }

        record
    }
}

/// Writes a header row and one row per record.
pub fn write_csv<W: io::Write>(records: &[ExportRecord], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn to_csv_string(record: &ExportRecord) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(std::slice::from_ref(record), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
