//! Axum route handlers for the opening calculator API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::state::AppState;
use crate::wardrobe::diagram::{render_elevation, render_guidance, DiagramInput};
use crate::wardrobe::export::{to_csv_string, ExportRecord};
use crate::wardrobe::notes::specification_notes;
use crate::wardrobe::opening::{Opening, OpeningRequest};
use crate::wardrobe::rules::Catalog;
use crate::wardrobe::solver::{solve, Outcome};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SolveResponse {
    pub opening: Opening,
    pub result: Outcome,
    pub notes: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/catalog
///
/// Legal selections and constants for the installer front-end.
pub async fn handle_catalog(State(state): State<AppState>) -> Json<Catalog> {
    Json(state.rules.catalog())
}

/// POST /api/v1/openings/solve
pub async fn handle_solve(
    State(state): State<AppState>,
    payload: Result<Json<OpeningRequest>, JsonRejection>,
) -> Result<Json<SolveResponse>, AppError> {
    let Json(request) = payload?;
    let opening = Opening::from_request(&request)?;
    let result = solve(&opening, &state.rules);
    let notes = specification_notes(&opening, &state.rules);

    Ok(Json(SolveResponse {
        opening,
        result,
        notes,
    }))
}

/// POST /api/v1/openings/export
///
/// One-row CSV of the opening and its result.
pub async fn handle_export(
    State(state): State<AppState>,
    payload: Result<Json<OpeningRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    let opening = Opening::from_request(&request)?;
    let outcome = solve(&opening, &state.rules);
    let csv = to_csv_string(&ExportRecord::new(&opening, &outcome))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"opening.csv\"",
            ),
        ],
        csv,
    ))
}

/// POST /api/v1/openings/diagram
///
/// Front elevation as SVG, or the floor-plan notice for floor-plan-only housebuilders.
pub async fn handle_diagram(
    State(state): State<AppState>,
    payload: Result<Json<OpeningRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    let opening = Opening::from_request(&request)?;
    let svg = match solve(&opening, &state.rules) {
        Outcome::Sized(result) => render_elevation(&DiagramInput::new(&opening, &result)),
        Outcome::FloorPlan(guidance) => render_guidance(&guidance),
    };

    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}
