pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::state::AppState;
use crate::wardrobe::handlers;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/catalog", get(handlers::handle_catalog))
        .route("/api/v1/openings/solve", post(handlers::handle_solve))
        .route("/api/v1/openings/export", post(handlers::handle_export))
        .route("/api/v1/openings/diagram", post(handlers::handle_diagram))
        .fallback(not_found)
        .with_state(state)
}
