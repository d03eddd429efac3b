use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::state::AppState;

mod dto;
mod extract;
pub mod handlers;
pub mod model;
mod normalize;
mod prompt;
mod services;
pub mod tips;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze-food", post(handlers::analyze_food))
        .layer(DefaultBodyLimit::max(16 * 1024 * 1024)) // 16MB uploads
}
