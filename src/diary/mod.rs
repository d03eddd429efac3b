use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;

mod dto;
pub mod handlers;
pub mod repo;
mod services;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add-food", post(handlers::add_food))
        .route("/daily-nutrition", get(handlers::daily_nutrition))
        .route("/analytics", get(handlers::analytics))
        .route(
            "/water-intake",
            post(handlers::add_water).get(handlers::get_water),
        )
}
