use crate::state::AppState;
use axum::routing::get;
use axum::Router;

mod dto;
pub mod handlers;
pub mod repo;
mod services;

pub fn router() -> Router<AppState> {
    Router::new().route("/food-database", get(handlers::search_food_database))
}
