use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use tracing::{instrument, warn};

use crate::app::internal;
use crate::auth::AuthUser;
use crate::state::AppState;

use super::dto::{FoodSearchResponse, SearchQuery};
use super::services::{self, FoodDatabaseClient, MAX_RESULTS};
use super::repo;

/// GET /food-database?q=: builtin list plus external search, capped at 20.
/// An external outage never fails the request; cached lookups fill in.
#[instrument(skip(state))]
pub async fn search_food_database(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<SearchQuery>,
) -> Result<Json<FoodSearchResponse>, (StatusCode, String)> {
    let query = q.q.trim().to_string();
    if query.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "q cannot be empty".into()));
    }
    tracing::debug!(user_id = %user_id, query = %query, "food database search");

    let builtin = services::search_builtin(&query);

    let client = FoodDatabaseClient::new(&state.config.food_api_base).map_err(internal)?;
    let external = match client.search(&query).await {
        Ok(hits) => {
            if let Err(e) = repo::upsert_cached(&state.db, &hits).await {
                warn!(error = %e, "caching food lookups failed");
            }
            hits
        }
        Err(e) => {
            warn!(error = %e, "external food search failed, falling back to cache");
            repo::search_cached(&state.db, &query, MAX_RESULTS as i64)
                .await
                .unwrap_or_default()
        }
    };

    Ok(Json(FoodSearchResponse {
        query,
        results: services::merge_results(builtin, external),
    }))
}
