use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use time::{Date, Duration, OffsetDateTime};
use tracing::{info, instrument};

use crate::app::internal;
use crate::auth::repo::User;
use crate::auth::AuthUser;
use crate::state::AppState;

use super::dto::{
    AddFoodRequest, AddFoodResponse, AddWaterRequest, AnalyticsQuery, AnalyticsResponse,
    DailyResponse, DateQuery, WaterResponse,
};
use super::{repo, services};

/// Fixed daily hydration goal, in milliliters.
const WATER_GOAL_ML: f64 = 2000.0;

const MEAL_TYPES: &[&str] = &["breakfast", "lunch", "dinner", "snack", "other"];
const SOURCES: &[&str] = &["manual", "photo", "database"];

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

#[instrument(skip(state, payload))]
pub async fn add_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AddFoodRequest>,
) -> Result<Json<AddFoodResponse>, (StatusCode, String)> {
    if payload.food_description.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "food_description cannot be empty".into(),
        ));
    }
    let macros = [
        payload.calories,
        payload.protein_grams,
        payload.carb_grams,
        payload.fat_grams,
        payload.quantity,
    ];
    let optional_macros = [payload.fiber_grams, payload.sugar_grams, payload.sodium_mg];
    if macros.iter().any(|v| *v < 0.0 || !v.is_finite())
        || optional_macros
            .iter()
            .flatten()
            .any(|v| *v < 0.0 || !v.is_finite())
    {
        return Err((
            StatusCode::BAD_REQUEST,
            "Calories and macros must be non-negative".into(),
        ));
    }
    if !(0.0..=1.0).contains(&payload.confidence) {
        return Err((
            StatusCode::BAD_REQUEST,
            "confidence must be between 0 and 1".into(),
        ));
    }
    if !MEAL_TYPES.contains(&payload.meal_type.as_str()) {
        return Err((
            StatusCode::BAD_REQUEST,
            "meal_type must be one of breakfast, lunch, dinner, snack, other".into(),
        ));
    }
    if !SOURCES.contains(&payload.source.as_str()) {
        return Err((
            StatusCode::BAD_REQUEST,
            "source must be one of manual, photo, database".into(),
        ));
    }

    let entry = repo::NewEntry {
        date: payload.date.unwrap_or_else(today),
        food_description: payload.food_description.trim().to_string(),
        calories: payload.calories,
        protein_grams: payload.protein_grams,
        carb_grams: payload.carb_grams,
        fat_grams: payload.fat_grams,
        fiber_grams: payload.fiber_grams,
        sugar_grams: payload.sugar_grams,
        sodium_mg: payload.sodium_mg,
        quantity: payload.quantity,
        unit: payload.unit,
        confidence: payload.confidence,
        meal_type: payload.meal_type,
        source: payload.source,
        external_id: payload.external_id,
    };

    repo::insert_entry(&state.db, user_id, &entry)
        .await
        .map_err(internal)?;

    info!(user_id = %user_id, date = %entry.date, calories = entry.calories, "food entry added");
    Ok(Json(AddFoodResponse {
        success: true,
        message: "Food added successfully and daily totals updated",
    }))
}

#[instrument(skip(state))]
pub async fn daily_nutrition(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<DateQuery>,
) -> Result<Json<DailyResponse>, (StatusCode, String)> {
    let date = q.date.unwrap_or_else(today);

    let nutrition = repo::daily_totals(&state.db, user_id, date)
        .await
        .map_err(internal)?;
    let food_entries = repo::entries_for_day(&state.db, user_id, date)
        .await
        .map_err(internal)?;
    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::UNAUTHORIZED, "User not found".to_string()))?;

    Ok(Json(DailyResponse {
        date,
        nutrition,
        food_entries,
        goals: user.goals(),
    }))
}

#[instrument(skip(state))]
pub async fn analytics(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsResponse>, (StatusCode, String)> {
    if !(1..=365).contains(&q.days) {
        return Err((
            StatusCode::BAD_REQUEST,
            "days must be between 1 and 365".into(),
        ));
    }

    let end_date = today();
    let start_date = end_date - Duration::days(q.days - 1);

    let daily = repo::per_day_summaries(&state.db, user_id, start_date, end_date)
        .await
        .map_err(internal)?;
    let top_foods = repo::top_foods(&state.db, user_id, start_date, end_date)
        .await
        .map_err(internal)?;
    let meal_types = repo::meal_type_breakdown(&state.db, user_id, start_date, end_date)
        .await
        .map_err(internal)?;
    let averages = services::averages(&daily);

    Ok(Json(AnalyticsResponse {
        start_date,
        end_date,
        daily,
        averages,
        top_foods,
        meal_types,
    }))
}

#[instrument(skip(state, payload))]
pub async fn add_water(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AddWaterRequest>,
) -> Result<Json<WaterResponse>, (StatusCode, String)> {
    if payload.amount_ml <= 0.0 || !payload.amount_ml.is_finite() {
        return Err((StatusCode::BAD_REQUEST, "amount_ml must be positive".into()));
    }

    let date = payload.date.unwrap_or_else(today);
    repo::add_water(&state.db, user_id, date, payload.amount_ml)
        .await
        .map_err(internal)?;
    let total_ml = repo::water_total(&state.db, user_id, date)
        .await
        .map_err(internal)?;

    info!(user_id = %user_id, %date, amount_ml = payload.amount_ml, "water intake logged");
    Ok(Json(WaterResponse {
        date,
        total_ml,
        goal_ml: WATER_GOAL_ML,
    }))
}

#[instrument(skip(state))]
pub async fn get_water(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<DateQuery>,
) -> Result<Json<WaterResponse>, (StatusCode, String)> {
    let date = q.date.unwrap_or_else(today);
    let total_ml = repo::water_total(&state.db, user_id, date)
        .await
        .map_err(internal)?;

    Ok(Json(WaterResponse {
        date,
        total_ml,
        goal_ml: WATER_GOAL_ML,
    }))
}

#[cfg(test)]
mod validation_tests {
    use super::*;
    use uuid::Uuid;

    fn request() -> AddFoodRequest {
        AddFoodRequest {
            food_description: "Oatmeal".into(),
            calories: 150.0,
            protein_grams: 5.0,
            carb_grams: 27.0,
            fat_grams: 3.0,
            fiber_grams: None,
            sugar_grams: None,
            sodium_mg: None,
            quantity: 1.0,
            unit: "serving".into(),
            confidence: 0.75,
            meal_type: "breakfast".into(),
            source: "manual".into(),
            external_id: None,
            date: None,
        }
    }

    async fn submit(payload: AddFoodRequest) -> (StatusCode, String) {
        add_food(
            axum::extract::State(AppState::fake()),
            AuthUser(Uuid::new_v4()),
            Json(payload),
        )
        .await
        .expect_err("invalid payload must be rejected")
    }

    #[tokio::test]
    async fn negative_fiber_is_rejected() {
        let mut payload = request();
        payload.fiber_grams = Some(-50.0);
        let (status, _) = submit(payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn negative_sugar_and_sodium_are_rejected() {
        let mut payload = request();
        payload.sugar_grams = Some(-1.0);
        let (status, _) = submit(payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut payload = request();
        payload.sodium_mg = Some(-0.5);
        let (status, _) = submit(payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_finite_optional_macros_are_rejected() {
        let mut payload = request();
        payload.fiber_grams = Some(f64::NAN);
        let (status, _) = submit(payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut payload = request();
        payload.sodium_mg = Some(f64::INFINITY);
        let (status, _) = submit(payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn negative_calories_are_rejected() {
        let mut payload = request();
        payload.calories = -300.0;
        let (status, _) = submit(payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
