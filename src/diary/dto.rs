use serde::{Deserialize, Serialize};
use time::Date;

use crate::auth::dto::Goals;
use crate::diary::repo::FoodEntry;

/// Request body for logging one food item. Date defaults to today (UTC).
#[derive(Debug, Deserialize)]
pub struct AddFoodRequest {
    pub food_description: String,
    pub calories: f64,
    pub protein_grams: f64,
    pub carb_grams: f64,
    pub fat_grams: f64,
    pub fiber_grams: Option<f64>,
    pub sugar_grams: Option<f64>,
    pub sodium_mg: Option<f64>,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default = "default_meal_type")]
    pub meal_type: String,
    #[serde(default = "default_source")]
    pub source: String,
    pub external_id: Option<String>,
    pub date: Option<Date>,
}

fn default_quantity() -> f64 {
    1.0
}
fn default_unit() -> String {
    "serving".into()
}
fn default_confidence() -> f64 {
    0.75
}
fn default_meal_type() -> String {
    "other".into()
}
fn default_source() -> String {
    "manual".into()
}

#[derive(Debug, Serialize)]
pub struct AddFoodResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<Date>,
}

/// Summed macros for one (user, date).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Serialize)]
pub struct DailyResponse {
    pub date: Date,
    pub nutrition: Totals,
    pub food_entries: Vec<FoodEntry>,
    pub goals: Goals,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(default = "default_days")]
    pub days: i64,
}

fn default_days() -> i64 {
    7
}

/// Per-day sums plus how many entries were logged that day.
#[derive(Debug, Clone, Copy, Serialize, sqlx::FromRow)]
pub struct DaySummary {
    pub date: Date,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub meal_count: i64,
}

/// Averages over the per-day sums, not over individual entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Averages {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub meals_per_day: f64,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TopFood {
    pub food_description: String,
    pub times_logged: i64,
    pub avg_calories: f64,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct MealTypeBreakdown {
    pub meal_type: String,
    pub entry_count: i64,
    pub total_calories: f64,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub start_date: Date,
    pub end_date: Date,
    pub daily: Vec<DaySummary>,
    pub averages: Averages,
    pub top_foods: Vec<TopFood>,
    pub meal_types: Vec<MealTypeBreakdown>,
}

#[derive(Debug, Deserialize)]
pub struct AddWaterRequest {
    pub amount_ml: f64,
    pub date: Option<Date>,
}

#[derive(Debug, Serialize)]
pub struct WaterResponse {
    pub date: Date,
    pub total_ml: f64,
    pub goal_ml: f64,
}
