use serde::{Deserialize, Serialize};

/// Normalized output of the estimation pipeline. Every required field is
/// always present with a valid numeric type, whatever the model returned.
/// Lives only for the request/response cycle; persisting it is a separate
/// add-food call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionEstimate {
    pub food_description: String,
    pub calories: f64,
    pub protein_grams: f64,
    pub carb_grams: f64,
    pub fat_grams: f64,
    pub quantity: f64,
    pub unit: String,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiber_grams: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sugar_grams: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sodium_mg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooking_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_weight_g: Option<f64>,
}

/// JSON body for text-based analysis.
#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub description: String,
}

/// Estimate plus the advisory tip string.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub estimate: NutritionEstimate,
    pub nutrition_tip: &'static str,
}
