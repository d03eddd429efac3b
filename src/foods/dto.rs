use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// One search result, from the builtin list, the external database or the
/// local cache of earlier lookups.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FoodHit {
    pub name: String,
    pub calories: f64,
    pub protein_grams: f64,
    pub carb_grams: f64,
    pub fat_grams: f64,
    pub serving: String,
    pub source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FoodSearchResponse {
    pub query: String,
    pub results: Vec<FoodHit>,
}
