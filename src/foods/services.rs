use std::time::Duration;

use anyhow::Context;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::dto::FoodHit;

/// Hard cap on merged results per search.
pub const MAX_RESULTS: usize = 20;

const EXTERNAL_TIMEOUT_SECS: u64 = 10;

/// Small static list served with every search, so common foods resolve even
/// when the external database is down. Values are per typical serving.
const BUILTIN_FOODS: &[(&str, f64, f64, f64, f64, &str)] = &[
    ("Banana (medium)", 105.0, 1.0, 27.0, 0.3, "1 piece"),
    ("Apple (medium)", 95.0, 0.5, 25.0, 0.3, "1 piece"),
    ("Grilled chicken breast", 280.0, 52.0, 0.0, 6.0, "6 oz"),
    ("White rice, cooked", 200.0, 4.0, 45.0, 0.5, "1 cup"),
    ("Whole egg", 72.0, 6.3, 0.4, 4.8, "1 large"),
    ("Whole milk", 149.0, 7.7, 11.7, 7.9, "1 cup"),
    ("Oatmeal, cooked", 158.0, 6.0, 27.0, 3.2, "1 cup"),
    ("Peanut butter", 188.0, 8.0, 6.0, 16.0, "2 tbsp"),
    ("Salmon fillet", 367.0, 39.0, 0.0, 22.0, "6 oz"),
    ("Greek yogurt, plain", 100.0, 17.0, 6.0, 0.7, "170 g"),
    ("Broccoli, steamed", 55.0, 3.7, 11.2, 0.6, "1 cup"),
    ("Avocado", 240.0, 3.0, 12.8, 22.0, "1 piece"),
];

pub fn search_builtin(query: &str) -> Vec<FoodHit> {
    let needle = query.to_lowercase();
    BUILTIN_FOODS
        .iter()
        .filter(|(name, ..)| name.to_lowercase().contains(&needle))
        .map(|&(name, calories, protein, carbs, fat, serving)| FoodHit {
            name: name.to_string(),
            calories,
            protein_grams: protein,
            carb_grams: carbs,
            fat_grams: fat,
            serving: serving.to_string(),
            source: "builtin",
            external_id: None,
        })
        .collect()
}

/// Builtin matches first, then external/cached ones, capped at MAX_RESULTS.
pub fn merge_results(builtin: Vec<FoodHit>, external: Vec<FoodHit>) -> Vec<FoodHit> {
    let mut results = builtin;
    results.extend(external);
    results.truncate(MAX_RESULTS);
    results
}

#[derive(Debug, Deserialize)]
struct OffSearchResponse {
    #[serde(default)]
    products: Vec<OffProduct>,
}

#[derive(Debug, Deserialize)]
struct OffProduct {
    code: Option<String>,
    product_name: Option<String>,
    #[serde(default)]
    nutriments: OffNutriments,
}

#[derive(Debug, Default, Deserialize)]
struct OffNutriments {
    #[serde(rename = "energy-kcal_100g")]
    energy_kcal_100g: Option<f64>,
    #[serde(rename = "proteins_100g")]
    proteins_100g: Option<f64>,
    #[serde(rename = "carbohydrates_100g")]
    carbohydrates_100g: Option<f64>,
    #[serde(rename = "fat_100g")]
    fat_100g: Option<f64>,
}

/// Client for the OpenFoodFacts search API.
pub struct FoodDatabaseClient {
    client: Client,
    base_url: String,
}

impl FoodDatabaseClient {
    /// Errors if the HTTP client cannot be built, rather than running
    /// without the request timeout.
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(EXTERNAL_TIMEOUT_SECS))
            .build()
            .context("build food database http client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn search(&self, query: &str) -> anyhow::Result<Vec<FoodHit>> {
        let url = format!("{}/cgi/search.pl", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("search_terms", query),
                ("search_simple", "1"),
                ("action", "process"),
                ("json", "1"),
                ("page_size", "20"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let parsed: OffSearchResponse = response.json().await?;
        debug!(products = parsed.products.len(), "external food search returned");
        Ok(to_hits(parsed))
    }
}

fn to_hits(response: OffSearchResponse) -> Vec<FoodHit> {
    response
        .products
        .into_iter()
        .filter_map(|p| {
            let name = p.product_name.filter(|n| !n.trim().is_empty())?;
            Some(FoodHit {
                name,
                calories: p.nutriments.energy_kcal_100g.unwrap_or(0.0),
                protein_grams: p.nutriments.proteins_100g.unwrap_or(0.0),
                carb_grams: p.nutriments.carbohydrates_100g.unwrap_or(0.0),
                fat_grams: p.nutriments.fat_100g.unwrap_or(0.0),
                serving: "100g".to_string(),
                source: "openfoodfacts",
                external_id: p.code,
            })
        })
        .collect()
}
