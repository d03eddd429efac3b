use serde_json::Value;

use super::dto::NutritionEstimate;
use super::extract;

/// Deterministic estimate used whenever the model is unavailable or its
/// output cannot be salvaged. Constants approximate a generic single serving.
pub fn fallback(description: &str) -> NutritionEstimate {
    NutritionEstimate {
        food_description: description.to_string(),
        calories: 300.0,
        protein_grams: 15.0,
        carb_grams: 35.0,
        fat_grams: 12.0,
        quantity: 1.0,
        unit: "serving".to_string(),
        confidence: 0.6,
        fiber_grams: None,
        sugar_grams: None,
        sodium_mg: None,
        ingredients: None,
        meal_type: None,
        cooking_method: None,
        estimated_weight_g: None,
    }
}

/// Turns raw model output into a well-formed estimate. Total: every failure
/// path (no JSON found, parse error, missing or junk fields) terminates in
/// a valid estimate, never an error.
pub fn normalize(raw: &str, fallback_description: &str) -> NutritionEstimate {
    let Some(json) = extract::first_json_object(raw) else {
        return fallback(fallback_description);
    };
    let Ok(value) = serde_json::from_str::<Value>(json) else {
        return fallback(fallback_description);
    };
    from_value(&value, fallback_description)
}

fn from_value(v: &Value, fallback_description: &str) -> NutritionEstimate {
    NutritionEstimate {
        food_description: string_field(v, "food_description")
            .unwrap_or_else(|| fallback_description.to_string()),
        calories: number_field(v, "calories", 0.0),
        protein_grams: number_field(v, "protein_grams", 0.0),
        carb_grams: number_field(v, "carb_grams", 0.0),
        fat_grams: number_field(v, "fat_grams", 0.0),
        quantity: number_field(v, "quantity", 0.0),
        unit: string_field(v, "unit").unwrap_or_else(|| "serving".to_string()),
        confidence: number_field(v, "confidence", 0.75),
        fiber_grams: optional_number(v, "fiber_grams"),
        sugar_grams: optional_number(v, "sugar_grams"),
        sodium_mg: optional_number(v, "sodium_mg"),
        ingredients: string_list(v, "ingredients"),
        meal_type: string_field(v, "meal_type"),
        cooking_method: string_field(v, "cooking_method"),
        estimated_weight_g: optional_number(v, "estimated_weight_g"),
    }
}

/// Accepts JSON numbers and numeric strings; anything else coerces to the
/// field default.
fn coerce_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn number_field(v: &Value, field: &str, default: f64) -> f64 {
    v.get(field).and_then(coerce_number).unwrap_or(default)
}

fn optional_number(v: &Value, field: &str) -> Option<f64> {
    v.get(field).and_then(coerce_number)
}

fn string_field(v: &Value, field: &str) -> Option<String> {
    v.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_list(v: &Value, field: &str) -> Option<Vec<String>> {
    let items = v.get(field)?.as_array()?;
    let list: Vec<String> = items
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();
    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_response_yields_fallback() {
        let est = normalize("", "toast with jam");
        assert_eq!(est, fallback("toast with jam"));
        assert_eq!(est.calories, 300.0);
        assert_eq!(est.confidence, 0.6);
    }

    #[test]
    fn prose_without_json_yields_fallback() {
        let est = normalize("I cannot analyze this image, sorry.", "Image analysis");
        assert_eq!(est.food_description, "Image analysis");
        assert_eq!(est.protein_grams, 15.0);
    }

    #[test]
    fn malformed_json_yields_fallback() {
        let est = normalize(r#"{"calories": 200,}"#, "soup");
        assert_eq!(est, fallback("soup"));
    }

    #[test]
    fn embedded_object_is_parsed() {
        let raw = r#"Sure! Here is the analysis: {"food_description": "Grilled chicken", "calories": 280, "protein_grams": 52, "carb_grams": 0, "fat_grams": 6, "quantity": 1, "unit": "breast", "confidence": 0.9} Hope that helps!"#;
        let est = normalize(raw, "chicken");
        assert_eq!(est.food_description, "Grilled chicken");
        assert_eq!(est.calories, 280.0);
        assert_eq!(est.unit, "breast");
        assert_eq!(est.confidence, 0.9);
    }

    #[test]
    fn missing_fields_get_defaults() {
        let est = normalize(r#"{"calories": 150}"#, "apple");
        assert_eq!(est.food_description, "apple");
        assert_eq!(est.calories, 150.0);
        assert_eq!(est.protein_grams, 0.0);
        assert_eq!(est.carb_grams, 0.0);
        assert_eq!(est.fat_grams, 0.0);
        assert_eq!(est.quantity, 0.0);
        assert_eq!(est.unit, "serving");
        assert_eq!(est.confidence, 0.75);
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let est = normalize(
            r#"{"calories": "250", "protein_grams": " 12.5 ", "confidence": "0.8"}"#,
            "x",
        );
        assert_eq!(est.calories, 250.0);
        assert_eq!(est.protein_grams, 12.5);
        assert_eq!(est.confidence, 0.8);
    }

    #[test]
    fn junk_values_coerce_to_field_defaults() {
        let est = normalize(
            r#"{"calories": "lots", "protein_grams": null, "confidence": {"high": true}}"#,
            "x",
        );
        assert_eq!(est.calories, 0.0);
        assert_eq!(est.protein_grams, 0.0);
        assert_eq!(est.confidence, 0.75);
    }

    #[test]
    fn extended_fields_pass_through_when_present() {
        let raw = r#"{"calories": 400, "fiber_grams": 6, "sugar_grams": "9", "sodium_mg": 300,
                      "ingredients": ["rice", "beans"], "meal_type": "lunch",
                      "cooking_method": "steamed", "estimated_weight_g": 350}"#;
        let est = normalize(raw, "bowl");
        assert_eq!(est.fiber_grams, Some(6.0));
        assert_eq!(est.sugar_grams, Some(9.0));
        assert_eq!(est.sodium_mg, Some(300.0));
        assert_eq!(est.ingredients.as_deref(), Some(&["rice".to_string(), "beans".to_string()][..]));
        assert_eq!(est.meal_type.as_deref(), Some("lunch"));
        assert_eq!(est.cooking_method.as_deref(), Some("steamed"));
        assert_eq!(est.estimated_weight_g, Some(350.0));
    }

    #[test]
    fn extended_fields_absent_stay_none() {
        let est = normalize(r#"{"calories": 100}"#, "x");
        assert!(est.fiber_grams.is_none());
        assert!(est.ingredients.is_none());
        assert!(est.meal_type.is_none());
    }
}
