use bytes::Bytes;
use tracing::warn;

use super::dto::NutritionEstimate;
use super::model::NutritionModel;
use super::{normalize, prompt};

pub enum AnalyzeInput {
    Image { bytes: Bytes, content_type: String },
    Text(String),
}

impl AnalyzeInput {
    /// Description used for the fallback estimate and for filling a missing
    /// food_description field.
    fn fallback_description(&self) -> &str {
        match self {
            AnalyzeInput::Image { .. } => "Image analysis",
            AnalyzeInput::Text(description) => description,
        }
    }
}

/// Runs the model and normalizes its output. Upstream failure is never an
/// error here: any model problem degrades to the fixed fallback estimate.
pub async fn estimate(model: &dyn NutritionModel, input: AnalyzeInput) -> NutritionEstimate {
    let response = match &input {
        AnalyzeInput::Image { bytes, content_type } => {
            model
                .generate(
                    prompt::NUTRITION_PROMPT,
                    Some((bytes.clone(), content_type.clone())),
                )
                .await
        }
        AnalyzeInput::Text(description) => {
            model.generate(&prompt::text_prompt(description), None).await
        }
    };

    match response {
        Ok(text) => normalize::normalize(&text, input.fallback_description()),
        Err(e) => {
            warn!(error = %e, "model call failed, serving fallback estimate");
            normalize::fallback(input.fallback_description())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimation::model::ModelError;
    use async_trait::async_trait;

    struct CannedModel(&'static str);

    #[async_trait]
    impl NutritionModel for CannedModel {
        async fn generate(
            &self,
            _prompt: &str,
            _image: Option<(Bytes, String)>,
        ) -> Result<String, ModelError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingModel;

    #[async_trait]
    impl NutritionModel for FailingModel {
        async fn generate(
            &self,
            _prompt: &str,
            _image: Option<(Bytes, String)>,
        ) -> Result<String, ModelError> {
            Err(ModelError::NotConfigured)
        }
    }

    #[tokio::test]
    async fn model_failure_degrades_to_fallback_with_caller_description() {
        let est = estimate(&FailingModel, AnalyzeInput::Text("ramen bowl".into())).await;
        assert_eq!(est.food_description, "ramen bowl");
        assert_eq!(est.calories, 300.0);
        assert_eq!(est.confidence, 0.6);
    }

    #[tokio::test]
    async fn image_fallback_description() {
        let input = AnalyzeInput::Image {
            bytes: Bytes::from_static(b"\xff\xd8"),
            content_type: "image/jpeg".into(),
        };
        let est = estimate(&FailingModel, input).await;
        assert_eq!(est.food_description, "Image analysis");
    }

    #[tokio::test]
    async fn canned_response_is_normalized() {
        let model = CannedModel(
            r#"Analysis complete. {"food_description": "Banana", "calories": 105, "protein_grams": 1, "carb_grams": 27, "fat_grams": 0.3, "quantity": 1, "unit": "piece", "confidence": 0.9}"#,
        );
        let est = estimate(&model, AnalyzeInput::Text("banana".into())).await;
        assert_eq!(est.food_description, "Banana");
        assert_eq!(est.calories, 105.0);
        assert_eq!(est.unit, "piece");
    }

    #[tokio::test]
    async fn unparseable_response_degrades_to_fallback() {
        let model = CannedModel("I am unable to help with that.");
        let est = estimate(&model, AnalyzeInput::Text("mystery stew".into())).await;
        assert_eq!(est.food_description, "mystery stew");
        assert_eq!(est.carb_grams, 35.0);
    }
}
