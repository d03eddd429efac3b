use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use base64::Engine;
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Failure modes of the generative-model call. Every variant is absorbed
/// into the fallback estimate by the caller; none reaches the client.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model backend not configured")]
    NotConfigured,
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api returned status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("response contained no text")]
    Empty,
}

/// Seam between the normalizer and the vision/language backend, so tests
/// and keyless deployments can swap the real client out.
#[async_trait]
pub trait NutritionModel: Send + Sync {
    /// Returns the model's raw free-form text for the given prompt, with an
    /// optional image attachment (bytes + mime type).
    async fn generate(
        &self,
        prompt: &str,
        image: Option<(Bytes, String)>,
    ) -> Result<String, ModelError>;
}

/// Stand-in when no API key is present.
pub struct NullModel;

#[async_trait]
impl NutritionModel for NullModel {
    async fn generate(
        &self,
        _prompt: &str,
        _image: Option<(Bytes, String)>,
    ) -> Result<String, ModelError> {
        Err(ModelError::NotConfigured)
    }
}

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inline_data")]
        inline_data: InlineData,
    },
}

#[derive(Serialize, Deserialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Client for the Google Generative Language API.
pub struct GeminiModel {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiModel {
    /// The request timeout bounds the whole call; a slow model is treated
    /// as a failed one. Errors if the HTTP client cannot be built, rather
    /// than running without the timeout.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("build gemini http client")?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    fn url(&self) -> String {
        format!(
            "{API_BASE_URL}/models/{}:generateContent?key={}",
            self.model, self.api_key
        )
    }
}

#[async_trait]
impl NutritionModel for GeminiModel {
    async fn generate(
        &self,
        prompt: &str,
        image: Option<(Bytes, String)>,
    ) -> Result<String, ModelError> {
        let mut parts = vec![Part::Text {
            text: prompt.to_string(),
        }];
        if let Some((bytes, mime_type)) = image {
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type,
                    data: base64::engine::general_purpose::STANDARD.encode(&bytes),
                },
            });
        }
        let body = GeminiRequest {
            contents: vec![Content { parts }],
        };

        debug!(model = %self.model, "sending generateContent request");
        let response = self.client.post(self.url()).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(status = %status, "gemini api error");
            return Err(ModelError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GeminiResponse = response.json().await?;
        let text: String = parsed
            .candidates
            .into_iter()
            .flatten()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| match p {
                Part::Text { text } => Some(text),
                Part::InlineData { .. } => None,
            })
            .collect();

        if text.trim().is_empty() {
            return Err(ModelError::Empty);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_constructs_with_timeout() {
        let model = GeminiModel::new("test-key", "gemini-1.5-flash", 30)
            .expect("client with timeout should build");
        assert!(model.url().contains("gemini-1.5-flash:generateContent"));
        assert!(model.url().contains("key=test-key"));
    }

    #[tokio::test]
    async fn null_model_reports_not_configured() {
        let err = NullModel.generate("prompt", None).await.unwrap_err();
        assert!(matches!(err, ModelError::NotConfigured));
    }
}
