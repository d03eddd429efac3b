use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    Json,
};
use bytes::Bytes;
use tracing::{info, instrument};

use crate::auth::AuthUser;
use crate::state::AppState;

use super::dto::{AnalyzeResponse, AnalyzeTextRequest};
use super::services::{self, AnalyzeInput};
use super::tips;

/// POST /analyze-food: multipart `image` field or JSON `{"description"}`.
/// The estimate itself can never fail; only malformed requests are 400s.
#[instrument(skip(state, req))]
pub async fn analyze_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    req: Request,
) -> Result<Json<AnalyzeResponse>, (StatusCode, String)> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let input = if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(req, &state)
            .await
            .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid multipart body".to_string()))?;
        image_input(multipart).await?
    } else if content_type.starts_with("application/json") {
        let Json(body) = Json::<AnalyzeTextRequest>::from_request(req, &state)
            .await
            .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid JSON body".to_string()))?;
        if body.description.trim().is_empty() {
            return Err((
                StatusCode::BAD_REQUEST,
                "Description cannot be empty".to_string(),
            ));
        }
        AnalyzeInput::Text(body.description)
    } else {
        return Err((
            StatusCode::BAD_REQUEST,
            "Please provide either an image or text description".to_string(),
        ));
    };

    let estimate = services::estimate(state.model.as_ref(), input).await;
    let nutrition_tip = tips::nutrition_tip(
        estimate.calories,
        estimate.protein_grams,
        estimate.carb_grams,
        estimate.fat_grams,
    );

    info!(
        user_id = %user_id,
        calories = estimate.calories,
        confidence = estimate.confidence,
        "food analyzed"
    );
    Ok(Json(AnalyzeResponse {
        estimate,
        nutrition_tip,
    }))
}

const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/gif",
    "image/webp",
];

async fn image_input(mut multipart: Multipart) -> Result<AnalyzeInput, (StatusCode, String)> {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("image") {
            continue;
        }
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "image/jpeg".to_string());
        if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
            return Err((
                StatusCode::BAD_REQUEST,
                "Invalid file type. Please upload an image.".to_string(),
            ));
        }
        let bytes: Bytes = field
            .bytes()
            .await
            .map_err(|_| (StatusCode::BAD_REQUEST, "Failed to read image".to_string()))?;
        if bytes.is_empty() {
            return Err((StatusCode::BAD_REQUEST, "No file selected".to_string()));
        }
        return Ok(AnalyzeInput::Image {
            bytes,
            content_type,
        });
    }
    Err((
        StatusCode::BAD_REQUEST,
        "Please provide either an image or text description".to_string(),
    ))
}
