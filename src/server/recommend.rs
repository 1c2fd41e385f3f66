//! Full pipeline route handler.

use axum::extract::State;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::classifier::ImageFormat;
use crate::error::AppError;
use crate::playlist::Language;
use crate::recommend::MoodInput;
use crate::types::{RecommendRequest, RecommendResponse};

use super::extractors::MsgPackBody;
use super::routes::MsgPack;
use super::AppState;

/// POST /api/v1/recommend
///
/// Detect a mood from a photo (or take the manual mood) and select
/// playlists for it. A manual mood wins over an image.
pub async fn recommend(
    State(state): State<AppState>,
    MsgPackBody(req): MsgPackBody<RecommendRequest>,
) -> Result<MsgPack<RecommendResponse>, AppError> {
    let language = Language::parse_lenient(req.language.as_deref().unwrap_or_default());

    let input = match (req.manual_mood, req.image_base64) {
        (Some(mood), _) => MoodInput::Manual(mood),
        (None, Some(encoded)) => MoodInput::Image(decode_image(&encoded)?),
        (None, None) => {
            return Err(AppError::BadRequest(
                "Either image_base64 or manual_mood must be provided".to_string(),
            ))
        }
    };

    let recommendation = state.recommender.recommend(input, language).await;
    Ok(MsgPack(recommendation.into()))
}

/// Decode a base64 image (optionally a `data:` URI) and check its format
fn decode_image(encoded: &str) -> Result<Vec<u8>, AppError> {
    let encoded = encoded.trim();
    let payload = match encoded.strip_prefix("data:") {
        Some(uri) => uri.split_once(',').map(|(_, data)| data).unwrap_or(""),
        None => encoded,
    };

    let image = BASE64
        .decode(payload)
        .map_err(|e| AppError::BadRequest(format!("Invalid base64 image: {e}")))?;

    ImageFormat::detect(&image).map_err(|e| AppError::UnsupportedMedia(e.to_string()))?;

    Ok(image)
}
