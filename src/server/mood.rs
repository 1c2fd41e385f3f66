//! Mood API route handlers.

use axum::extract::State;

use crate::error::AppError;
use crate::mood::{self, EmotionScoreSet, ALL_EMOTIONS};
use crate::playlist::genre_for;
use crate::types::{ListMoodsResponse, MoodInfo, ResolveMoodRequest, ResolveMoodResponse};

use super::extractors::MsgPackBody;
use super::routes::MsgPack;
use super::AppState;

/// GET /api/v1/moods
///
/// List the moods a user can pick manually.
pub async fn list_moods(State(_state): State<AppState>) -> MsgPack<ListMoodsResponse> {
    let moods = ALL_EMOTIONS
        .iter()
        .map(|e| MoodInfo {
            id: e.id().to_string(),
            name: e.display_name().to_string(),
            emoji: e.emoji().to_string(),
            genre: genre_for(e.id()).to_string(),
        })
        .collect();

    MsgPack(ListMoodsResponse { moods })
}

/// POST /api/v1/mood/resolve
///
/// Resolve raw classifier scores to a single mood. Empty or invalid score
/// sets are rejected so callers can substitute their own default.
pub async fn resolve_mood(
    State(_state): State<AppState>,
    MsgPackBody(req): MsgPackBody<ResolveMoodRequest>,
) -> Result<MsgPack<ResolveMoodResponse>, AppError> {
    let scores = EmotionScoreSet::from_raw(&req.scores)?;

    let result = match req.dominant_emotion.as_deref() {
        Some(reported) => mood::resolve_dominant(reported, &scores)?,
        None => mood::resolve(&scores)?,
    };

    Ok(MsgPack(result.into()))
}
