//! API request and response types for mood and playlist operations.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::mood::{Emotion, MoodResult};
use crate::playlist::{CacheStats, Language, PlaylistEntry};
use crate::recommend::{Notice, Recommendation};

/// Request to resolve raw classifier scores into a mood
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveMoodRequest {
    /// Raw `emotion -> score` map, scores in `[0, 100]`
    pub scores: HashMap<String, f32>,

    /// Dominant label as reported by the classifier, if any
    #[serde(default)]
    pub dominant_emotion: Option<String>,
}

/// Resolved mood
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveMoodResponse {
    pub label: Emotion,
    pub confidence: f32,
}

impl From<MoodResult> for ResolveMoodResponse {
    fn from(result: MoodResult) -> Self {
        Self {
            label: result.label,
            confidence: result.confidence,
        }
    }
}

/// Request playlists for a mood label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectPlaylistsRequest {
    /// Mood label; unknown labels use the default genre
    pub mood: String,

    /// Language preference; unknown or missing means English
    #[serde(default)]
    pub language: Option<String>,
}

/// Playlists selected for a mood
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectPlaylistsResponse {
    pub mood: String,
    pub language: Language,
    /// Never empty
    pub playlists: Vec<PlaylistEntry>,
    /// True when `playlists` is exactly the default entry
    pub is_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

/// Query parameters for cache invalidation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvalidateCacheParams {
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Scope of a cache invalidation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidationScope {
    Key,
    All,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvalidateCacheResponse {
    pub scope: InvalidationScope,
    pub stats: CacheStats,
}

/// Full pipeline request: a photo or a manually chosen mood
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendRequest {
    /// Base64-encoded JPEG or PNG (upload or webcam capture)
    #[serde(default)]
    pub image_base64: Option<String>,

    /// Mood picked by the user; takes precedence over the image
    #[serde(default)]
    pub manual_mood: Option<Emotion>,

    /// Language preference; unknown or missing means English
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    #[serde(flatten)]
    pub recommendation: Recommendation,
    /// Human-readable text for each notice
    pub messages: Vec<String>,
}

impl From<Recommendation> for RecommendResponse {
    fn from(recommendation: Recommendation) -> Self {
        let messages = recommendation
            .notices
            .iter()
            .map(|n| n.message().to_string())
            .collect();
        Self {
            recommendation,
            messages,
        }
    }
}

/// Info about a selectable mood
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodInfo {
    pub id: String,
    pub name: String,
    pub emoji: String,
    /// Genre keyword used for playlist search
    pub genre: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMoodsResponse {
    pub moods: Vec<MoodInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListLanguagesResponse {
    pub languages: Vec<Language>,
    pub default: Language,
}
