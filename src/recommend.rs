//! Caller-facing pipeline: photo or manual mood in, playlists out.
//!
//! Every failure resolves to a fallback value; callers only need the
//! attached [`Notice`]s to tell real results, default results and
//! classifier failures apart.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::classifier::{ClassifierError, EmotionClassifier};
use crate::mood::{self, Emotion, EmotionScoreSet, MoodError, MoodResult, MoodSource};
use crate::playlist::{FallbackReason, Language, PlaylistEntry, PlaylistSelector};

/// Why mood detection from an image did not produce a classifier mood
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    InvalidScores(#[from] MoodError),
}

/// Where the mood comes from
#[derive(Debug, Clone)]
pub enum MoodInput {
    /// Encoded JPEG/PNG photo (upload or webcam capture)
    Image(Vec<u8>),
    /// Mood picked by the user, bypassing classification
    Manual(Emotion),
}

/// User-facing condition attached to a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// Classification failed; the mood is a neutral substitute
    ClassifierFailed,
    /// Playlist search failed; showing the default playlist
    DefaultPlaylist,
    /// Search succeeded but matched nothing usable; showing the default playlist
    NoPlaylistsFound,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::ClassifierFailed => {
                "Could not detect a mood from the photo, using neutral instead"
            }
            Notice::DefaultPlaylist => "Playlist search is unavailable, showing the default playlist",
            Notice::NoPlaylistsFound => {
                "No playlists found for this mood and language, showing the default playlist"
            }
        }
    }
}

impl From<FallbackReason> for Notice {
    fn from(reason: FallbackReason) -> Self {
        match reason {
            FallbackReason::SearchFailed => Notice::DefaultPlaylist,
            FallbackReason::EmptyResult => Notice::NoPlaylistsFound,
        }
    }
}

/// Mood detected from a photo
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedMood {
    pub result: MoodResult,
    pub scores: EmotionScoreSet,
}

/// Full pipeline output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub mood: Emotion,
    pub confidence: f32,
    pub source: MoodSource,
    /// Classifier scores; empty for manual and fallback moods
    pub scores: EmotionScoreSet,
    pub language: Language,
    /// Never empty
    pub playlists: Vec<PlaylistEntry>,
    /// True when `playlists` is exactly the default entry
    pub is_default: bool,
    pub notices: Vec<Notice>,
}

/// Runs classification, mood resolution and playlist selection
pub struct Recommender {
    classifier: Arc<dyn EmotionClassifier>,
    selector: Arc<PlaylistSelector>,
}

impl Recommender {
    pub fn new(classifier: Arc<dyn EmotionClassifier>, selector: Arc<PlaylistSelector>) -> Self {
        Self {
            classifier,
            selector,
        }
    }

    pub fn selector(&self) -> &Arc<PlaylistSelector> {
        &self.selector
    }

    /// Classify a photo and resolve the primary face's mood
    pub async fn detect_mood(&self, image: &[u8]) -> Result<DetectedMood, DetectionError> {
        let faces = self.classifier.analyze(image).await?;
        let face = faces.into_iter().next().ok_or(ClassifierError::NoFace)?;

        let scores = EmotionScoreSet::from_raw(&face.emotion)?;
        let result = mood::resolve_dominant(&face.dominant_emotion, &scores)?;

        info!(
            mood = %result.label,
            confidence = result.confidence,
            reported = %face.dominant_emotion,
            "Detected mood"
        );

        Ok(DetectedMood { result, scores })
    }

    /// Produce playlists for a photo or a manually chosen mood
    pub async fn recommend(&self, input: MoodInput, language: Language) -> Recommendation {
        let mut notices = Vec::new();

        let (result, scores, source) = match input {
            MoodInput::Manual(emotion) => (
                MoodResult::manual(emotion),
                EmotionScoreSet::default(),
                MoodSource::Manual,
            ),
            MoodInput::Image(image) => match self.detect_mood(&image).await {
                Ok(detected) => (detected.result, detected.scores, MoodSource::Classifier),
                Err(e) => {
                    warn!(error = %e, "Mood detection failed, using neutral");
                    notices.push(Notice::ClassifierFailed);
                    (
                        MoodResult::neutral(),
                        EmotionScoreSet::default(),
                        MoodSource::Fallback,
                    )
                }
            },
        };

        let selection = self.selector.select(result.label.id(), language).await;
        if let Some(reason) = selection.fallback_reason() {
            notices.push(reason.into());
        }

        Recommendation {
            mood: result.label,
            confidence: result.confidence,
            source,
            scores,
            language,
            playlists: selection.entries(),
            is_default: selection.is_fallback(),
            notices,
        }
    }

    /// Forget cached playlists so the next lookup searches again
    pub fn refresh(&self) {
        self.selector.invalidate(None, None);
    }
}
