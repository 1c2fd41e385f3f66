//! Emotion catalogue shared by the resolver and the playlist selector.
//!
//! The order of [`ALL_EMOTIONS`] is the canonical tie-break order: when two
//! categories score the same, the one listed first wins.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Facial-affect category reported by the emotion classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    #[serde(alias = "surprise")]
    Surprised,
    Neutral,
    Fear,
    Disgust,
}

/// Every emotion in tie-break order
pub const ALL_EMOTIONS: [Emotion; 7] = [
    Emotion::Happy,
    Emotion::Sad,
    Emotion::Angry,
    Emotion::Surprised,
    Emotion::Neutral,
    Emotion::Fear,
    Emotion::Disgust,
];

/// Emotions the classifier over-reports when it is unsure
pub const LOW_TRUST_EMOTIONS: [Emotion; 3] = [Emotion::Fear, Emotion::Neutral, Emotion::Angry];

/// Confidence below which a low-trust emotion is re-ranked
pub const LOW_TRUST_THRESHOLD: f32 = 0.8;

impl Emotion {
    /// Lowercase identifier used on the wire and as the cache key
    pub fn id(self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Surprised => "surprised",
            Emotion::Neutral => "neutral",
            Emotion::Fear => "fear",
            Emotion::Disgust => "disgust",
        }
    }

    /// Human-readable name for mood pickers
    pub fn display_name(self) -> &'static str {
        match self {
            Emotion::Happy => "Happy",
            Emotion::Sad => "Sad",
            Emotion::Angry => "Angry",
            Emotion::Surprised => "Surprised",
            Emotion::Neutral => "Neutral",
            Emotion::Fear => "Fear",
            Emotion::Disgust => "Disgust",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Emotion::Happy => "😊",
            Emotion::Sad => "😢",
            Emotion::Angry => "😠",
            Emotion::Surprised => "😲",
            Emotion::Neutral => "😐",
            Emotion::Fear => "😨",
            Emotion::Disgust => "🤢",
        }
    }

    /// Position in the tie-break order
    pub fn rank(self) -> usize {
        ALL_EMOTIONS
            .iter()
            .position(|e| *e == self)
            .unwrap_or(ALL_EMOTIONS.len())
    }

    pub fn is_low_trust(self) -> bool {
        LOW_TRUST_EMOTIONS.contains(&self)
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when a label is not one of the known emotions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown emotion: {0}")]
pub struct UnknownEmotion(pub String);

impl FromStr for Emotion {
    type Err = UnknownEmotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "happy" => Ok(Emotion::Happy),
            "sad" => Ok(Emotion::Sad),
            "angry" => Ok(Emotion::Angry),
            "surprised" | "surprise" => Ok(Emotion::Surprised),
            "neutral" => Ok(Emotion::Neutral),
            "fear" => Ok(Emotion::Fear),
            "disgust" => Ok(Emotion::Disgust),
            other => Err(UnknownEmotion(other.to_string())),
        }
    }
}
