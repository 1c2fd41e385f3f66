//! Mood resolution from facial emotion scores.
//!
//! The classifier reports an independent score in `[0, 100]` per emotion.
//! This module turns that distribution into a single trusted label plus a
//! normalized confidence, re-ranking labels the classifier is known to
//! over-report at low certainty.

pub mod emotions;

pub use emotions::{
    Emotion, UnknownEmotion, ALL_EMOTIONS, LOW_TRUST_EMOTIONS, LOW_TRUST_THRESHOLD,
};

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Maximum raw score the classifier can report
pub const MAX_SCORE: f32 = 100.0;

/// Errors raised by the mood resolver
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MoodError {
    #[error("Invalid emotion scores: {0}")]
    InvalidInput(String),
}

/// Validated per-emotion score distribution for one face.
///
/// Keys are ordered by the catalogue tie-break order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmotionScoreSet {
    scores: BTreeMap<Emotion, f32>,
}

impl EmotionScoreSet {
    /// Build a score set from the classifier's raw `label -> score` map.
    ///
    /// Labels outside the emotion catalogue are dropped. Scores must be
    /// finite and non-negative; values above [`MAX_SCORE`] are clamped.
    /// When both an alias and the canonical id are present, the canonical
    /// id's score is used.
    pub fn from_raw(raw: &HashMap<String, f32>) -> Result<Self, MoodError> {
        let mut scores = BTreeMap::new();

        let mut labels: Vec<(&String, &f32)> = raw.iter().collect();
        labels.sort_by(|a, b| a.0.cmp(b.0));

        for (label, score) in labels {
            if !score.is_finite() || *score < 0.0 {
                return Err(MoodError::InvalidInput(format!(
                    "score for '{label}' must be a non-negative number, got {score}"
                )));
            }

            match label.parse::<Emotion>() {
                Ok(emotion) if label.as_str() == emotion.id() => {
                    scores.insert(emotion, score.min(MAX_SCORE));
                }
                Ok(emotion) => {
                    scores.entry(emotion).or_insert(score.min(MAX_SCORE));
                }
                Err(_) => debug!(label = %label, "Ignoring unknown emotion category"),
            }
        }

        Ok(Self { scores })
    }

    /// Build a score set from already-typed pairs (later duplicates win)
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Emotion, f32)>) -> Result<Self, MoodError> {
        let raw: HashMap<String, f32> = pairs
            .into_iter()
            .map(|(emotion, score)| (emotion.id().to_string(), score))
            .collect();
        Self::from_raw(&raw)
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn get(&self, emotion: Emotion) -> Option<f32> {
        self.scores.get(&emotion).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f32)> + '_ {
        self.scores.iter().map(|(e, s)| (*e, *s))
    }

    /// All categories sorted by score descending, ties in catalogue order
    pub fn ranked(&self) -> Vec<(Emotion, f32)> {
        let mut ranked: Vec<(Emotion, f32)> = self.iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.rank().cmp(&b.0.rank()))
        });
        ranked
    }

    /// Highest-scoring category, if any
    pub fn dominant(&self) -> Option<(Emotion, f32)> {
        self.ranked().into_iter().next()
    }
}

/// A single trusted mood label with normalized confidence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodResult {
    pub label: Emotion,
    /// Confidence in `[0, 1]`
    pub confidence: f32,
}

impl MoodResult {
    /// Result substituted when classification fails or input is unusable
    pub fn neutral() -> Self {
        Self {
            label: Emotion::Neutral,
            confidence: 0.0,
        }
    }

    /// Caller-chosen mood, taken as authoritative
    pub fn manual(label: Emotion) -> Self {
        Self {
            label,
            confidence: 1.0,
        }
    }

    fn from_score(label: Emotion, score: f32) -> Self {
        Self {
            label,
            confidence: (score / MAX_SCORE).clamp(0.0, 1.0),
        }
    }
}

/// Where the final mood of a recommendation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodSource {
    /// Resolved from classifier scores
    Classifier,
    /// Supplied directly by the caller
    Manual,
    /// Neutral substitute after a classification failure
    Fallback,
}

/// Resolve a score distribution to a single mood.
///
/// The dominant category is the global maximum (ties go to the emotion
/// listed first in [`ALL_EMOTIONS`]). Low-trust categories below
/// [`LOW_TRUST_THRESHOLD`] go through the re-ranking override.
pub fn resolve(scores: &EmotionScoreSet) -> Result<MoodResult, MoodError> {
    let (dominant, score) = scores
        .dominant()
        .ok_or_else(|| MoodError::InvalidInput("empty score set".to_string()))?;

    Ok(apply_override(MoodResult::from_score(dominant, score), scores))
}

/// Resolve using the classifier's own reported dominant label.
///
/// Some classifier responses report a dominant emotion that is not the
/// global maximum of their score map; the override can then change the
/// label. Unknown or unscored labels fall back to [`resolve`].
pub fn resolve_dominant(reported: &str, scores: &EmotionScoreSet) -> Result<MoodResult, MoodError> {
    let reported = match reported.parse::<Emotion>() {
        Ok(emotion) => emotion,
        Err(_) => return resolve(scores),
    };

    match scores.get(reported) {
        Some(score) => Ok(apply_override(MoodResult::from_score(reported, score), scores)),
        None => resolve(scores),
    }
}

fn apply_override(candidate: MoodResult, scores: &EmotionScoreSet) -> MoodResult {
    if !candidate.label.is_low_trust() || candidate.confidence >= LOW_TRUST_THRESHOLD {
        return candidate;
    }

    match scores.dominant() {
        Some((top, score)) => {
            let reranked = MoodResult::from_score(top, score);
            debug!(
                original = %candidate.label,
                confidence = candidate.confidence,
                reranked = %reranked.label,
                "Low-confidence low-trust mood re-ranked"
            );
            reranked
        }
        None => candidate,
    }
}
