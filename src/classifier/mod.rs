//! Facial emotion classification.
//!
//! Classification is delegated to an external facial-analysis service. The
//! [`EmotionClassifier`] trait is the seam; [`DeepFaceClient`] speaks the
//! DeepFace REST `/analyze` protocol.

mod deepface;

pub use deepface::DeepFaceClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Error type for classification
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Emotion classifier is disabled")]
    Disabled,

    #[error("Unsupported image format: {0}")]
    UnsupportedImage(String),

    #[error("Classifier request failed: {0}")]
    Request(String),

    #[error("Classifier returned an error ({status}): {message}")]
    Service { status: u16, message: String },

    #[error("No face found in image")]
    NoFace,

    #[error("Malformed classifier response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ClassifierError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClassifierError::Malformed(err.to_string())
        } else {
            ClassifierError::Request(err.to_string())
        }
    }
}

/// Emotion analysis for one detected face
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceAnalysis {
    /// Label the classifier considers dominant
    pub dominant_emotion: String,
    /// Raw per-emotion scores in `[0, 100]`
    #[serde(default)]
    pub emotion: HashMap<String, f32>,
}

/// Image formats accepted for analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// Sniff the format from the image's magic bytes
    pub fn detect(bytes: &[u8]) -> Result<Self, ClassifierError> {
        match infer::get(bytes).map(|kind| kind.mime_type()) {
            Some("image/jpeg") => Ok(ImageFormat::Jpeg),
            Some("image/png") => Ok(ImageFormat::Png),
            Some(other) => Err(ClassifierError::UnsupportedImage(other.to_string())),
            None => Err(ClassifierError::UnsupportedImage("unknown".to_string())),
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }
}

/// External facial emotion classifier
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Analyze an encoded JPEG/PNG image; one entry per detected face
    async fn analyze(&self, image: &[u8]) -> Result<Vec<FaceAnalysis>, ClassifierError>;
}
