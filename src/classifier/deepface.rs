//! Client for a DeepFace-compatible REST service.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ClassifierError, EmotionClassifier, FaceAnalysis, ImageFormat};
use crate::config::ClassifierConfig;

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    img: String,
    actions: [&'a str; 1],
    enforce_detection: bool,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    results: Vec<FaceAnalysis>,
}

pub struct DeepFaceClient {
    client: Client,
    url: String,
    enabled: bool,
}

impl DeepFaceClient {
    pub fn new(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .user_agent(concat!("moodify/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClassifierError::Request(e.to_string()))?;

        Ok(Self {
            client,
            url: config.url.trim_end_matches('/').to_string(),
            enabled: config.enabled,
        })
    }
}

/// Encode an image as the data URI the `/analyze` endpoint expects
fn data_uri(image: &[u8], format: ImageFormat) -> String {
    format!("data:{};base64,{}", format.mime_type(), BASE64.encode(image))
}

#[async_trait]
impl EmotionClassifier for DeepFaceClient {
    async fn analyze(&self, image: &[u8]) -> Result<Vec<FaceAnalysis>, ClassifierError> {
        if !self.enabled {
            return Err(ClassifierError::Disabled);
        }

        let format = ImageFormat::detect(image)?;
        let body = AnalyzeRequest {
            img: data_uri(image, format),
            actions: ["emotion"],
            // Analyze the whole frame when no face is detected
            enforce_detection: false,
        };

        let response = self
            .client
            .post(format!("{}/analyze", self.url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: AnalyzeResponse = response.json().await?;
        debug!(faces = parsed.results.len(), "Classifier responded");

        if parsed.results.is_empty() {
            return Err(ClassifierError::NoFace);
        }

        Ok(parsed.results)
    }
}
