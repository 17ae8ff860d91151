//! Legacy Computer Vision v3.2 backend.
//!
//! Older resources expose describe/tag/detect as separate operations; the
//! three responses are merged into the same [`AnalysisResult`] the unified
//! backend produces. Caption candidates double as dense captions since the
//! v3.2 API has no region captioning.

use super::backend::{clamp_confidence, VisionBackend, ANALYSIS_LANGUAGE, KEY_HEADER};
use crate::config::VisionConfig;
use crate::error::PipelineError;
use crate::types::{AnalysisResult, BoundingBox, DenseCaption, DetectedObject, Tag};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const DESCRIBE_QUERY: &[(&str, &str)] =
    &[("maxCandidates", "3"), ("language", ANALYSIS_LANGUAGE)];
const TAG_QUERY: &[(&str, &str)] = &[("language", ANALYSIS_LANGUAGE)];

/// Route of one v3.2 operation (`describe`, `tag`, `detect`).
fn operation_url(endpoint: &str, operation: &str) -> String {
    format!("{}/vision/v3.2/{operation}", endpoint.trim_end_matches('/'))
}

/// Backend for the three-endpoint Computer Vision v3.2 API.
pub struct LegacyVisionBackend {
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
}

impl LegacyVisionBackend {
    pub fn new(config: &VisionConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.clone(),
            client: reqwest::Client::new(),
        }
    }

    async fn post_image<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &[(&str, &str)],
        image: &[u8],
    ) -> Result<T, PipelineError> {
        let mut request = self
            .client
            .post(operation_url(&self.endpoint, operation))
            .header(KEY_HEADER, &self.api_key)
            .header("Content-Type", "application/octet-stream")
            .body(image.to_vec())
            .timeout(self.timeout());
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(|e| PipelineError::Vision {
            message: format!("Vision {operation} request failed: {e}"),
            status_code: None,
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(PipelineError::Vision {
                message: format!("Vision {operation} HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        response.json().await.map_err(|e| PipelineError::Vision {
            message: format!("Failed to parse {operation} response: {e}"),
            status_code: None,
        })
    }
}

// --- Response types ---

#[derive(Deserialize)]
struct DescribeResponse {
    #[serde(default)]
    description: Description,
}

#[derive(Deserialize, Default)]
struct Description {
    #[serde(default)]
    captions: Vec<CaptionCandidate>,
}

#[derive(Deserialize)]
struct CaptionCandidate {
    text: String,
    confidence: f32,
}

#[derive(Deserialize)]
struct TagResponse {
    #[serde(default)]
    tags: Vec<TagValue>,
}

#[derive(Deserialize)]
struct TagValue {
    name: String,
    confidence: f32,
}

#[derive(Deserialize)]
struct DetectResponse {
    #[serde(default)]
    objects: Vec<ObjectValue>,
}

#[derive(Deserialize)]
struct ObjectValue {
    rectangle: WireRectangle,
    object: String,
    confidence: f32,
}

#[derive(Deserialize)]
struct WireRectangle {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

fn normalize(
    describe: DescribeResponse,
    tag: TagResponse,
    detect: DetectResponse,
) -> AnalysisResult {
    let (caption, confidence) = describe
        .description
        .captions
        .first()
        .map(|c| (c.text.clone(), clamp_confidence(c.confidence)))
        .unwrap_or_default();

    // Every candidate, the headline one included, becomes a dense caption.
    let dense_captions = describe
        .description
        .captions
        .into_iter()
        .map(|c| DenseCaption {
            text: c.text,
            confidence: clamp_confidence(c.confidence),
        })
        .collect();

    let tags = tag
        .tags
        .into_iter()
        .map(|t| Tag::new(t.name, clamp_confidence(t.confidence)))
        .collect();

    let objects = detect
        .objects
        .into_iter()
        .map(|o| DetectedObject {
            name: o.object,
            confidence: clamp_confidence(o.confidence),
            bounding_box: BoundingBox {
                x: o.rectangle.x,
                y: o.rectangle.y,
                width: o.rectangle.w,
                height: o.rectangle.h,
            },
        })
        .collect();

    AnalysisResult {
        caption,
        confidence,
        dense_captions,
        tags,
        objects,
    }
}

#[async_trait]
impl VisionBackend for LegacyVisionBackend {
    fn name(&self) -> &str {
        "legacy"
    }

    async fn analyze(&self, image: &[u8]) -> Result<AnalysisResult, PipelineError> {
        let describe: DescribeResponse =
            self.post_image("describe", DESCRIBE_QUERY, image).await?;
        let tag: TagResponse = self.post_image("tag", TAG_QUERY, image).await?;
        let detect: DetectResponse = self.post_image("detect", &[], image).await?;

        Ok(normalize(describe, tag, detect))
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(60)
    }
}
