//! Unified Image Analysis 4.0 backend.
//!
//! One `imageanalysis:analyze` call returns caption, dense captions, tags and
//! objects together; the response is normalized into [`AnalysisResult`].

use super::backend::{clamp_confidence, VisionBackend, ANALYSIS_LANGUAGE, KEY_HEADER};
use crate::config::VisionConfig;
use crate::error::PipelineError;
use crate::types::{AnalysisResult, BoundingBox, DenseCaption, DetectedObject, Tag};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const API_VERSION: &str = "2023-10-01";
const FEATURES: &str = "caption,denseCaptions,tags,objects";

/// Query string shared by real analyze calls and the startup probe.
pub(super) const ANALYZE_QUERY: &[(&str, &str)] = &[
    ("api-version", API_VERSION),
    ("features", FEATURES),
    ("language", ANALYSIS_LANGUAGE),
    ("model-version", "latest"),
];

/// Route of the unified analyze operation on a vision resource.
pub(super) fn analyze_url(endpoint: &str) -> String {
    format!(
        "{}/computervision/imageanalysis:analyze",
        endpoint.trim_end_matches('/')
    )
}

/// Backend for the single-call Image Analysis 4.0 API.
pub struct UnifiedVisionBackend {
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
}

impl UnifiedVisionBackend {
    pub fn new(config: &VisionConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.clone(),
            client: reqwest::Client::new(),
        }
    }
}

// --- Response types ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    caption_result: Option<CaptionResult>,
    dense_captions_result: Option<SectionValues<DenseCaptionValue>>,
    tags_result: Option<SectionValues<TagValue>>,
    objects_result: Option<SectionValues<ObjectValue>>,
}

#[derive(Deserialize)]
struct SectionValues<T> {
    // The path form keeps serde's derive from demanding `T: Default`.
    #[serde(default = "Vec::new")]
    values: Vec<T>,
}

#[derive(Deserialize)]
struct CaptionResult {
    text: String,
    confidence: f32,
}

#[derive(Deserialize)]
struct DenseCaptionValue {
    text: String,
    confidence: f32,
}

#[derive(Deserialize)]
struct TagValue {
    name: String,
    confidence: f32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectValue {
    bounding_box: WireBox,
    /// Object class comes through as a nested single-entry tag list
    #[serde(default)]
    tags: Vec<TagValue>,
}

#[derive(Deserialize)]
struct WireBox {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

fn normalize(response: AnalyzeResponse) -> AnalysisResult {
    let (caption, confidence) = response
        .caption_result
        .map(|c| (c.text, clamp_confidence(c.confidence)))
        .unwrap_or_default();

    let dense_captions = response
        .dense_captions_result
        .map(|section| {
            section
                .values
                .into_iter()
                .map(|v| DenseCaption {
                    text: v.text,
                    confidence: clamp_confidence(v.confidence),
                })
                .collect()
        })
        .unwrap_or_default();

    let tags = response
        .tags_result
        .map(|section| {
            section
                .values
                .into_iter()
                .map(|v| Tag::new(v.name, clamp_confidence(v.confidence)))
                .collect()
        })
        .unwrap_or_default();

    let objects = response
        .objects_result
        .map(|section| {
            section
                .values
                .into_iter()
                .map(|v| {
                    let (name, confidence) = v
                        .tags
                        .into_iter()
                        .next()
                        .map(|t| (t.name, clamp_confidence(t.confidence)))
                        .unwrap_or_default();
                    DetectedObject {
                        name,
                        confidence,
                        bounding_box: BoundingBox {
                            x: v.bounding_box.x,
                            y: v.bounding_box.y,
                            width: v.bounding_box.w,
                            height: v.bounding_box.h,
                        },
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    AnalysisResult {
        caption,
        confidence,
        dense_captions,
        tags,
        objects,
    }
}

#[async_trait]
impl VisionBackend for UnifiedVisionBackend {
    fn name(&self) -> &str {
        "unified"
    }

    async fn analyze(&self, image: &[u8]) -> Result<AnalysisResult, PipelineError> {
        let response = self
            .client
            .post(analyze_url(&self.endpoint))
            .query(ANALYZE_QUERY)
            .header(KEY_HEADER, &self.api_key)
            .header("Content-Type", "application/octet-stream")
            .body(image.to_vec())
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| PipelineError::Vision {
                message: format!("Image analysis request failed: {e}"),
                status_code: None,
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(PipelineError::Vision {
                message: format!("Image analysis HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let analyze_response: AnalyzeResponse =
            response.json().await.map_err(|e| PipelineError::Vision {
                message: format!("Failed to parse image analysis response: {e}"),
                status_code: None,
            })?;

        Ok(normalize(analyze_response))
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAT_RESPONSE: &str = r#"{
        "captionResult": {"text": "a cat sitting on a chair", "confidence": 0.92},
        "denseCaptionsResult": {"values": [
            {"text": "a cat sitting on a chair", "confidence": 0.92},
            {"text": "a wooden chair", "confidence": 0.78}
        ]},
        "tagsResult": {"values": [
            {"name": "cat", "confidence": 0.99},
            {"name": "chair", "confidence": 0.81},
            {"name": "indoor", "confidence": 0.75}
        ]},
        "objectsResult": {"values": [
            {"boundingBox": {"x": 10, "y": 20, "w": 100, "h": 120},
             "tags": [{"name": "cat", "confidence": 0.88}]}
        ]}
    }"#;

    #[test]
    fn test_analyze_url_trims_trailing_slash() {
        let url = analyze_url("https://vision.cognitiveservices.azure.com/");
        assert_eq!(
            url,
            "https://vision.cognitiveservices.azure.com/computervision/imageanalysis:analyze"
        );
        assert_eq!(url, analyze_url("https://vision.cognitiveservices.azure.com"));
    }

    #[test]
    fn test_normalizes_full_response() {
        let response: AnalyzeResponse = serde_json::from_str(CAT_RESPONSE).unwrap();
        let analysis = normalize(response);

        assert_eq!(analysis.caption, "a cat sitting on a chair");
        assert_eq!(analysis.confidence, 0.92);
        assert_eq!(analysis.dense_captions.len(), 2);
        assert_eq!(analysis.tags.len(), 3);
        assert_eq!(analysis.tags[0].name, "cat");

        let object = &analysis.objects[0];
        assert_eq!(object.name, "cat");
        assert_eq!(object.confidence, 0.88);
        assert_eq!(object.bounding_box.x, 10);
        assert_eq!(object.bounding_box.y, 20);
        assert_eq!(object.bounding_box.width, 100);
        assert_eq!(object.bounding_box.height, 120);
    }

    #[test]
    fn test_normalizes_empty_response_to_defaults() {
        let response: AnalyzeResponse = serde_json::from_str("{}").unwrap();
        let analysis = normalize(response);

        assert_eq!(analysis.caption, "");
        assert_eq!(analysis.confidence, 0.0);
        assert!(analysis.dense_captions.is_empty());
        assert!(analysis.tags.is_empty());
        assert!(analysis.objects.is_empty());
    }

    #[test]
    fn test_sections_without_values_deserialize_empty() {
        let response: AnalyzeResponse = serde_json::from_str(
            r#"{"captionResult": {"text": "a dog", "confidence": 0.5},
                "denseCaptionsResult": {},
                "tagsResult": {},
                "objectsResult": {}}"#,
        )
        .unwrap();
        let analysis = normalize(response);

        assert_eq!(analysis.caption, "a dog");
        assert!(analysis.dense_captions.is_empty());
        assert!(analysis.tags.is_empty());
        assert!(analysis.objects.is_empty());
    }

    #[test]
    fn test_object_without_nested_tags_gets_empty_name() {
        let response: AnalyzeResponse = serde_json::from_str(
            r#"{"objectsResult": {"values": [
                {"boundingBox": {"x": 1, "y": 2, "w": 3, "h": 4}}
            ]}}"#,
        )
        .unwrap();
        let analysis = normalize(response);

        assert_eq!(analysis.objects[0].name, "");
        assert_eq!(analysis.objects[0].confidence, 0.0);
        assert_eq!(analysis.objects[0].bounding_box.height, 4);
    }

    #[test]
    fn test_out_of_range_confidences_are_clamped() {
        let response: AnalyzeResponse = serde_json::from_str(
            r#"{"captionResult": {"text": "a dog", "confidence": 1.5}}"#,
        )
        .unwrap();
        let analysis = normalize(response);
        assert_eq!(analysis.confidence, 1.0);
    }
}
