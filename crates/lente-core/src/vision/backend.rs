//! Vision backend trait and the startup capability probe.
//!
//! The probe runs once, before any image is processed; whichever backend it
//! selects is used unchanged for the whole run.

use super::legacy::LegacyVisionBackend;
use super::unified::{self, UnifiedVisionBackend};
use crate::config::{ApiPreference, VisionConfig};
use crate::error::PipelineError;
use crate::types::AnalysisResult;
use async_trait::async_trait;
use std::time::Duration;

/// Header carrying the Azure subscription key on every vision request.
pub const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Language hint sent with every analysis request.
pub const ANALYSIS_LANGUAGE: &str = "pt";

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Trait both analysis API generations implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn VisionBackend>` for dynamic dispatch).
#[async_trait]
pub trait VisionBackend: Send + Sync {
    /// Backend name for logging ("unified", "legacy").
    fn name(&self) -> &str;

    /// Analyze raw image bytes into the normalized result.
    async fn analyze(&self, image: &[u8]) -> Result<AnalysisResult, PipelineError>;

    /// Per-request timeout for this backend.
    fn timeout(&self) -> Duration;
}

/// Whether a probe response proves the unified route exists.
///
/// Only 404 means the route is absent from the resource; any other status
/// (400 for the empty probe body, 401, 200, ...) came from the route itself.
pub(crate) fn indicates_unified(status: reqwest::StatusCode) -> bool {
    status != reqwest::StatusCode::NOT_FOUND
}

/// Clamp a service-reported confidence into the documented 0.0..=1.0 range.
pub(crate) fn clamp_confidence(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Select and build the vision backend for this run.
///
/// Honors an explicit `vision.api` preference; under `auto` it probes the
/// unified route with an empty request and falls back to the legacy v3.2
/// endpoints when the route does not exist. A transport failure during the
/// probe is fatal since no backend was chosen.
pub async fn connect(config: &VisionConfig) -> Result<Box<dyn VisionBackend>, PipelineError> {
    let backend: Box<dyn VisionBackend> = match config.api {
        ApiPreference::Unified => Box::new(UnifiedVisionBackend::new(config)),
        ApiPreference::Legacy => Box::new(LegacyVisionBackend::new(config)),
        ApiPreference::Auto => {
            if probe_unified(config).await? {
                Box::new(UnifiedVisionBackend::new(config))
            } else {
                tracing::warn!(
                    "Unified image analysis not available on this resource (HTTP 404), \
                     using legacy v3.2 endpoints"
                );
                Box::new(LegacyVisionBackend::new(config))
            }
        }
    };

    tracing::info!("Selected vision analysis API: {}", backend.name());
    Ok(backend)
}

async fn probe_unified(config: &VisionConfig) -> Result<bool, PipelineError> {
    let client = reqwest::Client::new();
    let response = client
        .post(unified::analyze_url(&config.endpoint))
        .query(unified::ANALYZE_QUERY)
        .header(KEY_HEADER, &config.api_key)
        .header("Content-Type", "application/octet-stream")
        .body(Vec::new())
        .timeout(PROBE_TIMEOUT)
        .send()
        .await
        .map_err(|e| PipelineError::Vision {
            message: format!("Vision API probe failed: {e}"),
            status_code: None,
        })?;

    tracing::debug!("Vision API probe returned HTTP {}", response.status());
    Ok(indicates_unified(response.status()))
}
