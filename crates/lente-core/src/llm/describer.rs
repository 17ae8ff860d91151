//! Turns a vision analysis into descriptive Portuguese text.
//!
//! Description generation is the one stage that never fails the image: when
//! the completion service errors out, the record gets a placeholder string
//! carrying the error instead.

use super::provider::{CompletionModel, CompletionRequest};
use crate::types::AnalysisResult;

/// Generates the description text for analyzed images.
pub struct Describer {
    model: Box<dyn CompletionModel>,
}

impl Describer {
    pub fn new(model: Box<dyn CompletionModel>) -> Self {
        Self { model }
    }

    /// Generate the description for an analysis.
    ///
    /// Infallible: completion errors are logged and replaced by the
    /// placeholder text, so a failed generation still yields a usable record.
    pub async fn describe(&self, analysis: &AnalysisResult) -> String {
        let request = CompletionRequest::describe_analysis(analysis);

        match self.model.complete(&request).await {
            Ok(response) => {
                tracing::debug!(
                    "Generated description with {} in {}ms ({:?} tokens)",
                    response.model,
                    response.latency_ms,
                    response.tokens_used
                );
                response.text
            }
            Err(e) => {
                tracing::error!("Description generation via {} failed: {e}", self.model.name());
                format!("Não foi possível gerar uma descrição. Erro: {e}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::llm::provider::CompletionResponse;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Mock completion model that records the requests it receives.
    /// The request log is shared so tests can inspect it after the mock
    /// moves into the describer.
    struct MockModel {
        result: Result<String, (Option<u16>, String)>,
        requests: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl MockModel {
        fn success(text: &str) -> Self {
            Self {
                result: Ok(text.to_string()),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn failing(status_code: Option<u16>, message: &str) -> Self {
            Self {
                result: Err((status_code, message.to_string())),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl CompletionModel for MockModel {
        fn name(&self) -> &str {
            "mock"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, PipelineError> {
            self.requests.lock().unwrap().push(request.clone());
            match &self.result {
                Ok(text) => Ok(CompletionResponse {
                    text: text.clone(),
                    model: "mock-v1".to_string(),
                    tokens_used: Some(42),
                    latency_ms: 5,
                }),
                Err((status_code, message)) => Err(PipelineError::Completion {
                    message: message.clone(),
                    status_code: *status_code,
                }),
            }
        }

        fn timeout(&self) -> Duration {
            Duration::from_secs(1)
        }
    }

    fn analysis_with_caption(caption: &str) -> AnalysisResult {
        AnalysisResult {
            caption: caption.to_string(),
            confidence: 0.9,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_passes_generated_text_through() {
        let describer = Describer::new(Box::new(MockModel::success("Um gato cinza na cadeira.")));
        let text = describer.describe(&analysis_with_caption("a cat")).await;
        assert_eq!(text, "Um gato cinza na cadeira.");
    }

    #[tokio::test]
    async fn test_failure_becomes_placeholder_with_error() {
        let describer = Describer::new(Box::new(MockModel::failing(
            Some(429),
            "Azure OpenAI HTTP 429: rate limited",
        )));
        let text = describer.describe(&analysis_with_caption("a cat")).await;

        assert!(text.starts_with("Não foi possível gerar uma descrição. Erro: "));
        assert!(text.contains("rate limited"));
    }

    #[tokio::test]
    async fn test_sends_the_fixed_description_request() {
        let mock = MockModel::success("ok");
        let requests = mock.requests.clone();
        let describer = Describer::new(Box::new(mock));
        describer.describe(&analysis_with_caption("a beach")).await;

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].user.contains("Legenda principal: a beach"));
        assert!((requests[0].temperature - 0.7).abs() < f32::EPSILON);
    }
}
