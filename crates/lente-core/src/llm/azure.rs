//! Azure OpenAI completion client using the Chat Completions API.
//!
//! Azure addresses a deployment rather than a model name, authenticates with
//! an `api-key` header, and versions the REST surface through an
//! `api-version` query parameter.

use super::provider::{CompletionModel, CompletionRequest, CompletionResponse};
use crate::config::OpenAiConfig;
use crate::error::PipelineError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Chat-completions route for a deployment on an Azure OpenAI resource.
fn chat_completions_url(endpoint: &str, deployment: &str, api_version: &str) -> String {
    format!(
        "{}/openai/deployments/{}/chat/completions?api-version={}",
        endpoint.trim_end_matches('/'),
        deployment,
        api_version
    )
}

/// Completion client for an Azure OpenAI deployment.
pub struct AzureOpenAiClient {
    api_key: String,
    deployment: String,
    url: String,
    client: reqwest::Client,
}

impl AzureOpenAiClient {
    pub fn new(config: &OpenAiConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            deployment: config.deployment_name.clone(),
            url: chat_completions_url(
                &config.endpoint,
                &config.deployment_name,
                &config.api_version,
            ),
            client: reqwest::Client::new(),
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    model: String,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

#[async_trait]
impl CompletionModel for AzureOpenAiClient {
    fn name(&self) -> &str {
        "azure-openai"
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, PipelineError> {
        let start = Instant::now();

        let body = ChatRequest {
            model: self.deployment.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.user.clone(),
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&self.url)
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| PipelineError::Completion {
                message: format!("Azure OpenAI request failed: {e}"),
                status_code: None,
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(PipelineError::Completion {
                message: format!("Azure OpenAI HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let chat_response: ChatResponse =
            response.json().await.map_err(|e| PipelineError::Completion {
                message: format!("Failed to parse Azure OpenAI response: {e}"),
                status_code: None,
            })?;

        let text = chat_response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| PipelineError::Completion {
                message: "Azure OpenAI returned no message content".to_string(),
                status_code: None,
            })?;

        Ok(CompletionResponse {
            text: text.trim().to_string(),
            model: chat_response.model,
            tokens_used: chat_response.usage.map(|u| u.total_tokens),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_addresses_the_deployment() {
        let url = chat_completions_url(
            "https://my-openai.openai.azure.com/",
            "gpt-4o",
            "2023-12-01-preview",
        );
        assert_eq!(
            url,
            "https://my-openai.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2023-12-01-preview"
        );
    }

    #[test]
    fn test_request_body_carries_both_messages() {
        let body = ChatRequest {
            model: "gpt-4o".to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: "instrução".to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: "prompt".to_string(),
                },
            ],
            temperature: 0.7,
            max_tokens: 1000,
        };
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["role"], "user");
        assert!((value["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(value["max_tokens"], 1000);
    }

    #[test]
    fn test_response_parses_with_and_without_usage() {
        let with_usage: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"content": "Um gato."}}],
                "model": "gpt-4o", "usage": {"total_tokens": 321}}"#,
        )
        .unwrap();
        assert_eq!(with_usage.choices[0].message.content.as_deref(), Some("Um gato."));
        assert_eq!(with_usage.usage.map(|u| u.total_tokens), Some(321));

        let bare: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert!(bare.choices[0].message.content.is_none());
        assert!(bare.usage.is_none());
    }
}
