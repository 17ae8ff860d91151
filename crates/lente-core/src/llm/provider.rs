//! Completion-model trait and request/response types.
//!
//! The request carries the full Portuguese prompt; backends only transport
//! it. Prompt wording, role instruction and sampling parameters are fixed.

use crate::error::PipelineError;
use crate::types::AnalysisResult;
use async_trait::async_trait;
use std::time::Duration;

/// Role instruction sent as the system message on every request.
pub const SYSTEM_PROMPT: &str =
    "Você é um assistente especializado em análise e descrição de imagens.";

/// A request to generate a description from analysis data.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System role instruction
    pub system: String,
    /// User prompt
    pub user: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Build the description request for a vision analysis.
    ///
    /// The prompt embeds the caption with its confidence plus the dense
    /// caption texts, tag names and object names as comma-joined lists.
    pub fn describe_analysis(analysis: &AnalysisResult) -> Self {
        let dense_captions = analysis
            .dense_captions
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let tags = analysis
            .tags
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let objects = analysis
            .objects
            .iter()
            .map(|o| o.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let user = format!(
            "Você é um assistente especializado em descrever imagens de forma detalhada e contextualizada.\n\
             \n\
             Analise os seguintes dados extraídos de uma imagem usando o Azure Computer Vision e forneça:\n\
             1. Uma descrição detalhada da imagem\n\
             2. Um contexto possível para a imagem\n\
             3. Pontos de interesse na imagem\n\
             4. Possíveis usos ou aplicações para esta imagem\n\
             \n\
             Dados da análise:\n\
             - Legenda principal: {}\n\
             - Confiança da legenda: {}\n\
             - Legendas detalhadas: {}\n\
             - Tags identificadas: {}\n\
             - Objetos detectados: {}\n\
             \n\
             Forneça sua resposta em português, de forma estruturada e completa.",
            analysis.caption, analysis.confidence, dense_captions, tags, objects
        );

        Self {
            system: SYSTEM_PROMPT.to_string(),
            user,
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}

/// The response from a completion call.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated text
    pub text: String,
    /// Model identifier reported by the service
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait the chat-completion client implements.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn CompletionModel>` for the describer).
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Model name for logging (e.g., "azure-openai").
    fn name(&self) -> &str;

    /// Generate a completion for the given request.
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, PipelineError>;

    /// Per-request timeout for this model.
    fn timeout(&self) -> Duration;
}
