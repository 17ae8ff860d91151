//! Azure OpenAI integration for description generation.
//!
//! Provides the completion-model abstraction, the Azure chat-completions
//! client, and the describer that turns a vision analysis into Portuguese
//! prose (degrading to a placeholder when the service fails).

pub(crate) mod azure;
pub(crate) mod describer;
pub(crate) mod provider;

pub use azure::AzureOpenAiClient;
pub use describer::Describer;
pub use provider::{CompletionModel, CompletionRequest, CompletionResponse};
