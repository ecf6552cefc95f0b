//! Outbound adapter for the external chat-completion service.

pub mod groq_client;

pub use groq_client::{GroqClient, GroqClientConfig};

use async_trait::async_trait;

use crate::domain::ports::{ChatCompletion, CompletionError, CompletionRequest};

/// Stand-in used when no API key is configured; every exchange fails with
/// a transport error, which the domain surfaces as an external-service
/// failure.
pub struct DisabledCompletion;

#[async_trait]
impl ChatCompletion for DisabledCompletion {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, CompletionError> {
        Err(CompletionError::transport(
            "completion service is not configured",
        ))
    }
}
