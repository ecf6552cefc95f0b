//! Reqwest-backed chat-completion client for the Groq OpenAI-compatible API.
//!
//! This adapter owns transport details only: request serialisation, bearer
//! authentication, timeout and status mapping, and extraction of the first
//! choice's message content. Prompt construction and reply parsing belong to
//! the domain.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{ChatCompletion, CompletionError, CompletionRequest};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Model, sampling, and endpoint settings for the completion client.
#[derive(Debug, Clone)]
pub struct GroqClientConfig {
    /// API key sent as a bearer credential.
    pub api_key: String,
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Reply length cap in tokens.
    pub max_tokens: u32,
}

/// Chat-completion adapter performing HTTP POSTs against one endpoint.
pub struct GroqClient {
    client: Client,
    config: GroqClientConfig,
}

impl GroqClient {
    /// Build an adapter with the default thirty-second request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: GroqClientConfig) -> Result<Self, reqwest::Error> {
        Self::with_timeout(config, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(config: GroqClientConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct WireResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: [WireMessage<'a>; 2],
    temperature: f64,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<WireResponseFormat>,
}

#[derive(Deserialize)]
struct WireReply {
    choices: Vec<WireChoice>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireReplyMessage,
}

#[derive(Deserialize)]
struct WireReplyMessage {
    content: Option<String>,
}

#[async_trait]
impl ChatCompletion for GroqClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let body = WireRequest {
            model: &self.config.model,
            messages: [
                WireMessage {
                    role: "system",
                    content: &request.system,
                },
                WireMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            response_format: request
                .json_object
                .then_some(WireResponseFormat { kind: "json_object" }),
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| CompletionError::transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompletionError::Status {
                status: status.as_u16(),
            });
        }

        let reply: WireReply = response
            .json()
            .await
            .map_err(|err| CompletionError::malformed(err.to_string()))?;

        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| CompletionError::malformed("reply contained no message content"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn config() -> GroqClientConfig {
        GroqClientConfig {
            api_key: "gsk-test".into(),
            base_url: "https://api.groq.com/openai/v1".into(),
            model: "llama-3.1-8b-instant".into(),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }

    #[rstest]
    fn endpoint_joins_without_double_slash() {
        let client = GroqClient::new(GroqClientConfig {
            base_url: "https://api.groq.com/openai/v1/".into(),
            ..config()
        })
        .expect("client builds");
        assert_eq!(
            client.endpoint(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[rstest]
    fn request_serialises_response_format_only_when_asked() {
        let body = WireRequest {
            model: "llama-3.1-8b-instant",
            messages: [
                WireMessage {
                    role: "system",
                    content: "sys",
                },
                WireMessage {
                    role: "user",
                    content: "usr",
                },
            ],
            temperature: 0.7,
            max_tokens: 1000,
            response_format: Some(WireResponseFormat {
                kind: "json_object",
            }),
        };
        let json = serde_json::to_value(&body).expect("serialise");
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["messages"][0]["role"], "system");

        let body = WireRequest {
            response_format: None,
            ..body
        };
        let json = serde_json::to_value(&body).expect("serialise");
        assert!(json.get("response_format").is_none());
    }

    #[rstest]
    fn reply_content_is_extracted() {
        let reply: WireReply = serde_json::from_str(
            r#"{ "choices": [{ "message": { "role": "assistant", "content": "{\"ok\":true}" } }] }"#,
        )
        .expect("parse");
        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .expect("content");
        assert_eq!(content, "{\"ok\":true}");
    }
}
