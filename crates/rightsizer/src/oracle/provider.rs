//! OpenAI-compatible chat-completions oracle provider
//!
//! One provider covers every backend the pipeline talks to; deployments
//! pick an endpoint and model through [`OracleConfig`] presets instead
//! of duplicating client code per vendor.

use super::{OracleError, OracleProvider};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Configuration for the chat-completions oracle. Explicitly constructed
/// and passed in; the provider never reads ambient environment state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Base URL up to the API root (e.g. "https://api.groq.com/openai/v1").
    pub base_url: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// Optional bearer token.
    pub api_key: Option<String>,
    /// Optional system message prepended to every request.
    pub system_prompt: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Retries after the first attempt, with exponential backoff.
    pub max_retries: u32,
    /// Sampling temperature; suggestions want determinism.
    pub temperature: f32,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_string(),
            model: "local-model".to_string(),
            api_key: None,
            system_prompt: None,
            timeout_secs: 30,
            max_retries: 2,
            temperature: 0.2,
        }
    }
}

impl OracleConfig {
    /// Preset for the Groq OpenAI-compatible endpoint.
    pub fn groq(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: model.into(),
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Preset for any custom OpenAI-compatible endpoint.
    pub fn custom(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            ..Default::default()
        }
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Chat-completions client implementing [`OracleProvider`].
pub struct ChatCompletionsOracle {
    config: OracleConfig,
    client: Client,
}

impl ChatCompletionsOracle {
    pub fn new(config: OracleConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { config, client })
    }

    async fn try_request(&self, prompt: &str) -> Result<String, OracleError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.config.system_prompt {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        let request = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
        };

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .json(&request);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                OracleError::Timeout(Duration::from_secs(self.config.timeout_secs))
            } else {
                OracleError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|_| OracleError::EmptyResponse)?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(OracleError::EmptyResponse)?;

        Ok(content)
    }
}

#[async_trait]
impl OracleProvider for ChatCompletionsOracle {
    async fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                // 1s, 2s, 4s backoff schedule.
                tokio::time::sleep(Duration::from_secs(2u64.pow(attempt - 1))).await;
            }

            match self.try_request(prompt).await {
                Ok(reply) => return Ok(reply),
                // A parseable-but-empty reply will not improve on retry.
                Err(OracleError::EmptyResponse) => return Err(OracleError::EmptyResponse),
                Err(e) => {
                    if attempt < self.config.max_retries {
                        warn!(
                            attempt = attempt + 1,
                            max = self.config.max_retries + 1,
                            error = %e,
                            "Oracle request failed, retrying"
                        );
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(OracleError::EmptyResponse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(server: &mockito::ServerGuard) -> OracleConfig {
        OracleConfig {
            max_retries: 0,
            ..OracleConfig::custom(server.url(), "test-model")
        }
    }

    #[tokio::test]
    async fn test_reply_content_is_trimmed() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":"  t3.xlarge\n"}}]}"#,
            )
            .create_async()
            .await;

        let oracle = ChatCompletionsOracle::new(config_for(&server)).unwrap();
        let reply = oracle.complete("pick a type").await.unwrap();
        assert_eq!(reply, "t3.xlarge");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_choices_is_empty_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let oracle = ChatCompletionsOracle::new(config_for(&server)).unwrap();
        assert!(matches!(
            oracle.complete("pick a type").await,
            Err(OracleError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn test_http_error_status_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let oracle = ChatCompletionsOracle::new(config_for(&server)).unwrap();
        match oracle.complete("pick a type").await {
            Err(OracleError::Status { status, .. }) => assert_eq!(status, 503),
            other => panic!("unexpected result: {:?}", other.map_err(|e| e.to_string())),
        }
    }

    #[tokio::test]
    async fn test_bearer_token_header_sent_when_configured() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"ok"}}]}"#)
            .create_async()
            .await;

        let mut config = config_for(&server);
        config.api_key = Some("sk-test".to_string());
        let oracle = ChatCompletionsOracle::new(config).unwrap();
        oracle.complete("hello").await.unwrap();
        mock.assert_async().await;
    }
}
