//! HTTP client for a local Ollama daemon.

use std::time::Duration;

use async_trait::async_trait;
use plansmith_core::generation::{CompletionError, CompletionModel, CompletionRequest};
use tracing::{debug, info, warn};

use crate::error::OllamaError;
use crate::types::{ChatMessage, ChatOptions, ChatRequest, ChatResponse};

/// Where an Ollama daemon listens unless told otherwise.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11434";

/// Client for the Ollama chat API.
///
/// The per-call timeout comes from each request rather than the client, so
/// one client instance can serve callers with different timeout budgets.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    /// Client against the default local daemon address.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client against a specific daemon address.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// The daemon address this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether the daemon answers at all.
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        self.http.get(&url).send().await.is_ok()
    }

    /// Runs one non-streaming chat completion and returns the reply text.
    ///
    /// # Errors
    ///
    /// Returns [`OllamaError::Http`] for transport failures and
    /// [`OllamaError::Api`] for non-success statuses.
    pub async fn chat(
        &self,
        model: &str,
        prompt: &str,
        temperature: f32,
        timeout: Duration,
    ) -> Result<String, OllamaError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = ChatRequest {
            model: model.to_string(),
            messages: vec![ChatMessage::user(prompt)],
            stream: false,
            options: ChatOptions { temperature },
        };

        info!(model, chars = prompt.chars().count(), "sending chat request to Ollama");
        let response = self
            .http
            .post(&url)
            .timeout(timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Ollama rejected the chat request");
            return Err(OllamaError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        let chat: ChatResponse = response.json().await?;
        debug!(
            chars = chat.message.content.chars().count(),
            "received chat response from Ollama"
        );
        Ok(chat.message.content)
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionModel for OllamaClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        self.chat(
            &request.model,
            &request.prompt,
            request.temperature,
            request.timeout,
        )
        .await
        .map_err(|e| CompletionError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_client_targets_the_local_daemon() {
        let client = OllamaClient::new();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn trailing_slashes_are_trimmed_from_the_base_url() {
        let client = OllamaClient::with_base_url("http://10.0.0.5:11434///");
        assert_eq!(client.base_url(), "http://10.0.0.5:11434");
    }

    #[tokio::test]
    async fn transport_failures_surface_as_completion_errors() {
        // Nothing listens on port 1; the connection is refused locally.
        let client = OllamaClient::with_base_url("http://127.0.0.1:1");
        let request = CompletionRequest {
            model: "stub".to_string(),
            prompt: "prompt".to_string(),
            temperature: 0.0,
            timeout: Duration::from_millis(250),
        };
        let err = client.complete(request).await.unwrap_err();
        assert!(err.to_string().contains("completion request failed"));
    }
}
