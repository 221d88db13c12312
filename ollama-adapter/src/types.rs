//! Wire types for the Ollama chat API.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier, e.g. `gemma3:1b-it-qat`.
    pub model: String,
    /// Conversation so far; a single user message for one-shot generation.
    pub messages: Vec<ChatMessage>,
    /// Whether to stream tokens; always `false` here.
    pub stream: bool,
    /// Sampling options.
    pub options: ChatOptions,
}

/// One chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `system`, `user`, or `assistant`.
    pub role: String,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// A user-role message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Sampling options forwarded to the model.
#[derive(Debug, Clone, Serialize)]
pub struct ChatOptions {
    /// Sampling temperature.
    pub temperature: f32,
}

/// Response body for a non-streaming `POST /api/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// The assistant's reply.
    pub message: ChatMessage,
}
