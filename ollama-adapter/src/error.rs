//! Error types for the Ollama client.

use thiserror::Error;

/// Errors from talking to an Ollama daemon.
#[derive(Debug, Error)]
pub enum OllamaError {
    /// The HTTP request itself failed (connection refused, timeout, DNS).
    #[error("request to Ollama failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Ollama answered with a non-success status.
    #[error("Ollama returned error {status}: {detail}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        detail: String,
    },
}
