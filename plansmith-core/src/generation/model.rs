//! The inference-service seam.
//!
//! The pipeline treats the model as an opaque text-completion service: prompt
//! in, free text out. Adapters (an Ollama client, a test stub) implement
//! [`CompletionModel`]; the orchestrator never knows which one it holds.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// One completion call: model identifier, prompt, and sampling options.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model identifier understood by the inference service.
    pub model: String,
    /// The full instruction prompt.
    pub prompt: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// How long the service may take before the call is abandoned.
    pub timeout: Duration,
}

/// Failure reported by the inference service (timeout, connection error,
/// non-success status). Always attempt-local: the orchestrator retries it
/// like any other attempt failure.
#[derive(Debug, Error)]
#[error("completion request failed: {0}")]
pub struct CompletionError(pub String);

/// A text-completion service.
///
/// Implementations are expected to enforce the request's timeout themselves;
/// the orchestrator does not race the call against a clock.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Runs one completion and returns the model's raw text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}
