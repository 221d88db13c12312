//! Configuration for record generation.

use std::time::Duration;

/// Model identifier used when none is configured.
pub const DEFAULT_MODEL: &str = "gemma3:1b-it-qat";

/// Configuration for one generation run: which model to ask, how often to
/// retry, and the sampling options forwarded on every completion call.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Model identifier passed to the inference service.
    pub model: String,
    /// Maximum number of attempts before giving up (default: 3, minimum 1).
    pub max_retries: u32,
    /// Per-call timeout forwarded to the inference service.
    pub timeout: Duration,
    /// Sampling temperature forwarded to the inference service.
    pub temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_retries: 3,
            timeout: Duration::from_secs(120),
            temperature: 0.7,
        }
    }
}

impl GenerationConfig {
    /// Sets the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the maximum number of attempts.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the per-call timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}
