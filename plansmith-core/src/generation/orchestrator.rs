//! Bounded-retry orchestration of the normalization pipeline.
//!
//! One attempt is invoke -> extract -> normalize -> validate. The model is
//! adversarial by nature: any stage can fail on any given attempt, and
//! resampling usually helps, so every attempt-local failure is caught and
//! answered with exponential backoff rather than re-raised. Only exhaustion
//! of the retry budget reaches the caller.

use serde_json::Value;
use tokio::time::{sleep, Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::extract::{extract_json_text, ExtractError};
use crate::generation::config::GenerationConfig;
use crate::generation::error::{AttemptError, AttemptRecord, GenerateError};
use crate::generation::model::{CompletionModel, CompletionRequest};
use crate::normalize::normalize;
use crate::record::LessonPlanRecord;
use crate::schema::validate;

/// Minimum plausible model response length in characters; anything shorter
/// is rejected before parsing, since there is nothing to repair.
pub const MIN_PLAUSIBLE_CHARS: usize = 50;

/// Retry progress for one [`GenerationOrchestrator::produce_record`] run.
#[derive(Debug)]
enum RetryState {
    /// Running attempt `n` (0-indexed).
    Attempting(u32),
    /// Attempt `n` failed; sleep `2^n` seconds, then run attempt `n + 1`.
    Backoff(u32),
    /// An attempt produced a validated record.
    Done(LessonPlanRecord),
    /// The final attempt failed with this cause.
    Exhausted(AttemptError),
}

/// Drives bounded retries of the full pipeline against an injected model.
///
/// An orchestrator owns nothing but its configuration; concurrent runs must
/// each use their own instance (or clone the config), as no state is shared
/// between invocations.
#[derive(Debug, Clone)]
pub struct GenerationOrchestrator {
    config: GenerationConfig,
}

impl GenerationOrchestrator {
    /// Creates an orchestrator with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: GenerationConfig::default(),
        }
    }

    /// Creates an orchestrator with the given configuration.
    #[must_use]
    pub const fn with_config(config: GenerationConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Produces a validated record, retrying with exponential backoff.
    ///
    /// A successful attempt returns immediately; no further attempts or
    /// backoff delays are consumed. `max_retries` is treated as at least 1.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Exhausted`] when every attempt failed,
    /// chaining the most recent cause and carrying the full attempt history.
    pub async fn produce_record<M>(
        &self,
        model: &M,
        prompt: &str,
    ) -> Result<LessonPlanRecord, GenerateError>
    where
        M: CompletionModel + ?Sized,
    {
        let attempts = self.config.max_retries.max(1);
        let mut history: Vec<AttemptRecord> = Vec::new();
        let mut state = RetryState::Attempting(0);

        loop {
            state = match state {
                RetryState::Attempting(n) => {
                    info!(attempt = n + 1, max = attempts, "generating lesson plan");
                    let started = Instant::now();
                    match self.attempt(model, prompt).await {
                        Ok(record) => RetryState::Done(record),
                        Err(cause) => {
                            warn!(attempt = n + 1, error = %cause, "attempt failed");
                            history.push(AttemptRecord {
                                attempt_number: n + 1,
                                cause: cause.to_string(),
                                elapsed: started.elapsed(),
                            });
                            if n + 1 < attempts {
                                RetryState::Backoff(n)
                            } else {
                                RetryState::Exhausted(cause)
                            }
                        }
                    }
                }
                RetryState::Backoff(n) => {
                    let delay = Duration::from_secs(2u64.saturating_pow(n));
                    debug!(?delay, "backing off before next attempt");
                    sleep(delay).await;
                    RetryState::Attempting(n + 1)
                }
                RetryState::Done(record) => {
                    info!("successfully generated and validated lesson plan");
                    return Ok(record);
                }
                RetryState::Exhausted(last_cause) => {
                    error!(attempts, "all generation attempts failed");
                    return Err(GenerateError::Exhausted {
                        attempts,
                        last_cause,
                        history,
                    });
                }
            };
        }
    }

    /// One full pass: invoke the model, then extract, normalize, validate.
    async fn attempt<M>(&self, model: &M, prompt: &str) -> Result<LessonPlanRecord, AttemptError>
    where
        M: CompletionModel + ?Sized,
    {
        let request = CompletionRequest {
            model: self.config.model.clone(),
            prompt: prompt.to_string(),
            temperature: self.config.temperature,
            timeout: self.config.timeout,
        };
        let content = model.complete(request).await?;
        let trimmed = content.trim();
        let length = trimmed.chars().count();
        if length < MIN_PLAUSIBLE_CHARS {
            return Err(AttemptError::InsufficientContent {
                length,
                minimum: MIN_PLAUSIBLE_CHARS,
            });
        }
        debug!(chars = length, "raw model response received");

        let json_text = extract_json_text(trimmed)?;
        let decoded: Value = serde_json::from_str(&json_text)
            .map_err(|source| ExtractError::UnrepairableContent { source })?;
        let record = normalize(&decoded)?;
        validate(&record)?;
        Ok(record)
    }
}

impl Default for GenerationOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

/// Produces a validated lesson plan record from a prompt.
///
/// This is the caller-facing surface of the crate: a pure function from
/// prompt and configuration to a validated record or a terminal error.
///
/// # Errors
///
/// Returns [`GenerateError::Exhausted`] when every attempt failed.
pub async fn generate_record<M>(
    model: &M,
    prompt: &str,
    config: GenerationConfig,
) -> Result<LessonPlanRecord, GenerateError>
where
    M: CompletionModel + ?Sized,
{
    GenerationOrchestrator::with_config(config)
        .produce_record(model, prompt)
        .await
}
