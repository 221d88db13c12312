//! Error taxonomy for generation, with attempt history for diagnostics.

use std::time::Duration;

use thiserror::Error;

use crate::extract::ExtractError;
use crate::generation::model::CompletionError;
use crate::normalize::NormalizeError;
use crate::schema::SchemaViolation;

/// Why a single attempt failed.
///
/// Every variant is attempt-local: the orchestrator catches it, records it,
/// and retries. None of these escape to the caller directly; the last one is
/// chained into [`GenerateError::Exhausted`] when the retry budget runs out.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// The inference service itself failed (timeout, connection, bad status).
    #[error(transparent)]
    Completion(#[from] CompletionError),

    /// Model output was empty or too short to plausibly contain a plan.
    #[error("insufficient content: model returned {length} chars (minimum {minimum})")]
    InsufficientContent {
        /// Trimmed response length in characters.
        length: usize,
        /// The minimum plausible length.
        minimum: usize,
    },

    /// No valid JSON could be recovered from the response text.
    #[error(transparent)]
    Unrepairable(#[from] ExtractError),

    /// The decoded JSON was not an object.
    #[error(transparent)]
    Shape(#[from] NormalizeError),

    /// The flattened record violated a field constraint.
    #[error(transparent)]
    Schema(#[from] SchemaViolation),
}

/// Record of one failed attempt.
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    /// The attempt number (1-indexed).
    pub attempt_number: u32,
    /// Rendered failure cause for this attempt.
    pub cause: String,
    /// Time the attempt took.
    pub elapsed: Duration,
}

/// Terminal generation failure, the only error a caller sees.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Every attempt failed; the most recent cause is chained as the source.
    #[error("generation exhausted after {attempts} attempts")]
    Exhausted {
        /// Number of attempts made.
        attempts: u32,
        /// The failure that ended the final attempt.
        #[source]
        last_cause: AttemptError,
        /// All failed attempts, oldest first.
        history: Vec<AttemptRecord>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn exhausted_chains_the_last_cause() {
        let err = GenerateError::Exhausted {
            attempts: 3,
            last_cause: AttemptError::InsufficientContent {
                length: 4,
                minimum: 50,
            },
            history: Vec::new(),
        };
        assert!(err.to_string().contains("3 attempts"));
        let source = err.source().map(ToString::to_string);
        assert!(source.is_some_and(|s| s.contains("insufficient content")));
    }

    #[test]
    fn attempt_errors_render_their_stage() {
        let err = AttemptError::from(CompletionError("connection refused".to_string()));
        assert!(err.to_string().contains("connection refused"));
    }
}
