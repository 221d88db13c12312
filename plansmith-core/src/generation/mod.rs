//! Retry-driven record generation.
//!
//! This module owns the recovery state machine around the normalization
//! pipeline:
//!
//! - [`GenerationOrchestrator`] - bounded retry loop with exponential backoff
//! - [`GenerationConfig`] - model, retry budget, timeout, temperature
//! - [`CompletionModel`] - the injected inference-service seam
//! - [`GenerateError`] / [`AttemptError`] - terminal and attempt-local errors
//! - [`generate_record`] - the caller-facing entry point

pub mod config;
pub mod error;
pub mod model;
pub mod orchestrator;

pub use config::{GenerationConfig, DEFAULT_MODEL};
pub use error::{AttemptError, AttemptRecord, GenerateError};
pub use model::{CompletionError, CompletionModel, CompletionRequest};
pub use orchestrator::{generate_record, GenerationOrchestrator, MIN_PLAUSIBLE_CHARS};
