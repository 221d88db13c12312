//! # plansmith-core
//!
//! Schema-conformant lesson plan records from unreliable language-model
//! output.
//!
//! A generative model asked for structured JSON will, often enough, return
//! malformed JSON, extraneous prose, synonym field names, and nested values
//! where strings were requested. This crate turns such free text into a
//! guaranteed-valid [`record::LessonPlanRecord`] of ten named text fields:
//!
//! 1. [`extract`] strips markdown fences and repairs near-JSON into strict
//!    JSON text;
//! 2. [`normalize`] maps synonym keys onto the ten canonical fields and
//!    flattens nested values to strings;
//! 3. [`schema`] checks every field against its static length constraints;
//! 4. [`generation`] drives invoke-extract-normalize-validate attempts with
//!    exponential backoff until one succeeds or the retry budget runs out.
//!
//! The model itself is an injected [`generation::CompletionModel`]; see the
//! `plansmith-ollama` crate for a client speaking to a local Ollama daemon.
//!
//! ## Example
//!
//! ```no_run
//! use plansmith_core::prelude::*;
//!
//! # async fn example(model: &dyn CompletionModel) -> Result<(), GenerateError> {
//! let prompt = build_prompt([
//!     ("subject", "Integrated Science"),
//!     ("grade", "8"),
//!     ("topic", "Respiration"),
//! ]);
//! let record = generate_record(model, &prompt, GenerationConfig::default()).await?;
//! assert!(!record.objectives.is_empty());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

/// Fence stripping and JSON repair for raw model output.
pub mod extract;

/// Retry orchestration, configuration, and the completion-model seam.
pub mod generation;

/// Synonym key mapping and value flattening.
pub mod normalize;

/// Commonly used types and functions.
pub mod prelude;

/// Instruction-prompt composition.
pub mod prompt;

/// The validated record type and its canonical fields.
pub mod record;

/// Allow-list HTML sanitization for record text.
pub mod sanitize;

/// Static field constraints and validation.
pub mod schema;
