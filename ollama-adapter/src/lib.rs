//! # plansmith-ollama
//!
//! Ollama chat client implementing `plansmith-core`'s
//! [`CompletionModel`](plansmith_core::generation::CompletionModel) seam.
//!
//! The core pipeline treats the model as an opaque text-completion service;
//! this crate is the concrete service for a local Ollama daemon. Model
//! identifier, temperature, and timeout all travel with each request, taken
//! from the caller's `GenerationConfig`.
//!
//! ## Example
//!
//! ```no_run
//! use plansmith_core::prelude::*;
//! use plansmith_ollama::OllamaClient;
//!
//! # async fn example() -> Result<(), GenerateError> {
//! let client = OllamaClient::new();
//! let prompt = build_prompt([("subject", "Integrated Science"), ("grade", "8")]);
//! let record = generate_record(&client, &prompt, GenerationConfig::default()).await?;
//! # let _ = record;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

/// The HTTP client.
pub mod client;

/// Client error types.
pub mod error;

/// Wire types for the chat API.
pub mod types;

pub use client::{OllamaClient, DEFAULT_BASE_URL};
pub use error::OllamaError;
