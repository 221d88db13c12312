//! Isolating JSON text from free-form model output.
//!
//! A model asked for "only JSON" still tends to reply with prose, markdown
//! fences, or both. Extraction peels at most one fence layer off the raw
//! response, runs the [`repair`] pass over what remains, and confirms the
//! result actually parses before anything downstream sees it.

pub mod repair;

use thiserror::Error;
use tracing::{debug, warn};

pub use repair::repair_json;

/// Extraction failure: nothing resembling valid JSON could be recovered.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The response text could not be coerced to valid JSON even after repair.
    #[error("unrepairable content: {source}")]
    UnrepairableContent {
        /// The parse failure reported for the repaired text.
        #[source]
        source: serde_json::Error,
    },
}

/// Recovers strict JSON text from a raw model response.
///
/// Steps, in order:
/// 1. strip a leading byte-order mark and surrounding whitespace;
/// 2. strip at most one fence layer, trying a ```` ```json ```` block, then
///    any ```` ``` ```` block, then an inline `` ` `` span - the first
///    pattern that matches wins and the others are not applied;
/// 3. run the tolerant repair pass;
/// 4. confirm the repaired text parses as JSON.
///
/// Stripping at most one fence layer keeps legitimate backticks inside field
/// values intact.
///
/// # Errors
///
/// Returns [`ExtractError::UnrepairableContent`] when the repaired text still
/// fails to parse.
pub fn extract_json_text(raw: &str) -> Result<String, ExtractError> {
    let trimmed = raw.trim_start_matches('\u{feff}').trim();
    let candidate = strip_fences(trimmed);
    let repaired = repair_json(candidate);
    match serde_json::from_str::<serde_json::Value>(&repaired) {
        Ok(_) => {
            debug!(chars = repaired.chars().count(), "recovered JSON text");
            Ok(repaired)
        }
        Err(source) => {
            warn!(error = %source, "response text could not be repaired into JSON");
            Err(ExtractError::UnrepairableContent { source })
        }
    }
}

/// Applies the first matching fence pattern, or returns the text unchanged.
fn strip_fences(text: &str) -> &str {
    if let Some(inner) = labeled_fence(text) {
        return inner;
    }
    if let Some(inner) = between(text, "```", "```") {
        return inner;
    }
    if let Some(inner) = between(text, "`", "`") {
        return inner;
    }
    text
}

/// Content of a ```` ```json ```` block; tolerates a missing closing fence.
fn labeled_fence(text: &str) -> Option<&str> {
    let start = text.find("```json")? + "```json".len();
    let rest = &text[start..];
    let inner = rest.find("```").map_or(rest, |end| &rest[..end]);
    Some(inner.trim())
}

/// Content between the first `open` marker and the following `close` marker;
/// tolerates a missing `close` by taking the rest of the text.
fn between<'a>(text: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let start = text.find(open)? + open.len();
    let rest = &text[start..];
    let inner = rest.find(close).map_or(rest, |end| &rest[..end]);
    Some(inner.trim())
}
