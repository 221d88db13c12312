//! Mapping arbitrary decoded objects onto the ten canonical fields.
//!
//! Models rename fields (`objective`, `materials`, `recap`), nest values that
//! were asked for as strings, and invent keys nobody asked for. This pass is
//! deliberately soft: recognized keys are mapped through a fixed synonym
//! table, unrecognized keys are logged and dropped, nested values are
//! flattened to text, and absent fields default to the empty string. The
//! schema validator is the hard gate that follows.

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::record::{CanonicalField, LessonPlanRecord};

/// Normalization failure: the decoded response was not an object at all.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The decoded JSON was something other than an object.
    #[error("invalid response shape: expected a JSON object, got {got}")]
    InvalidResponseShape {
        /// JSON type name of what actually arrived.
        got: &'static str,
    },
}

/// Maps a decoded response onto exactly the ten canonical fields.
///
/// The output always contains all ten fields as flat strings; fields the
/// model failed to supply are empty. This function never fails for any
/// object input, including the empty object.
///
/// # Errors
///
/// Returns [`NormalizeError::InvalidResponseShape`] when `decoded` is not an
/// object.
pub fn normalize(decoded: &Value) -> Result<LessonPlanRecord, NormalizeError> {
    let Value::Object(map) = decoded else {
        return Err(NormalizeError::InvalidResponseShape {
            got: json_type_name(decoded),
        });
    };

    let mut record = LessonPlanRecord::default();
    let mut seen: Vec<CanonicalField> = Vec::new();
    for (key, value) in map {
        match canonical_for(key) {
            Some(field) => {
                record.set(field, flatten_value(value));
                seen.push(field);
            }
            None => warn!(%key, "ignoring unrecognized key in model response"),
        }
    }
    for field in CanonicalField::ALL {
        if !seen.contains(&field) {
            warn!(field = %field, "field missing from model response, defaulting to empty");
        }
    }
    Ok(record)
}

/// Looks up the canonical field for a response key, case-insensitively.
///
/// The synonym table is fixed; keys outside it have no canonical home and
/// are dropped by [`normalize`].
#[must_use]
pub fn canonical_for(key: &str) -> Option<CanonicalField> {
    match key.to_lowercase().as_str() {
        "objectives" | "objective" | "learning_objectives" | "lesson_objectives" => {
            Some(CanonicalField::Objectives)
        }
        "teaching_materials" | "materials" | "resources" => {
            Some(CanonicalField::TeachingMaterials)
        }
        "reference_materials" | "references" | "bibliography" => {
            Some(CanonicalField::ReferenceMaterials)
        }
        "introduction" => Some(CanonicalField::Introduction),
        "lesson_development" | "development" | "main_lesson" => {
            Some(CanonicalField::LessonDevelopment)
        }
        "conclusion" | "summary" => Some(CanonicalField::Conclusion),
        // `recapulation` is a misspelling models produce often enough to map.
        "recapitulation" | "recapulation" | "recap" | "review" => {
            Some(CanonicalField::Recapitulation)
        }
        "evaluation" | "assessment" => Some(CanonicalField::Evaluation),
        "teacher_evaluation" | "reflection" => Some(CanonicalField::TeacherEvaluation),
        "homework" | "assignment" | "home_work" => Some(CanonicalField::Homework),
        _ => None,
    }
}

/// Flattens any JSON value to a single line of text.
///
/// Nested structures are serialized to compact JSON; scalars are rendered
/// directly; `null` becomes the empty string (an absent value, not the word
/// "null"). Embedded newlines collapse to spaces either way.
#[must_use]
pub fn flatten_value(value: &Value) -> String {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        nested @ (Value::Object(_) | Value::Array(_)) => nested.to_string(),
        scalar => scalar.to_string(),
    };
    text.replace(['\n', '\r'], " ").trim().to_string()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
