//! Commonly used types and functions for ergonomic imports.

pub use crate::extract::{extract_json_text, repair_json, ExtractError};
pub use crate::generation::{
    generate_record, AttemptError, AttemptRecord, CompletionError, CompletionModel,
    CompletionRequest, GenerateError, GenerationConfig, GenerationOrchestrator,
};
pub use crate::normalize::{normalize, NormalizeError};
pub use crate::prompt::build_prompt;
pub use crate::record::{CanonicalField, LessonPlanRecord};
pub use crate::sanitize::{sanitize, sanitize_value};
pub use crate::schema::{validate, FieldConstraint, SchemaViolation};
