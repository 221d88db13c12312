//! Static per-field constraints and the procedural validator.
//!
//! The constraint set is fixed configuration, not runtime state: every field
//! carries an inclusive character-length range and the value shape accepted
//! before flattening. Validation is the single hard gate of the pipeline -
//! the normalizer upstream never fails on weak input, this module does.

use thiserror::Error;

use crate::record::{CanonicalField, LessonPlanRecord};

/// Value shape a field accepts before flattening. Post-flatten, every field
/// is checked as a string regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptedShape {
    /// A plain string only.
    Text,
    /// A string or an array.
    TextOrSequence,
    /// A string or an object.
    TextOrMap,
    /// A string, an object, or an array.
    TextSequenceOrMap,
}

/// Inclusive length bounds and accepted pre-flatten shape for one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldConstraint {
    /// Minimum value length in characters, inclusive.
    pub min_chars: usize,
    /// Maximum value length in characters, inclusive.
    pub max_chars: usize,
    /// Shape accepted before flattening.
    pub shape: AcceptedShape,
}

impl CanonicalField {
    /// The static constraint for this field.
    #[must_use]
    pub const fn constraint(self) -> FieldConstraint {
        use AcceptedShape::{Text, TextOrMap, TextOrSequence, TextSequenceOrMap};
        let (min_chars, max_chars, shape) = match self {
            Self::Objectives => (10, 2000, Text),
            Self::TeachingMaterials => (5, 1000, TextSequenceOrMap),
            Self::ReferenceMaterials => (5, 1000, TextOrSequence),
            Self::Introduction => (20, 1500, TextOrMap),
            Self::LessonDevelopment => (50, 5000, TextOrMap),
            Self::Conclusion => (20, 1500, Text),
            Self::Recapitulation => (10, 1000, Text),
            Self::Evaluation => (10, 1000, Text),
            Self::TeacherEvaluation => (10, 1000, Text),
            Self::Homework => (5, 1000, Text),
        };
        FieldConstraint {
            min_chars,
            max_chars,
            shape,
        }
    }
}

/// A field value outside its configured constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("schema violation on `{field}`: {reason}")]
pub struct SchemaViolation {
    /// The offending field.
    pub field: CanonicalField,
    /// What the value did wrong, with the bound it broke.
    pub reason: String,
}

/// Checks every field of `record` against the static constraint table,
/// reporting the first violation found in record order.
///
/// The exact-key-set half of the contract is structural: a
/// [`LessonPlanRecord`] cannot hold extra or missing fields, and its
/// `Deserialize` impl rejects both on the wire.
///
/// # Errors
///
/// Returns [`SchemaViolation`] naming the field and the broken bound.
pub fn validate(record: &LessonPlanRecord) -> Result<(), SchemaViolation> {
    for (field, value) in record.fields() {
        let constraint = field.constraint();
        let length = value.chars().count();
        if length < constraint.min_chars {
            return Err(SchemaViolation {
                field,
                reason: format!(
                    "length {length} below minimum {min}",
                    min = constraint.min_chars
                ),
            });
        }
        if length > constraint.max_chars {
            return Err(SchemaViolation {
                field,
                reason: format!(
                    "length {length} above maximum {max}",
                    max = constraint.max_chars
                ),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with(field: CanonicalField, value: &str) -> LessonPlanRecord {
        let mut record = minimal_valid_record();
        record.set(field, value.to_string());
        record
    }

    /// A record where every field sits exactly on its minimum length.
    fn minimal_valid_record() -> LessonPlanRecord {
        let mut record = LessonPlanRecord::default();
        for field in CanonicalField::ALL {
            record.set(field, "x".repeat(field.constraint().min_chars));
        }
        record
    }

    #[test]
    fn minimum_length_is_inclusive() {
        assert!(validate(&minimal_valid_record()).is_ok());
    }

    #[test]
    fn one_below_minimum_fails() {
        let min = CanonicalField::Objectives.constraint().min_chars;
        let record = record_with(CanonicalField::Objectives, &"x".repeat(min - 1));
        let violation = validate(&record).unwrap_err();
        assert_eq!(violation.field, CanonicalField::Objectives);
        assert!(violation.reason.contains("below minimum"));
    }

    #[test]
    fn maximum_length_is_inclusive() {
        let max = CanonicalField::Homework.constraint().max_chars;
        let record = record_with(CanonicalField::Homework, &"x".repeat(max));
        assert!(validate(&record).is_ok());
    }

    #[test]
    fn one_above_maximum_fails() {
        let max = CanonicalField::Homework.constraint().max_chars;
        let record = record_with(CanonicalField::Homework, &"x".repeat(max + 1));
        let violation = validate(&record).unwrap_err();
        assert_eq!(violation.field, CanonicalField::Homework);
        assert!(violation.reason.contains("above maximum"));
    }

    #[test]
    fn length_is_measured_in_characters_not_bytes() {
        let min = CanonicalField::Homework.constraint().min_chars;
        // Multi-byte characters still count one each.
        let record = record_with(CanonicalField::Homework, &"\u{4f60}".repeat(min));
        assert!(validate(&record).is_ok());
    }

    #[test]
    fn first_violation_in_record_order_is_reported() {
        let mut record = minimal_valid_record();
        record.set(CanonicalField::Objectives, String::new());
        record.set(CanonicalField::Homework, String::new());
        let violation = validate(&record).unwrap_err();
        assert_eq!(violation.field, CanonicalField::Objectives);
    }

    #[test]
    fn empty_record_fails_on_the_first_field() {
        let violation = validate(&LessonPlanRecord::default()).unwrap_err();
        assert_eq!(violation.field, CanonicalField::Objectives);
    }
}
