//! The validated record type and its ten canonical fields.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the ten fixed fields a valid lesson plan record contains.
///
/// Every component of the pipeline refers to fields through this enum rather
/// than bare strings, so a typo cannot silently introduce an eleventh field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    /// What the pupils should be able to do after the lesson.
    Objectives,
    /// Physical and visual aids used during teaching.
    TeachingMaterials,
    /// Textbooks and syllabus documents the lesson draws on.
    ReferenceMaterials,
    /// How the lesson opens.
    Introduction,
    /// The step-by-step body of the lesson.
    LessonDevelopment,
    /// How the lesson closes.
    Conclusion,
    /// Recap of the key points with the pupils.
    Recapitulation,
    /// How pupil understanding is assessed.
    Evaluation,
    /// The teacher's own reflection on the lesson.
    TeacherEvaluation,
    /// Work assigned for home.
    Homework,
}

impl CanonicalField {
    /// All ten fields in record order.
    pub const ALL: [Self; 10] = [
        Self::Objectives,
        Self::TeachingMaterials,
        Self::ReferenceMaterials,
        Self::Introduction,
        Self::LessonDevelopment,
        Self::Conclusion,
        Self::Recapitulation,
        Self::Evaluation,
        Self::TeacherEvaluation,
        Self::Homework,
    ];

    /// The snake_case name used in JSON, prompts, and log output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Objectives => "objectives",
            Self::TeachingMaterials => "teaching_materials",
            Self::ReferenceMaterials => "reference_materials",
            Self::Introduction => "introduction",
            Self::LessonDevelopment => "lesson_development",
            Self::Conclusion => "conclusion",
            Self::Recapitulation => "recapitulation",
            Self::Evaluation => "evaluation",
            Self::TeacherEvaluation => "teacher_evaluation",
            Self::Homework => "homework",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lesson plan: exactly ten named text fields.
///
/// Instances are assembled by [`crate::normalize::normalize`] and gated by
/// [`crate::schema::validate`]; a record returned from
/// [`crate::generation::generate_record`] has always passed validation.
/// Deserialization rejects unknown keys and missing fields, so a record
/// cannot be built with any key set other than the canonical ten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LessonPlanRecord {
    /// What the pupils should be able to do after the lesson.
    pub objectives: String,
    /// Physical and visual aids used during teaching.
    pub teaching_materials: String,
    /// Textbooks and syllabus documents the lesson draws on.
    pub reference_materials: String,
    /// How the lesson opens.
    pub introduction: String,
    /// The step-by-step body of the lesson.
    pub lesson_development: String,
    /// How the lesson closes.
    pub conclusion: String,
    /// Recap of the key points with the pupils.
    pub recapitulation: String,
    /// How pupil understanding is assessed.
    pub evaluation: String,
    /// The teacher's own reflection on the lesson.
    pub teacher_evaluation: String,
    /// Work assigned for home.
    pub homework: String,
}

impl LessonPlanRecord {
    /// Value of one canonical field.
    #[must_use]
    pub fn get(&self, field: CanonicalField) -> &str {
        match field {
            CanonicalField::Objectives => &self.objectives,
            CanonicalField::TeachingMaterials => &self.teaching_materials,
            CanonicalField::ReferenceMaterials => &self.reference_materials,
            CanonicalField::Introduction => &self.introduction,
            CanonicalField::LessonDevelopment => &self.lesson_development,
            CanonicalField::Conclusion => &self.conclusion,
            CanonicalField::Recapitulation => &self.recapitulation,
            CanonicalField::Evaluation => &self.evaluation,
            CanonicalField::TeacherEvaluation => &self.teacher_evaluation,
            CanonicalField::Homework => &self.homework,
        }
    }

    /// Replaces the value of one canonical field.
    pub fn set(&mut self, field: CanonicalField, value: String) {
        let slot = match field {
            CanonicalField::Objectives => &mut self.objectives,
            CanonicalField::TeachingMaterials => &mut self.teaching_materials,
            CanonicalField::ReferenceMaterials => &mut self.reference_materials,
            CanonicalField::Introduction => &mut self.introduction,
            CanonicalField::LessonDevelopment => &mut self.lesson_development,
            CanonicalField::Conclusion => &mut self.conclusion,
            CanonicalField::Recapitulation => &mut self.recapitulation,
            CanonicalField::Evaluation => &mut self.evaluation,
            CanonicalField::TeacherEvaluation => &mut self.teacher_evaluation,
            CanonicalField::Homework => &mut self.homework,
        };
        *slot = value;
    }

    /// Field name/value pairs in record order.
    #[must_use]
    pub fn fields(&self) -> [(CanonicalField, &str); 10] {
        CanonicalField::ALL.map(|field| (field, self.get(field)))
    }

    /// A copy with every field passed through the HTML sanitizer, ready for
    /// direct display.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let mut clean = Self::default();
        for (field, value) in self.fields() {
            clean.set(field, crate::sanitize::sanitize(value));
        }
        clean
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_are_distinct() {
        let mut names: Vec<&str> = CanonicalField::ALL.iter().map(|f| f.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 10);
    }

    #[test]
    fn get_and_set_round_trip() {
        let mut record = LessonPlanRecord::default();
        record.set(CanonicalField::Homework, "Draw a respiration diagram.".to_string());
        assert_eq!(record.get(CanonicalField::Homework), "Draw a respiration diagram.");
        assert_eq!(record.get(CanonicalField::Objectives), "");
    }

    #[test]
    fn fields_follow_record_order() {
        let record = LessonPlanRecord::default();
        let fields = record.fields();
        assert_eq!(fields[0].0, CanonicalField::Objectives);
        assert_eq!(fields[9].0, CanonicalField::Homework);
    }

    #[test]
    fn deserialization_rejects_unknown_keys() {
        let json = r#"{
            "objectives": "", "teaching_materials": "", "reference_materials": "",
            "introduction": "", "lesson_development": "", "conclusion": "",
            "recapitulation": "", "evaluation": "", "teacher_evaluation": "",
            "homework": "", "extra": "surplus"
        }"#;
        assert!(serde_json::from_str::<LessonPlanRecord>(json).is_err());
    }

    #[test]
    fn deserialization_rejects_missing_keys() {
        let json = r#"{"objectives": "only one field"}"#;
        assert!(serde_json::from_str::<LessonPlanRecord>(json).is_err());
    }

    #[test]
    fn sanitized_copies_strip_markup_from_every_field() {
        let mut record = LessonPlanRecord::default();
        record.set(
            CanonicalField::Introduction,
            "<script>alert(1)</script><p>Warm-up</p>".to_string(),
        );
        let clean = record.sanitized();
        assert_eq!(clean.get(CanonicalField::Introduction), "<p>Warm-up</p>");
    }
}
