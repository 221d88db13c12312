//! Instruction-prompt composition from lesson parameters.

use std::fmt::Write as _;

use crate::record::CanonicalField;

const BASE_PROMPT: &str = r#"You are an experienced Zambian teacher with expertise in curriculum development.

Generate a lesson plan as a SINGLE VALID JSON object with exactly these fields:
{fields}

CRITICAL INSTRUCTIONS:
1. Return ONLY one valid JSON object, no extra text, markdown, or multiple objects.
2. Use standard ASCII double quotes (") only.
3. Use EXACT field names as listed (e.g., 'objectives', not 'objective').
4. All values must be strings, not objects or arrays. Combine nested content into a single string with spaces instead of newlines.
5. Ensure all string values are properly escaped and meet length requirements (e.g., objectives: 10-2000 characters).
6. Make content specific to the Zambian educational context.
7. For "lesson_development", include step-by-step teaching activities, expected student responses, interaction methods, and assessment checkpoints as a single string.

Lesson Parameters:
{details}

Example JSON structure:
{
  "objectives": "Students will understand the process of respiration.",
  "teaching_materials": "Chalkboard, markers, respiration diagram",
  "reference_materials": "Zambian Grade 8 Science Textbook",
  "introduction": "Discuss breathing with a Think-Pair-Share activity.",
  "lesson_development": "Step 1: Explain respiration (10 min). Step 2: Show diagram (15 min).",
  "conclusion": "Summarize the role of oxygen in respiration.",
  "recapitulation": "Ask students to explain respiration.",
  "evaluation": "Quiz on respiration components.",
  "teacher_evaluation": "Reflect on student engagement.",
  "homework": "Draw a respiration diagram."
}
"#;

/// Composes the instruction prompt from user-supplied lesson parameters.
///
/// Parameters are rendered in the order given, one per line, with their keys
/// title-cased; parameters with empty values are omitted rather than shown
/// as blank lines. Always produces text - there is no failure mode.
#[must_use]
pub fn build_prompt<'a, I>(parameters: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut fields = String::new();
    for field in CanonicalField::ALL {
        let _ = writeln!(fields, "  - {field}");
    }

    let mut details = String::new();
    for (key, value) in parameters {
        if value.trim().is_empty() {
            continue;
        }
        let _ = writeln!(details, "  - {}: {}", title_case(key), value);
    }

    BASE_PROMPT
        .replacen("{fields}", fields.trim_end(), 1)
        .replacen("{details}", details.trim_end(), 1)
}

/// `teacher_name` -> `Teacher Name`.
fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
