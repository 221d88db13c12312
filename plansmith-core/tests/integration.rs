//! End-to-end tests of the generation pipeline against scripted models.
//!
//! Every test runs on tokio's paused clock, so the exponential backoff is
//! deterministic and instant.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use plansmith_core::prelude::*;
use serde_json::json;
use tokio::time::Instant;

/// Replays a fixed script of responses, repeating the last entry once the
/// script is exhausted, and counts how often it was called.
struct ScriptedModel {
    script: Vec<Result<String, String>>,
    calls: AtomicUsize,
}

impl ScriptedModel {
    fn new(script: Vec<Result<String, String>>) -> Self {
        assert!(!script.is_empty());
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }

    fn always(response: &str) -> Self {
        Self::new(vec![Ok(response.to_string())])
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, CompletionError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let idx = n.min(self.script.len() - 1);
        self.script[idx].clone().map_err(CompletionError)
    }
}

const GARBAGE: &str = "I am terribly sorry, but I seem to be unable to produce a plan right now.";

fn realistic_plan() -> serde_json::Value {
    json!({
        "objectives": "Pupils will be able to describe aerobic respiration and name its inputs and outputs.",
        "teaching_materials": "Chalkboard, flip chart, respiration diagram, textbooks",
        "reference_materials": "Zambian Grade 8 Integrated Science Textbook and teacher's guide",
        "introduction": "Begin with a two-minute breathing exercise, then ask pupils what happens to the air they breathe in.",
        "lesson_development": "Step 1: Define respiration and write the word equation on the board (10 min). Step 2: Walk through the diagram and label each organ with the class (15 min). Step 3: Pupils work in pairs to trace the path of oxygen through the body (10 min). Ask checkpoint questions after each step.",
        "conclusion": "Summarize the word equation for respiration and link it back to the opening breathing exercise.",
        "recapitulation": "Ask three pupils to restate the inputs and outputs of respiration.",
        "evaluation": "Five-question oral quiz on the respiration equation.",
        "teacher_evaluation": "Note which steps ran over time and how many pupils answered the checkpoint questions.",
        "homework": "Draw and label a respiration diagram."
    })
}

fn fenced(value: &serde_json::Value) -> String {
    format!("Certainly! Here is the lesson plan you asked for:\n```json\n{value}\n```\nLet me know if you need changes.")
}

fn config(max_retries: u32) -> GenerationConfig {
    GenerationConfig::default().with_max_retries(max_retries)
}

#[tokio::test(start_paused = true)]
async fn retry_bound_is_exact() {
    let model = ScriptedModel::always(GARBAGE);
    let result = generate_record(&model, "prompt", config(3)).await;

    assert_eq!(model.calls(), 3);
    let Err(GenerateError::Exhausted {
        attempts, history, ..
    }) = result
    else {
        panic!("expected exhaustion");
    };
    assert_eq!(attempts, 3);
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].attempt_number, 1);
    assert_eq!(history[2].attempt_number, 3);
}

#[tokio::test(start_paused = true)]
async fn backoff_grows_exponentially() {
    let model = ScriptedModel::always(GARBAGE);
    let started = Instant::now();
    let _ = generate_record(&model, "prompt", config(3)).await;

    // 2^0 + 2^1 seconds of backoff; no sleep after the final attempt.
    assert_eq!(started.elapsed(), Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn early_success_skips_remaining_backoff() {
    let model = ScriptedModel::new(vec![
        Ok(GARBAGE.to_string()),
        Ok(fenced(&realistic_plan())),
    ]);
    let started = Instant::now();
    let record = generate_record(&model, "prompt", config(3))
        .await
        .unwrap_or_else(|e| panic!("expected success: {e}"));

    assert_eq!(model.calls(), 2);
    assert_eq!(started.elapsed(), Duration::from_secs(1));
    assert!(record.objectives.starts_with("Pupils will be able"));
}

#[tokio::test(start_paused = true)]
async fn short_responses_are_rejected_without_parsing() {
    let model = ScriptedModel::always("ok");
    let result = generate_record(&model, "prompt", config(2)).await;

    assert_eq!(model.calls(), 2);
    let Err(GenerateError::Exhausted {
        last_cause: AttemptError::InsufficientContent { length, minimum },
        ..
    }) = result
    else {
        panic!("expected insufficient content");
    };
    assert_eq!(length, 2);
    assert_eq!(minimum, 50);
}

#[tokio::test(start_paused = true)]
async fn model_failures_are_retried_like_any_other() {
    let model = ScriptedModel::new(vec![
        Err("connection refused".to_string()),
        Ok(fenced(&realistic_plan())),
    ]);
    let record = generate_record(&model, "prompt", config(3)).await;

    assert_eq!(model.calls(), 2);
    assert!(record.is_ok());
}

#[tokio::test(start_paused = true)]
async fn toy_response_fails_schema_validation() {
    let model = ScriptedModel::always(
        "Here you go:\n```json\n{\"objective\": \"Teach X\", \"materials\": [\"book\",\"chalk\"]}\n```",
    );
    let result = generate_record(&model, "prompt", config(1)).await;

    let Err(GenerateError::Exhausted {
        last_cause: AttemptError::Schema(violation),
        ..
    }) = result
    else {
        panic!("expected a schema violation");
    };
    // `objective` maps and flattens fine, but "Teach X" is below minimum length.
    assert_eq!(violation.field, CanonicalField::Objectives);
}

#[tokio::test(start_paused = true)]
async fn synonym_keys_and_nested_values_normalize_through() {
    let mut plan = realistic_plan();
    let object = plan.as_object_mut().unwrap();
    let objectives = object.remove("objectives").unwrap();
    object.insert("objective".to_string(), objectives);
    object.insert(
        "materials".to_string(),
        json!(["Chalkboard", "flip chart", "respiration diagram"]),
    );
    object.remove("teaching_materials");

    let model = ScriptedModel::always(&fenced(&plan));
    let record = generate_record(&model, "prompt", config(1))
        .await
        .unwrap_or_else(|e| panic!("expected success: {e}"));

    assert!(record.objectives.starts_with("Pupils will be able"));
    assert_eq!(
        record.teaching_materials,
        r#"["Chalkboard","flip chart","respiration diagram"]"#
    );
}

#[tokio::test(start_paused = true)]
async fn unknown_keys_do_not_poison_a_valid_response() {
    let mut plan = realistic_plan();
    plan.as_object_mut()
        .unwrap()
        .insert("notes_to_reviewer".to_string(), json!("ignore me"));

    let model = ScriptedModel::always(&fenced(&plan));
    let record = generate_record(&model, "prompt", config(1)).await;
    assert!(record.is_ok());
}

#[tokio::test(start_paused = true)]
async fn returned_records_always_satisfy_the_validator() {
    let model = ScriptedModel::always(&fenced(&realistic_plan()));
    let record = generate_record(&model, "prompt", config(1))
        .await
        .unwrap_or_else(|e| panic!("expected success: {e}"));
    assert!(validate(&record).is_ok());
}

#[tokio::test(start_paused = true)]
async fn exhaustion_chains_the_underlying_cause() {
    let model = ScriptedModel::always(GARBAGE);
    let Err(err) = generate_record(&model, "prompt", config(1)).await else {
        panic!("expected exhaustion");
    };
    assert!(std::error::Error::source(&err).is_some());
}

#[tokio::test(start_paused = true)]
async fn zero_retries_still_makes_one_attempt() {
    let model = ScriptedModel::always(GARBAGE);
    let result = generate_record(&model, "prompt", config(0)).await;
    assert_eq!(model.calls(), 1);
    assert!(result.is_err());
}

#[tokio::test(start_paused = true)]
async fn near_json_responses_are_repaired_end_to_end() {
    // Single quotes, an unquoted key, a trailing comma, and a truncated
    // closing fence, all in one response.
    let response = "```json\n{\n  'objective': 'Pupils will be able to describe aerobic respiration in detail.',\n  teaching_materials: 'Chalkboard, flip chart, respiration diagram, textbooks',\n  'reference_materials': 'Zambian Grade 8 Integrated Science Textbook and guide',\n  'introduction': 'Begin with a two-minute breathing exercise before the main activity.',\n  'lesson_development': 'Step 1: Define respiration (10 min). Step 2: Label the diagram together (15 min). Step 3: Pair work tracing oxygen (10 min).',\n  'conclusion': 'Summarize the word equation for respiration with the class.',\n  'recapitulation': 'Ask pupils to restate the equation.',\n  'evaluation': 'Oral quiz with five questions.',\n  'teacher_evaluation': 'Note pacing and participation.',\n  'homework': 'Draw and label a respiration diagram.',\n}";
    let model = ScriptedModel::always(response);
    let record = generate_record(&model, "prompt", config(1))
        .await
        .unwrap_or_else(|e| panic!("expected success: {e}"));
    assert!(record.objectives.contains("aerobic respiration"));
    assert!(record.homework.contains("respiration diagram"));
}
