//! Quiz data types and schema-validated parsing of generated quizzes.
//!
//! The generation service returns unstructured text expected to encode a
//! [`QuizSet`]. That boundary is the most fragile one in the system, so the
//! text goes through three checks before it is trusted: JSON parse, JSON
//! Schema validation, and programmatic shape validation.

use std::collections::BTreeMap;

use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use tutor_core::json::strip_code_fence;

use crate::error::{Result, StudyError};

/// The four option labels every question must carry.
pub const OPTION_LABELS: [&str; 4] = ["a", "b", "c", "d"];

/// One multiple-choice question.
///
/// Invariant (enforced at parse time): exactly the four labels `a`–`d` are
/// present and `correct_answer` is one of them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuizQuestion {
    /// The question text.
    pub question: String,
    /// The four labeled answer choices.
    pub options: BTreeMap<String, String>,
    /// The label of the single correct choice.
    pub correct_answer: String,
}

impl QuizQuestion {
    /// Check the per-question shape invariants.
    fn validate_shape(&self) -> std::result::Result<(), String> {
        if self.question.trim().is_empty() {
            return Err("question text is empty".into());
        }
        if self.options.len() != OPTION_LABELS.len() {
            return Err(format!("expected 4 options, found {}", self.options.len()));
        }
        for label in OPTION_LABELS {
            if !self.options.contains_key(label) {
                return Err(format!("missing option label '{label}'"));
            }
        }
        if !self.options.contains_key(self.correct_answer.as_str()) {
            return Err(format!("correct_answer '{}' is not an option label", self.correct_answer));
        }
        Ok(())
    }
}

/// An ordered, immutable set of generated questions.
///
/// The single source of truth for grading. Serde round-trips preserve order
/// and structural equality.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuizSet {
    /// The questions, in generated order.
    pub questions: Vec<QuizQuestion>,
}

impl QuizSet {
    /// Number of questions in the set.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the set holds no questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Parse and validate generated text into a quiz set.
    ///
    /// Accepts the JSON either bare or wrapped in a markdown code fence.
    /// Any parse, schema, or shape violation fails the whole batch with
    /// [`StudyError::QuizFormat`]; there is no partial-question recovery.
    pub fn parse(text: &str) -> Result<Self> {
        let payload = strip_code_fence(text);

        let value: Value = serde_json::from_str(payload)
            .map_err(|e| StudyError::QuizFormat(format!("response is not valid JSON: {e}")))?;

        let validator = Validator::new(&quiz_schema())
            .map_err(|e| StudyError::QuizFormat(format!("internal schema error: {e}")))?;
        if let Err(error) = validator.validate(&value) {
            return Err(StudyError::QuizFormat(format!("schema validation failed: {error}")));
        }

        let set: QuizSet = serde_json::from_value(value)
            .map_err(|e| StudyError::QuizFormat(format!("unexpected quiz structure: {e}")))?;

        for (i, question) in set.questions.iter().enumerate() {
            question
                .validate_shape()
                .map_err(|e| StudyError::QuizFormat(format!("question {}: {e}", i + 1)))?;
        }

        Ok(set)
    }
}

/// JSON Schema for the expected quiz payload.
pub fn quiz_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "questions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "question": { "type": "string" },
                        "options": {
                            "type": "object",
                            "properties": {
                                "a": { "type": "string" },
                                "b": { "type": "string" },
                                "c": { "type": "string" },
                                "d": { "type": "string" }
                            },
                            "required": ["a", "b", "c", "d"],
                            "additionalProperties": false
                        },
                        "correct_answer": { "type": "string", "enum": ["a", "b", "c", "d"] }
                    },
                    "required": ["question", "options", "correct_answer"]
                }
            }
        },
        "required": ["questions"]
    })
}
