use std::ops::RangeInclusive;

use arbiter_core::{ArbiterError, QuestionScore};
use schemars::JsonSchema;
use serde_json::Value;

use crate::contract::{array_field, as_object, score_field, text_field};
use crate::{OutputContract, SchemaDescription};

pub const MIN_QUESTIONS: usize = 3;
pub const MAX_QUESTIONS: usize = 7;

#[allow(dead_code)]
#[derive(JsonSchema)]
struct QagReply {
    /// Generated probe questions with their scores.
    #[schemars(length(min = 3, max = 7))]
    questions: Vec<QuestionEntry>,
}

#[allow(dead_code)]
#[derive(JsonSchema)]
struct QuestionEntry {
    /// The generated probe question.
    question: String,
    #[schemars(range(min = 0, max = 100))]
    accuracy: u8,
    #[schemars(range(min = 0, max = 100))]
    completeness: u8,
    #[schemars(range(min = 0, max = 100))]
    relevance: u8,
    /// Why these scores were given.
    reasoning: String,
}

/// Contract for question-answer generation: 3 to 7 scored questions, kept
/// in the order the model produced them. Counts outside the range are a
/// violation; nothing is truncated or padded.
#[derive(Debug, Clone, Copy, Default)]
pub struct QagContract;

impl QagContract {
    pub fn new() -> Self {
        Self
    }

    pub fn question_range(&self) -> RangeInclusive<usize> {
        MIN_QUESTIONS..=MAX_QUESTIONS
    }
}

impl OutputContract for QagContract {
    type Output = Vec<QuestionScore>;

    fn describe(&self) -> SchemaDescription {
        SchemaDescription::new(
            "qag_evaluation",
            Value::from(schemars::schema_for!(QagReply)),
        )
    }

    fn validate(&self, reply: &Value) -> Result<Vec<QuestionScore>, ArbiterError> {
        let root = as_object(reply, "$")?;
        let entries = array_field(root, "questions", "")?;
        if !self.question_range().contains(&entries.len()) {
            return Err(ArbiterError::schema_violation(
                "questions",
                format!(
                    "expected {MIN_QUESTIONS} to {MAX_QUESTIONS} entries, got {}",
                    entries.len()
                ),
            ));
        }

        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let path = format!("questions[{i}]");
                let entry = as_object(entry, &path)?;
                Ok(QuestionScore {
                    question: text_field(entry, "question", &path)?,
                    accuracy: score_field(entry, "accuracy", &path)?,
                    completeness: score_field(entry, "completeness", &path)?,
                    relevance: score_field(entry, "relevance", &path)?,
                    reasoning: text_field(entry, "reasoning", &path)?,
                })
            })
            .collect()
    }
}
