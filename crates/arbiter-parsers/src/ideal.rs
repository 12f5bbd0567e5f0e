use arbiter_core::{ArbiterError, IdealCategory, IdealChoice};
use schemars::JsonSchema;
use serde_json::Value;

use crate::contract::{as_object, text_field};
use crate::{OutputContract, SchemaDescription};

#[allow(dead_code)]
#[derive(JsonSchema)]
struct IdealReply {
    choice: Category,
    /// Why this category was chosen.
    reason: String,
}

#[allow(dead_code)]
#[derive(JsonSchema)]
#[serde(rename_all = "kebab-case")]
enum Category {
    SubsetConsistent,
    SupersetConsistent,
    FullyEquivalent,
    Disagreement,
    ImmaterialDifference,
}

/// Contract for the ideal-answer strategy: one category and its reason.
///
/// The model's categorical choice is taken as given; only an out-of-set
/// value or a missing reason is a violation.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdealAnswerContract;

impl IdealAnswerContract {
    pub fn new() -> Self {
        Self
    }
}

impl OutputContract for IdealAnswerContract {
    type Output = IdealChoice;

    fn describe(&self) -> SchemaDescription {
        SchemaDescription::new(
            "ideal_answer_evaluation",
            Value::from(schemars::schema_for!(IdealReply)),
        )
    }

    fn validate(&self, reply: &Value) -> Result<IdealChoice, ArbiterError> {
        let root = as_object(reply, "$")?;
        let choice: IdealCategory = text_field(root, "choice", "")?.parse()?;
        let reason = text_field(root, "reason", "")?;
        Ok(IdealChoice { choice, reason })
    }
}
