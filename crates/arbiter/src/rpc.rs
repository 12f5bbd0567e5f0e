use arbiter_core::{ConversationTurn, IdealChoice, Outcome, QuestionScore, ReferenceData, ScoreItem};
use arbiter_eval::{IdealAnswerRequest, QagRequest, RubricRequest};
use serde::{Deserialize, Serialize};

/// `EvaluateResponseRubric` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRubricRequest {
    pub message_history: Vec<ConversationTurn>,
    #[serde(default)]
    pub company_data: ReferenceData,
    pub agent_answer: String,
    /// Judge model override for this call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl EvaluateRubricRequest {
    pub fn into_parts(self) -> (RubricRequest, Option<String>) {
        (
            RubricRequest::new(self.message_history, self.company_data, self.agent_answer),
            self.model,
        )
    }
}

/// `EvaluateResponseIdeal` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateIdealRequest {
    pub message_history: Vec<ConversationTurn>,
    pub agent_answer: String,
    pub ideal_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl EvaluateIdealRequest {
    pub fn into_parts(self) -> (IdealAnswerRequest, Option<String>) {
        (
            IdealAnswerRequest::new(self.message_history, self.agent_answer, self.ideal_answer),
            self.model,
        )
    }
}

/// `EvaluateResponseQAG` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateQagRequest {
    pub message_history: Vec<ConversationTurn>,
    #[serde(default)]
    pub company_data: ReferenceData,
    pub agent_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl EvaluateQagRequest {
    pub fn into_parts(self) -> (QagRequest, Option<String>) {
        (
            QagRequest::new(self.message_history, self.company_data, self.agent_answer),
            self.model,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricScores {
    pub metrics: Vec<ScoreItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QagScores {
    pub questions: Vec<QuestionScore>,
}

/// `{ metrics: [...] }` or `{ error }`.
pub type RubricResponse = Outcome<RubricScores>;

/// `{ choice, reason }` or `{ error }`.
pub type IdealResponse = Outcome<IdealChoice>;

/// `{ questions: [...] }` or `{ error }`.
pub type QagResponse = Outcome<QagScores>;
