use arbiter_core::{ArbiterError, ConversationTurn, ReferenceData};

/// Input to the rubric strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RubricRequest {
    pub message_history: Vec<ConversationTurn>,
    pub company_data: ReferenceData,
    pub agent_answer: String,
}

impl RubricRequest {
    pub fn new(
        message_history: Vec<ConversationTurn>,
        company_data: ReferenceData,
        agent_answer: impl Into<String>,
    ) -> Self {
        Self {
            message_history,
            company_data,
            agent_answer: agent_answer.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ArbiterError> {
        require_history(&self.message_history)?;
        require_text("agentAnswer", &self.agent_answer)
    }
}

/// Input to the ideal-answer strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdealAnswerRequest {
    pub message_history: Vec<ConversationTurn>,
    pub agent_answer: String,
    pub ideal_answer: String,
}

impl IdealAnswerRequest {
    pub fn new(
        message_history: Vec<ConversationTurn>,
        agent_answer: impl Into<String>,
        ideal_answer: impl Into<String>,
    ) -> Self {
        Self {
            message_history,
            agent_answer: agent_answer.into(),
            ideal_answer: ideal_answer.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ArbiterError> {
        require_history(&self.message_history)?;
        require_text("agentAnswer", &self.agent_answer)?;
        require_text("idealAnswer", &self.ideal_answer)
    }
}

/// Input to the question-answer-generation strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QagRequest {
    pub message_history: Vec<ConversationTurn>,
    pub company_data: ReferenceData,
    pub agent_answer: String,
}

impl QagRequest {
    pub fn new(
        message_history: Vec<ConversationTurn>,
        company_data: ReferenceData,
        agent_answer: impl Into<String>,
    ) -> Self {
        Self {
            message_history,
            company_data,
            agent_answer: agent_answer.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ArbiterError> {
        require_history(&self.message_history)?;
        require_text("agentAnswer", &self.agent_answer)
    }
}

fn require_history(turns: &[ConversationTurn]) -> Result<(), ArbiterError> {
    if turns.is_empty() {
        return Err(ArbiterError::InvalidRequest(
            "messageHistory must contain at least one turn".to_string(),
        ));
    }
    Ok(())
}

fn require_text(field: &str, value: &str) -> Result<(), ArbiterError> {
    if value.trim().is_empty() {
        return Err(ArbiterError::InvalidRequest(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}
