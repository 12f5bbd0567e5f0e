use arbiter_core::ArbiterError;
use arbiter_parsers::{FormatInstructions, QagContract, MAX_QUESTIONS, MIN_QUESTIONS};
use arbiter_prompts::{
    data_handling_instructions, format_history, format_reference_data, JudgePrompt, PromptValues,
    TemplateId,
};

use crate::{EvaluationStrategy, InvocationParams, QagRequest};

/// Up to seven questions, each with three scores and its reasoning.
pub const QAG_MAX_TOKENS: u32 = 6000;

/// Has the judge generate probe questions from the conversation and company
/// data, then score the agent answer against each of them.
#[derive(Debug, Clone)]
pub struct QagStrategy {
    prompt: JudgePrompt,
}

impl QagStrategy {
    pub fn new() -> Self {
        Self {
            prompt: JudgePrompt::builtin(TemplateId::Qag),
        }
    }

    pub fn with_prompt(prompt: JudgePrompt) -> Self {
        Self { prompt }
    }
}

impl Default for QagStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationStrategy for QagStrategy {
    type Request = QagRequest;
    type Contract = QagContract;

    fn name(&self) -> &'static str {
        "qag"
    }

    fn prompt(&self) -> &JudgePrompt {
        &self.prompt
    }

    fn contract(&self) -> QagContract {
        QagContract::new()
    }

    fn params(&self) -> InvocationParams {
        InvocationParams::new(QAG_MAX_TOKENS)
    }

    fn prompt_values(&self, request: &QagRequest) -> Result<PromptValues, ArbiterError> {
        request.validate()?;
        Ok(PromptValues::new()
            .with_trusted("data_handling", data_handling_instructions())
            .with_trusted("min_questions", MIN_QUESTIONS.to_string())
            .with_trusted("max_questions", MAX_QUESTIONS.to_string())
            .with_trusted("output_format", self.contract().get_format_instructions())
            .with_fenced("message_history", format_history(&request.message_history))
            .with_fenced("company_data", format_reference_data(&request.company_data)?)
            .with_fenced("agent_answer", request.agent_answer.as_str()))
    }
}
