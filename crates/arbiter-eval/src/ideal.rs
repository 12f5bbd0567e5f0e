use arbiter_core::{ArbiterError, IdealCategory};
use arbiter_parsers::{FormatInstructions, IdealAnswerContract};
use arbiter_prompts::{
    data_handling_instructions, format_history, JudgePrompt, PromptValues, TemplateId,
};

use crate::{EvaluationStrategy, IdealAnswerRequest, InvocationParams};

pub const IDEAL_MAX_TOKENS: u32 = 2000;

/// Classifies an agent answer against an expert answer into one of the
/// five comparison categories. The model's choice is taken as given.
#[derive(Debug, Clone)]
pub struct IdealAnswerStrategy {
    prompt: JudgePrompt,
}

impl IdealAnswerStrategy {
    pub fn new() -> Self {
        Self {
            prompt: JudgePrompt::builtin(TemplateId::IdealAnswer),
        }
    }

    pub fn with_prompt(prompt: JudgePrompt) -> Self {
        Self { prompt }
    }
}

impl Default for IdealAnswerStrategy {
    fn default() -> Self {
        Self::new()
    }
}

fn category_list() -> String {
    IdealCategory::ALL
        .iter()
        .map(|category| format!("- {}: {}", category.as_str(), category.description()))
        .collect::<Vec<_>>()
        .join("\n")
}

impl EvaluationStrategy for IdealAnswerStrategy {
    type Request = IdealAnswerRequest;
    type Contract = IdealAnswerContract;

    fn name(&self) -> &'static str {
        "ideal-answer"
    }

    fn prompt(&self) -> &JudgePrompt {
        &self.prompt
    }

    fn contract(&self) -> IdealAnswerContract {
        IdealAnswerContract::new()
    }

    fn params(&self) -> InvocationParams {
        InvocationParams::new(IDEAL_MAX_TOKENS)
    }

    fn prompt_values(&self, request: &IdealAnswerRequest) -> Result<PromptValues, ArbiterError> {
        request.validate()?;
        Ok(PromptValues::new()
            .with_trusted("data_handling", data_handling_instructions())
            .with_trusted("categories", category_list())
            .with_trusted("output_format", self.contract().get_format_instructions())
            .with_fenced("message_history", format_history(&request.message_history))
            .with_fenced("ideal_answer", request.ideal_answer.as_str())
            .with_fenced("agent_answer", request.agent_answer.as_str()))
    }
}
