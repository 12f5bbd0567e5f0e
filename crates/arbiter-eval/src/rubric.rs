use arbiter_core::{ArbiterError, RubricMetric};
use arbiter_parsers::{FormatInstructions, RubricContract};
use arbiter_prompts::{
    data_handling_instructions, format_history, format_reference_data, JudgePrompt, PromptValues,
    TemplateId,
};

use crate::{EvaluationStrategy, InvocationParams, RubricRequest};

/// Room for five verbose justifications.
pub const RUBRIC_MAX_TOKENS: u32 = 4000;

/// Scores an agent answer on the five fixed metrics, with the company data
/// as ground truth.
#[derive(Debug, Clone)]
pub struct RubricStrategy {
    prompt: JudgePrompt,
}

impl RubricStrategy {
    pub fn new() -> Self {
        Self {
            prompt: JudgePrompt::builtin(TemplateId::Rubric),
        }
    }

    /// Replace the built-in instruction set.
    pub fn with_prompt(prompt: JudgePrompt) -> Self {
        Self { prompt }
    }
}

impl Default for RubricStrategy {
    fn default() -> Self {
        Self::new()
    }
}

fn metric_list() -> String {
    RubricMetric::ALL
        .iter()
        .map(|metric| format!("- {}: {}", metric.label(), metric.description()))
        .collect::<Vec<_>>()
        .join("\n")
}

impl EvaluationStrategy for RubricStrategy {
    type Request = RubricRequest;
    type Contract = RubricContract;

    fn name(&self) -> &'static str {
        "rubric"
    }

    fn prompt(&self) -> &JudgePrompt {
        &self.prompt
    }

    fn contract(&self) -> RubricContract {
        RubricContract::new()
    }

    fn params(&self) -> InvocationParams {
        InvocationParams::new(RUBRIC_MAX_TOKENS)
    }

    fn prompt_values(&self, request: &RubricRequest) -> Result<PromptValues, ArbiterError> {
        request.validate()?;
        Ok(PromptValues::new()
            .with_trusted("data_handling", data_handling_instructions())
            .with_trusted("metrics", metric_list())
            .with_trusted("output_format", self.contract().get_format_instructions())
            .with_fenced("message_history", format_history(&request.message_history))
            .with_fenced("company_data", format_reference_data(&request.company_data)?)
            .with_fenced("agent_answer", request.agent_answer.as_str()))
    }
}
