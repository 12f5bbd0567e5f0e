use arbiter_core::{ArbiterError, Message};
use arbiter_parsers::OutputContract;
use arbiter_prompts::{JudgePrompt, PromptValues};

/// Model parameters for one judge call.
///
/// Temperature is pinned at zero so repeated calls with identical input
/// score alike; only the model name can be overridden by a caller.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationParams {
    model: Option<String>,
    max_tokens: u32,
}

impl InvocationParams {
    pub const TEMPERATURE: f64 = 0.0;

    pub fn new(max_tokens: u32) -> Self {
        Self {
            model: None,
            max_tokens,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Apply a caller's optional override. Blank names are ignored.
    pub fn with_model_override(self, model: Option<&str>) -> Self {
        match model.map(str::trim) {
            Some(name) if !name.is_empty() => self.with_model(name),
            _ => self,
        }
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn temperature(&self) -> f64 {
        Self::TEMPERATURE
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

pub type StrategyOutput<S> = <<S as EvaluationStrategy>::Contract as OutputContract>::Output;

/// One evaluation mode: how to turn its request into judge messages, and
/// which output contract the reply must satisfy.
///
/// Implementations are stateless; every call starts from the request.
pub trait EvaluationStrategy: Send + Sync {
    type Request: Sync;
    type Contract: OutputContract;

    /// Stable name used in logs and events.
    fn name(&self) -> &'static str;

    fn prompt(&self) -> &JudgePrompt;

    fn contract(&self) -> Self::Contract;

    fn params(&self) -> InvocationParams;

    /// Checks the request and builds the slot values for `prompt()`.
    fn prompt_values(&self, request: &Self::Request) -> Result<PromptValues, ArbiterError>;

    /// Render the `[system, human]` message pair.
    fn render(&self, request: &Self::Request) -> Result<Vec<Message>, ArbiterError> {
        let values = self.prompt_values(request)?;
        let prompt = self.prompt();
        tracing::debug!(template = %prompt.id(), strategy = self.name(), "rendering judge prompt");
        Ok(prompt.render(&values)?.into_messages())
    }
}
