mod format;
mod judge_prompt;
mod template;

pub use format::{format_history, format_reference_data};
pub use judge_prompt::{data_handling_instructions, JudgePrompt, RenderedPrompt, TemplateId};
pub use template::{fence, PromptError, PromptTemplate, PromptValues, SlotValue, FENCE};
