use std::sync::Arc;

use arbiter_core::{ArbiterError, ChatModel, ChatRequest, ChatResponse, Message, ProviderErrorKind};
use arbiter_parsers::{FormatInstructions, OutputContract};
use async_trait::async_trait;
use serde_json::Value;

/// Wraps a ChatModel so that its replies are held to an `OutputContract`.
///
/// Requests get the contract's JSON Schema as a `response_format` hint. A
/// request without any system message also gets a system instruction
/// describing the schema. Replies are parsed as JSON and validated locally;
/// the provider-side hint is never trusted.
pub struct StructuredOutputChatModel<C> {
    inner: Arc<dyn ChatModel>,
    contract: C,
}

impl<C: OutputContract> StructuredOutputChatModel<C> {
    pub fn new(inner: Arc<dyn ChatModel>, contract: C) -> Self {
        Self { inner, contract }
    }

    pub fn contract(&self) -> &C {
        &self.contract
    }

    /// Parse the model's text response and validate it against the contract.
    pub fn parse_response(&self, response: &ChatResponse) -> Result<C::Output, ArbiterError> {
        let text = response.message.content();
        if text.trim().is_empty() {
            return Err(ArbiterError::provider(
                ProviderErrorKind::EmptyResponse,
                "judge reply had no content",
            ));
        }
        let value = match serde_json::from_str::<Value>(text.trim()) {
            Ok(value) => value,
            Err(_) => serde_json::from_str(extract_json(text)).map_err(|e| {
                ArbiterError::schema_violation("$", format!("reply is not valid JSON: {e}"))
            })?,
        };
        self.contract.validate(&value)
    }

    /// Call the model and validate the response.
    pub async fn generate(
        &self,
        request: ChatRequest,
    ) -> Result<(C::Output, ChatResponse), ArbiterError> {
        let response = self.chat(request).await?;
        let parsed = self.parse_response(&response)?;
        Ok((parsed, response))
    }
}

/// Extract JSON from text that did not parse as-is, handling markdown code
/// blocks and prose around a single object.
fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(start) = trimmed.find("```json") {
        let json_start = start + "```json".len();
        if let Some(end) = trimmed[json_start..].find("```") {
            return trimmed[json_start..json_start + end].trim();
        }
    }
    if let Some(start) = trimmed.find("```") {
        let json_start = start + 3;
        if let Some(end) = trimmed[json_start..].find("```") {
            return trimmed[json_start..json_start + end].trim();
        }
    }
    if !trimmed.starts_with('{') {
        if let (Some(open), Some(close)) = (trimmed.find('{'), trimmed.rfind('}')) {
            if open < close {
                return &trimmed[open..=close];
            }
        }
    }
    trimmed
}

#[async_trait]
impl<C: OutputContract> ChatModel for StructuredOutputChatModel<C> {
    async fn chat(&self, mut request: ChatRequest) -> Result<ChatResponse, ArbiterError> {
        if request.response_format.is_none() {
            request.response_format = Some(self.contract.describe().to_response_format());
        }
        if !request.messages.iter().any(Message::is_system) {
            let instruction = format!(
                "{}\n\nDo not include any text outside the JSON object.",
                self.contract.get_format_instructions()
            );
            request.messages.insert(0, Message::system(instruction));
        }
        self.inner.chat(request).await
    }

    fn default_model(&self) -> Option<&str> {
        self.inner.default_model()
    }
}
