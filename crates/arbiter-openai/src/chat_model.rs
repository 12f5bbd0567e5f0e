use std::fmt;
use std::sync::Arc;

use arbiter_core::{
    ArbiterError, ChatModel, ChatRequest, ChatResponse, Message, ProviderErrorKind,
    ResponseFormat, TokenUsage,
};
use arbiter_models::{ProviderBackend, ProviderRequest, ProviderResponse};
use async_trait::async_trait;
use serde_json::{json, Value};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const REGION_UNSUPPORTED_CODE: &str = "unsupported_country_region_territory";

#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"[redacted]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

pub struct OpenAiChatModel {
    config: OpenAiConfig,
    backend: Arc<dyn ProviderBackend>,
}

impl OpenAiChatModel {
    pub fn new(config: OpenAiConfig, backend: Arc<dyn ProviderBackend>) -> Self {
        Self { config, backend }
    }

    /// Request parameters win over the configured defaults.
    fn build_request(&self, request: &ChatRequest) -> ProviderRequest {
        let messages: Vec<Value> = request.messages.iter().map(message_to_openai).collect();
        let model = request.model.as_deref().unwrap_or(&self.config.model);

        let mut body = json!({
            "model": model,
            "messages": messages,
        });

        if let Some(max_tokens) = request.max_tokens.or(self.config.max_tokens) {
            body["max_tokens"] = json!(max_tokens);
        }
        if let Some(temp) = request.temperature.or(self.config.temperature) {
            body["temperature"] = json!(temp);
        }
        if let Some(ref format) = request.response_format {
            body["response_format"] = response_format_to_openai(format);
        }

        ProviderRequest {
            url: format!("{}/chat/completions", self.config.base_url.trim_end_matches('/')),
            headers: vec![
                (
                    "Authorization".to_string(),
                    format!("Bearer {}", self.config.api_key),
                ),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            body,
        }
    }
}

fn message_to_openai(msg: &Message) -> Value {
    match msg {
        Message::System { content } => json!({
            "role": "system",
            "content": content,
        }),
        Message::Human { content } => json!({
            "role": "user",
            "content": content,
        }),
        Message::AI { content } => json!({
            "role": "assistant",
            "content": content,
        }),
    }
}

fn response_format_to_openai(format: &ResponseFormat) -> Value {
    match format {
        ResponseFormat::JsonObject => json!({"type": "json_object"}),
        ResponseFormat::JsonSchema {
            name,
            schema,
            strict,
        } => json!({
            "type": "json_schema",
            "json_schema": {
                "name": name,
                "schema": schema,
                "strict": strict,
            }
        }),
    }
}

fn parse_response(resp: &ProviderResponse) -> Result<ChatResponse, ArbiterError> {
    check_error_status(resp)?;

    let content = resp.body["choices"][0]["message"]["content"]
        .as_str()
        .unwrap_or("");
    if content.trim().is_empty() {
        return Err(ArbiterError::provider(
            ProviderErrorKind::EmptyResponse,
            "OpenAI returned no message content",
        ));
    }

    Ok(ChatResponse {
        message: Message::ai(content),
        usage: parse_usage(&resp.body["usage"]),
    })
}

fn error_message(body: &Value) -> String {
    match body {
        Value::String(text) => text.chars().take(200).collect(),
        _ => body["error"]["message"]
            .as_str()
            .unwrap_or("unknown API error")
            .to_string(),
    }
}

fn classify_status(status: u16, body: &Value) -> ProviderErrorKind {
    let code = body["error"]["code"].as_str().unwrap_or_default();
    match status {
        401 => ProviderErrorKind::AuthenticationMissing,
        403 if code == REGION_UNSUPPORTED_CODE => ProviderErrorKind::RegionUnsupported,
        429 => ProviderErrorKind::QuotaExceeded,
        408 | 504 => ProviderErrorKind::Timeout,
        _ => ProviderErrorKind::Unknown,
    }
}

fn check_error_status(resp: &ProviderResponse) -> Result<(), ArbiterError> {
    if resp.status < 400 {
        return Ok(());
    }
    let kind = classify_status(resp.status, &resp.body);
    let msg = error_message(&resp.body);
    tracing::warn!(status = resp.status, kind = %kind, "OpenAI API error");
    Err(ArbiterError::provider(
        kind,
        format!("OpenAI API error ({}): {}", resp.status, msg),
    ))
}

fn parse_usage(usage: &Value) -> Option<TokenUsage> {
    if usage.is_null() {
        return None;
    }
    Some(TokenUsage {
        input_tokens: usage["prompt_tokens"].as_u64().unwrap_or(0) as u32,
        output_tokens: usage["completion_tokens"].as_u64().unwrap_or(0) as u32,
        total_tokens: usage["total_tokens"].as_u64().unwrap_or(0) as u32,
    })
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ArbiterError> {
        let provider_req = self.build_request(&request);
        let resp = self.backend.send(provider_req).await?;
        parse_response(&resp)
    }

    fn default_model(&self) -> Option<&str> {
        Some(&self.config.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_code_only_counts_on_forbidden() {
        let body = json!({"error": {"code": REGION_UNSUPPORTED_CODE}});
        assert_eq!(
            classify_status(403, &body),
            ProviderErrorKind::RegionUnsupported
        );
        assert_eq!(classify_status(400, &body), ProviderErrorKind::Unknown);
        assert_eq!(
            classify_status(403, &json!({"error": {"code": "forbidden"}})),
            ProviderErrorKind::Unknown
        );
    }

    #[test]
    fn plain_text_error_bodies_are_kept() {
        assert_eq!(error_message(&json!("Bad Gateway")), "Bad Gateway");
    }
}
