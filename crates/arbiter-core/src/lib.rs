use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Conversation input
// ---------------------------------------------------------------------------

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn of the customer/agent dialogue under evaluation. Order within a
/// history is chronological and is preserved everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Facts the agent answer may draw upon, keyed by field name. A `BTreeMap`
/// keeps iteration (and therefore rendering) in key order.
pub type ReferenceData = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Evaluation results
// ---------------------------------------------------------------------------

/// The five fixed rubric metrics, in their declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RubricMetric {
    Faithfulness,
    Completeness,
    Conciseness,
    Relevance,
    TonePoliteness,
}

impl RubricMetric {
    /// Declared order. Rubric results are always returned in this order.
    pub const ALL: [RubricMetric; 5] = [
        RubricMetric::Faithfulness,
        RubricMetric::Completeness,
        RubricMetric::Conciseness,
        RubricMetric::Relevance,
        RubricMetric::TonePoliteness,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RubricMetric::Faithfulness => "Faithfulness",
            RubricMetric::Completeness => "Completeness",
            RubricMetric::Conciseness => "Conciseness",
            RubricMetric::Relevance => "Relevance",
            RubricMetric::TonePoliteness => "Tone & Politeness",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RubricMetric::Faithfulness => {
                "How factually accurate the response is based on company data."
            }
            RubricMetric::Completeness => {
                "How well the response covers the key details the customer needs."
            }
            RubricMetric::Conciseness => {
                "Whether the response avoids unnecessary repetition and remains clear."
            }
            RubricMetric::Relevance => "How well the response addresses the customer's query.",
            RubricMetric::TonePoliteness => {
                "Whether the response maintains a professional and customer-friendly tone."
            }
        }
    }

    /// Match a label as a judge model writes it. Case and surrounding
    /// whitespace are ignored, and `and` is accepted for `&`.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_lowercase().replace(" and ", " & ");
        Self::ALL
            .into_iter()
            .find(|metric| metric.label().to_lowercase() == normalized)
    }
}

impl fmt::Display for RubricMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single scored rubric metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreItem {
    #[serde(rename = "metric")]
    pub label: String,
    pub score: u8,
    pub reason: String,
}

/// Relationship of an agent answer to the ideal answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdealCategory {
    /// The answer is a subset of the ideal answer and fully consistent with it.
    SubsetConsistent,
    /// The answer is a superset of the ideal answer and fully consistent with it.
    SupersetConsistent,
    /// The answer contains all the same details as the ideal answer.
    FullyEquivalent,
    /// The answer disagrees with the ideal answer.
    Disagreement,
    /// The answers differ, but not in a way that matters for factuality.
    ImmaterialDifference,
}

impl IdealCategory {
    pub const ALL: [IdealCategory; 5] = [
        IdealCategory::SubsetConsistent,
        IdealCategory::SupersetConsistent,
        IdealCategory::FullyEquivalent,
        IdealCategory::Disagreement,
        IdealCategory::ImmaterialDifference,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IdealCategory::SubsetConsistent => "subset-consistent",
            IdealCategory::SupersetConsistent => "superset-consistent",
            IdealCategory::FullyEquivalent => "fully-equivalent",
            IdealCategory::Disagreement => "disagreement",
            IdealCategory::ImmaterialDifference => "immaterial-difference",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            IdealCategory::SubsetConsistent => {
                "The submitted answer is a subset of the ideal answer and is fully consistent with it."
            }
            IdealCategory::SupersetConsistent => {
                "The submitted answer is a superset of the ideal answer and is fully consistent with it."
            }
            IdealCategory::FullyEquivalent => {
                "The submitted answer contains all the same details as the ideal answer."
            }
            IdealCategory::Disagreement => {
                "There is a disagreement between the submitted answer and the ideal answer."
            }
            IdealCategory::ImmaterialDifference => {
                "The answers differ, but these differences don't matter from the perspective of factuality."
            }
        }
    }
}

impl fmt::Display for IdealCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdealCategory {
    type Err = ArbiterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| {
                ArbiterError::schema_violation(
                    "choice",
                    format!(
                        "'{}' is not one of {:?}",
                        s,
                        Self::ALL.map(|c| c.as_str())
                    ),
                )
            })
    }
}

/// The single category chosen by the ideal-answer strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdealChoice {
    pub choice: IdealCategory,
    pub reason: String,
}

/// One judge-generated probe question and how well the answer covers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionScore {
    pub question: String,
    pub accuracy: u8,
    pub completeness: u8,
    pub relevance: u8,
    pub reasoning: String,
}

/// User-facing substitute for a result when an evaluation fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub error: String,
}

impl ErrorResult {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Either a contract-valid result or an `ErrorResult`. Serializes untagged,
/// so a failure is exactly `{"error": "..."}` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome<T> {
    Succeeded(T),
    Failed(ErrorResult),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Succeeded(value) => Some(value),
            Outcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorResult> {
        match self {
            Outcome::Succeeded(_) => None,
            Outcome::Failed(err) => Some(err),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Succeeded(value) => Outcome::Succeeded(f(value)),
            Outcome::Failed(err) => Outcome::Failed(err),
        }
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A chat message sent to or received from the judge model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role")]
pub enum Message {
    #[serde(rename = "system")]
    System { content: String },
    #[serde(rename = "human")]
    Human { content: String },
    #[serde(rename = "assistant")]
    AI { content: String },
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message::System {
            content: content.into(),
        }
    }

    pub fn human(content: impl Into<String>) -> Self {
        Message::Human {
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Message::AI {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Message::System { content } | Message::Human { content } | Message::AI { content } => {
                content
            }
        }
    }

    pub fn role(&self) -> &str {
        match self {
            Message::System { .. } => "system",
            Message::Human { .. } => "human",
            Message::AI { .. } => "assistant",
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Message::System { .. })
    }

    pub fn is_human(&self) -> bool {
        matches!(self, Message::Human { .. })
    }

    pub fn is_ai(&self) -> bool {
        matches!(self, Message::AI { .. })
    }
}

// ---------------------------------------------------------------------------
// Chat request / response
// ---------------------------------------------------------------------------

/// Output shape hint handed to the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    JsonObject,
    JsonSchema {
        name: String,
        schema: Value,
        #[serde(default)]
        strict: bool,
    },
}

/// A request to a chat model. Model parameters set here override the
/// provider's configured defaults for this call only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl ChatRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            model: None,
            temperature: None,
            max_tokens: None,
            response_format: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }
}

/// A response from a chat model containing the AI message and optional token usage statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: Message,
    pub usage: Option<TokenUsage>,
}

// ---------------------------------------------------------------------------
// Token usage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Lifecycle events emitted while an evaluation runs, consumed by `CallbackHandler` implementations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunEvent {
    EvaluationStarted {
        run_id: String,
        strategy: String,
    },
    PromptRendered {
        run_id: String,
        message_count: usize,
    },
    ProviderInvoked {
        run_id: String,
        model: String,
    },
    EvaluationSucceeded {
        run_id: String,
        strategy: String,
    },
    EvaluationFailed {
        run_id: String,
        strategy: String,
        error: String,
    },
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Sub-kinds of a completion provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    AuthenticationMissing,
    QuotaExceeded,
    RegionUnsupported,
    EmptyResponse,
    Timeout,
    Unknown,
}

impl ProviderErrorKind {
    /// Stable message returned to callers. Quota and region messages are
    /// distinct so a caller can decide whether retrying makes sense.
    pub fn user_message(&self) -> &'static str {
        match self {
            ProviderErrorKind::AuthenticationMissing => {
                "Judge model authentication failed. Please check the configured API key."
            }
            ProviderErrorKind::QuotaExceeded => {
                "Judge model quota exceeded. Please check your plan and billing details, or retry later."
            }
            ProviderErrorKind::RegionUnsupported => {
                "Judge model provider is not available in this country, region, or territory."
            }
            ProviderErrorKind::EmptyResponse => "Judge model returned an empty response.",
            ProviderErrorKind::Timeout => "Judge model request timed out.",
            ProviderErrorKind::Unknown => {
                "Failed to generate evaluation. Please check API key and request format."
            }
        }
    }
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderErrorKind::AuthenticationMissing => "authentication missing",
            ProviderErrorKind::QuotaExceeded => "quota exceeded",
            ProviderErrorKind::RegionUnsupported => "region unsupported",
            ProviderErrorKind::EmptyResponse => "empty response",
            ProviderErrorKind::Timeout => "timeout",
            ProviderErrorKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Unified error type for the Arbiter engine.
#[derive(Debug, Error)]
pub enum ArbiterError {
    #[error("template error: {0}")]
    Template(String),
    #[error("schema violation at `{field}`: {reason}")]
    SchemaViolation { field: String, reason: String },
    #[error("provider error ({kind}): {message}")]
    Provider {
        kind: ProviderErrorKind,
        message: String,
    },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("callback error: {0}")]
    Callback(String),
}

impl ArbiterError {
    pub fn schema_violation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ArbiterError::SchemaViolation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn provider(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        ArbiterError::Provider {
            kind,
            message: message.into(),
        }
    }

    /// Provider failures and contract violations are converted into an
    /// `ErrorResult`; everything else rejects the call.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ArbiterError::SchemaViolation { .. } | ArbiterError::Provider { .. }
        )
    }

    pub fn provider_kind(&self) -> Option<ProviderErrorKind> {
        match self {
            ArbiterError::Provider { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// The caller-facing form of this error.
    pub fn to_error_result(&self) -> ErrorResult {
        match self {
            ArbiterError::Provider { kind, .. } => ErrorResult::new(kind.user_message()),
            ArbiterError::SchemaViolation { field, reason } => ErrorResult::new(format!(
                "Judge model reply did not match the evaluation format ({field}: {reason})."
            )),
            ArbiterError::InvalidRequest(msg) => ErrorResult::new(format!("Invalid request: {msg}")),
            _ => ErrorResult::new(ProviderErrorKind::Unknown.user_message()),
        }
    }
}

// ---------------------------------------------------------------------------
// Core traits
// ---------------------------------------------------------------------------

/// The completion provider capability: one request in, one reply out.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ArbiterError>;

    /// Model used when a request does not name one.
    fn default_model(&self) -> Option<&str> {
        None
    }
}

/// Receives evaluation lifecycle events. Implementations hold no
/// per-evaluation state.
#[async_trait]
pub trait CallbackHandler: Send + Sync {
    async fn on_event(&self, event: RunEvent) -> Result<(), ArbiterError>;
}
