//! Arbiter: an LLM-as-judge evaluation engine for customer-support answers.
//!
//! A judge model scores an agent's answer in one of three ways:
//!
//! | Operation | Strategy | Result |
//! |-----------|----------|--------|
//! | `evaluate_response_rubric` | five fixed metrics against company data | `{ metrics: [...] }` |
//! | `evaluate_response_ideal` | one of five categories against an ideal answer | `{ choice, reason }` |
//! | `evaluate_response_qag` | 3 to 7 generated probe questions, each scored | `{ questions: [...] }` |
//!
//! Provider failures and malformed judge replies come back as `{ error }`
//! results. Malformed requests and broken templates are rejected with `Err`.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use arbiter::{EngineConfig, EvaluationEngine, EvaluateRubricRequest};
//!
//! let engine = EvaluationEngine::builder()
//!     .config(EngineConfig::from_env()?)
//!     .build()?;
//! let response = engine.evaluate_response_rubric(request).await?;
//! ```

/// Core types: ChatModel, Message, results, ArbiterError.
pub use arbiter_core as core;

/// Prompt templates and the built-in judge instruction sets.
pub use arbiter_prompts as prompts;

/// Output contracts for judge replies.
pub use arbiter_parsers as parsers;

/// ProviderBackend, HttpBackend, ScriptedChatModel, StructuredOutputChatModel.
pub use arbiter_models as models;

/// OpenAI chat-completions adapter.
pub use arbiter_openai as openai;

/// TracingCallback, RecordingCallback, CompositeCallback.
pub use arbiter_callbacks as callbacks;

/// Strategies and the Judge runner.
pub use arbiter_eval as eval;

mod config;
mod engine;
mod rpc;

pub use config::{
    ApiKey, EngineConfig, DEFAULT_JUDGE_MODEL, DEFAULT_REQUEST_TIMEOUT, ENV_API_KEY,
    ENV_BASE_URL, ENV_JUDGE_MODEL, ENV_REQUEST_TIMEOUT_SECS,
};
pub use engine::{EvaluationEngine, EvaluationEngineBuilder};
pub use rpc::{
    EvaluateIdealRequest, EvaluateQagRequest, EvaluateRubricRequest, IdealResponse, QagResponse,
    QagScores, RubricResponse, RubricScores,
};
