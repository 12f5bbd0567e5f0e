use std::sync::Arc;
use std::time::Duration;

use arbiter_callbacks::TracingCallback;
use arbiter_core::{
    ArbiterError, CallbackHandler, ChatModel, ChatRequest, ChatResponse, Outcome,
    ProviderErrorKind, RunEvent,
};
use arbiter_models::StructuredOutputChatModel;
use arbiter_parsers::OutputContract;
use uuid::Uuid;

use crate::{EvaluationStrategy, StrategyOutput};

/// Runs an `EvaluationStrategy` against a judge model.
///
/// Each call walks `Rendering -> Invoking -> Validating` and stops at the
/// first failure. Provider failures and contract violations come back as
/// `Outcome::Failed`; template and request errors are returned as `Err`.
/// Nothing is kept between calls.
pub struct Judge {
    model: Arc<dyn ChatModel>,
    callbacks: Arc<dyn CallbackHandler>,
    default_model: Option<String>,
    timeout: Option<Duration>,
}

impl Judge {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            callbacks: Arc::new(TracingCallback::new()),
            default_model: None,
            timeout: None,
        }
    }

    pub fn with_callbacks(mut self, callbacks: Arc<dyn CallbackHandler>) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Model used when the caller does not name one.
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    /// Upper bound on a single provider round trip.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub async fn evaluate<S: EvaluationStrategy>(
        &self,
        strategy: &S,
        request: &S::Request,
        model_override: Option<&str>,
    ) -> Result<Outcome<StrategyOutput<S>>, ArbiterError> {
        let run_id = Uuid::new_v4().to_string();
        let name = strategy.name();
        self.emit(RunEvent::EvaluationStarted {
            run_id: run_id.clone(),
            strategy: name.to_string(),
        })
        .await;

        // Rendering
        let messages = match strategy.render(request) {
            Ok(messages) => messages,
            Err(e) => {
                self.failed(&run_id, name, &e).await;
                return Err(e);
            }
        };
        self.emit(RunEvent::PromptRendered {
            run_id: run_id.clone(),
            message_count: messages.len(),
        })
        .await;

        // Invoking
        let params = strategy.params().with_model_override(model_override);
        let structured = StructuredOutputChatModel::new(Arc::clone(&self.model), strategy.contract());
        let model = params
            .model()
            .or(self.default_model.as_deref())
            .or_else(|| self.model.default_model())
            .map(str::to_string);

        let mut chat_request = ChatRequest::new(messages)
            .with_temperature(params.temperature())
            .with_max_tokens(params.max_tokens())
            .with_response_format(structured.contract().describe().to_response_format());
        if let Some(ref model) = model {
            chat_request = chat_request.with_model(model.clone());
        }
        self.emit(RunEvent::ProviderInvoked {
            run_id: run_id.clone(),
            model: model.unwrap_or_else(|| "provider-default".to_string()),
        })
        .await;

        // Validating
        let result = self
            .invoke(&structured, chat_request)
            .await
            .and_then(|response| structured.parse_response(&response));

        match result {
            Ok(output) => {
                self.emit(RunEvent::EvaluationSucceeded {
                    run_id,
                    strategy: name.to_string(),
                })
                .await;
                Ok(Outcome::Succeeded(output))
            }
            Err(e) => {
                self.failed(&run_id, name, &e).await;
                if e.is_recoverable() {
                    Ok(Outcome::Failed(e.to_error_result()))
                } else {
                    Err(e)
                }
            }
        }
    }

    async fn invoke(
        &self,
        model: &dyn ChatModel,
        request: ChatRequest,
    ) -> Result<ChatResponse, ArbiterError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, model.chat(request))
                .await
                .map_err(|_| {
                    ArbiterError::provider(
                        ProviderErrorKind::Timeout,
                        format!("no reply from judge model within {limit:?}"),
                    )
                })?,
            None => model.chat(request).await,
        }
    }

    async fn failed(&self, run_id: &str, strategy: &str, error: &ArbiterError) {
        self.emit(RunEvent::EvaluationFailed {
            run_id: run_id.to_string(),
            strategy: strategy.to_string(),
            error: error.to_string(),
        })
        .await;
    }

    /// Callback failures are logged and otherwise ignored.
    async fn emit(&self, event: RunEvent) {
        if let Err(e) = self.callbacks.on_event(event).await {
            tracing::warn!(error = %e, "evaluation callback failed");
        }
    }
}
