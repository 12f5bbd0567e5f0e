use std::sync::Arc;

use arbiter_core::{ArbiterError, CallbackHandler, ChatModel};
use arbiter_eval::{IdealAnswerStrategy, Judge, QagStrategy, RubricStrategy};
use arbiter_models::{HttpBackend, ProviderBackend};
use arbiter_openai::{OpenAiChatModel, OpenAiConfig};

use crate::rpc::{
    EvaluateIdealRequest, EvaluateQagRequest, EvaluateRubricRequest, IdealResponse, QagResponse,
    QagScores, RubricResponse, RubricScores,
};
use crate::{EngineConfig, ENV_API_KEY};

/// The single entry point for evaluations.
///
/// Every operation returns either a valid result or an `{ error }` result.
/// `Err` is reserved for rejected calls: a malformed request or a broken
/// template.
pub struct EvaluationEngine {
    judge: Judge,
    rubric: RubricStrategy,
    ideal: IdealAnswerStrategy,
    qag: QagStrategy,
}

impl EvaluationEngine {
    pub fn builder() -> EvaluationEngineBuilder {
        EvaluationEngineBuilder::default()
    }

    /// Engine talking to OpenAI with settings from the environment.
    pub fn from_env() -> Result<Self, ArbiterError> {
        Self::builder().config(EngineConfig::from_env()?).build()
    }

    pub async fn evaluate_response_rubric(
        &self,
        request: EvaluateRubricRequest,
    ) -> Result<RubricResponse, ArbiterError> {
        let (request, model) = request.into_parts();
        let outcome = self
            .judge
            .evaluate(&self.rubric, &request, model.as_deref())
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "rubric evaluation rejected"))?;
        Ok(outcome.map(|metrics| RubricScores { metrics }))
    }

    pub async fn evaluate_response_ideal(
        &self,
        request: EvaluateIdealRequest,
    ) -> Result<IdealResponse, ArbiterError> {
        let (request, model) = request.into_parts();
        self.judge
            .evaluate(&self.ideal, &request, model.as_deref())
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "ideal-answer evaluation rejected"))
    }

    pub async fn evaluate_response_qag(
        &self,
        request: EvaluateQagRequest,
    ) -> Result<QagResponse, ArbiterError> {
        let (request, model) = request.into_parts();
        let outcome = self
            .judge
            .evaluate(&self.qag, &request, model.as_deref())
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "qag evaluation rejected"))?;
        Ok(outcome.map(|questions| QagScores { questions }))
    }
}

/// Builds an `EvaluationEngine`. A config with a credential is required
/// even when a chat model is injected.
#[derive(Default)]
pub struct EvaluationEngineBuilder {
    config: Option<EngineConfig>,
    chat_model: Option<Arc<dyn ChatModel>>,
    backend: Option<Arc<dyn ProviderBackend>>,
    callbacks: Option<Arc<dyn CallbackHandler>>,
}

impl EvaluationEngineBuilder {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use this judge model instead of the OpenAI adapter.
    pub fn chat_model(mut self, model: Arc<dyn ChatModel>) -> Self {
        self.chat_model = Some(model);
        self
    }

    /// Transport for the OpenAI adapter. Defaults to `HttpBackend`.
    pub fn backend(mut self, backend: Arc<dyn ProviderBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn callbacks(mut self, callbacks: Arc<dyn CallbackHandler>) -> Self {
        self.callbacks = Some(callbacks);
        self
    }

    pub fn build(self) -> Result<EvaluationEngine, ArbiterError> {
        let config = self.config.ok_or_else(|| {
            ArbiterError::Config(format!(
                "{ENV_API_KEY} is not set; the judge model cannot be reached"
            ))
        })?;

        let model = match self.chat_model {
            Some(model) => model,
            None => {
                let backend = self.backend.unwrap_or_else(|| {
                    Arc::new(HttpBackend::new().with_timeout(config.request_timeout))
                        as Arc<dyn ProviderBackend>
                });
                let openai = OpenAiConfig::new(config.api_key.expose(), &config.default_model)
                    .with_base_url(&config.base_url);
                Arc::new(OpenAiChatModel::new(openai, backend)) as Arc<dyn ChatModel>
            }
        };

        let mut judge = Judge::new(model)
            .with_default_model(&config.default_model)
            .with_timeout(config.request_timeout);
        if let Some(callbacks) = self.callbacks {
            judge = judge.with_callbacks(callbacks);
        }

        tracing::info!(
            base_url = %config.base_url,
            model = %config.default_model,
            timeout_secs = config.request_timeout.as_secs(),
            "evaluation engine ready"
        );

        Ok(EvaluationEngine {
            judge,
            rubric: RubricStrategy::new(),
            ideal: IdealAnswerStrategy::new(),
            qag: QagStrategy::new(),
        })
    }
}
