use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use arbiter_core::{
    ArbiterError, ChatModel, ChatRequest, ChatResponse, Message, ProviderErrorKind,
};
use async_trait::async_trait;

type Scripted = Result<ChatResponse, ArbiterError>;

/// Chat model double that replays a script of replies and records every
/// request it was given.
#[derive(Clone, Default)]
pub struct ScriptedChatModel {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
    delay: Option<Duration>,
    default_model: Option<String>,
}

impl ScriptedChatModel {
    pub fn new(responses: Vec<ChatResponse>) -> Self {
        Self {
            script: Arc::new(Mutex::new(responses.into_iter().map(Ok).collect())),
            ..Self::default()
        }
    }

    /// Script of assistant replies with the given text bodies.
    pub fn from_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            replies
                .into_iter()
                .map(|text| ChatResponse {
                    message: Message::ai(text),
                    usage: None,
                })
                .collect(),
        )
    }

    /// A model whose only scripted step is the given failure.
    pub fn failing(error: ArbiterError) -> Self {
        let model = Self::default();
        model.push_error(error);
        model
    }

    pub fn push_response(&self, response: ChatResponse) -> &Self {
        self.lock_script().push_back(Ok(response));
        self
    }

    pub fn push_error(&self, error: ArbiterError) -> &Self {
        self.lock_script().push_back(Err(error));
        self
    }

    /// Sleep before replying.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<Scripted>> {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ChatModel for ScriptedChatModel {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ArbiterError> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.lock_script().pop_front();
        next.unwrap_or_else(|| {
            Err(ArbiterError::provider(
                ProviderErrorKind::Unknown,
                "scripted model exhausted responses",
            ))
        })
    }

    fn default_model(&self) -> Option<&str> {
        self.default_model.as_deref()
    }
}
