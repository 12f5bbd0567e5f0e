use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use arbiter_core::{ArbiterError, ProviderErrorKind};
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub status: u16,
    pub body: Value,
}

#[async_trait]
pub trait ProviderBackend: Send + Sync {
    async fn send(&self, request: ProviderRequest) -> Result<ProviderResponse, ArbiterError>;
}

/// Production backend using reqwest.
pub struct HttpBackend {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl HttpBackend {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: None,
        }
    }

    /// Per-request transport timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn transport_error(e: reqwest::Error) -> ArbiterError {
    if e.is_timeout() {
        ArbiterError::provider(ProviderErrorKind::Timeout, format!("HTTP request timed out: {e}"))
    } else {
        ArbiterError::provider(ProviderErrorKind::Unknown, format!("HTTP request failed: {e}"))
    }
}

#[async_trait]
impl ProviderBackend for HttpBackend {
    async fn send(&self, request: ProviderRequest) -> Result<ProviderResponse, ArbiterError> {
        let mut builder = self.client.post(&request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder = builder.json(&request.body);

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(transport_error)?;
        tracing::debug!(url = %request.url, status, bytes = text.len(), "provider responded");

        // Gateways answer errors with HTML or plain text; keep it so the
        // status can still be classified.
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        Ok(ProviderResponse { status, body })
    }
}

/// Test backend with queued responses. Every request it receives is kept
/// for inspection.
#[derive(Default)]
pub struct FakeBackend {
    responses: Arc<Mutex<VecDeque<Result<ProviderResponse, ArbiterError>>>>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, response: ProviderResponse) -> &Self {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(Ok(response));
        self
    }

    pub fn push_error(&self, error: ArbiterError) -> &Self {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl ProviderBackend for FakeBackend {
    async fn send(&self, request: ProviderRequest) -> Result<ProviderResponse, ArbiterError> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request);
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or_else(|| {
                Err(ArbiterError::provider(
                    ProviderErrorKind::Unknown,
                    "FakeBackend exhausted",
                ))
            })
    }
}
