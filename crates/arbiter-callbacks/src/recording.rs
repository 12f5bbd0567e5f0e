use std::sync::Arc;

use arbiter_core::{ArbiterError, CallbackHandler, RunEvent};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Keeps every event it receives, in order.
#[derive(Default, Clone)]
pub struct RecordingCallback {
    events: Arc<RwLock<Vec<RunEvent>>>,
}

impl RecordingCallback {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<RunEvent> {
        self.events.read().await.clone()
    }

    /// Events belonging to one evaluation run.
    pub async fn events_for(&self, run_id: &str) -> Vec<RunEvent> {
        self.events
            .read()
            .await
            .iter()
            .filter(|event| event_run_id(event) == run_id)
            .cloned()
            .collect()
    }
}

fn event_run_id(event: &RunEvent) -> &str {
    match event {
        RunEvent::EvaluationStarted { run_id, .. }
        | RunEvent::PromptRendered { run_id, .. }
        | RunEvent::ProviderInvoked { run_id, .. }
        | RunEvent::EvaluationSucceeded { run_id, .. }
        | RunEvent::EvaluationFailed { run_id, .. } => run_id,
    }
}

#[async_trait]
impl CallbackHandler for RecordingCallback {
    async fn on_event(&self, event: RunEvent) -> Result<(), ArbiterError> {
        self.events.write().await.push(event);
        Ok(())
    }
}
