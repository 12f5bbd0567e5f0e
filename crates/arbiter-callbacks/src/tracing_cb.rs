use arbiter_core::{ArbiterError, CallbackHandler, RunEvent};
use async_trait::async_trait;

/// Default handler: turns lifecycle events into `tracing` records.
pub struct TracingCallback;

impl TracingCallback {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TracingCallback {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CallbackHandler for TracingCallback {
    async fn on_event(&self, event: RunEvent) -> Result<(), ArbiterError> {
        match event {
            RunEvent::EvaluationStarted { run_id, strategy } => {
                tracing::info!(run_id = %run_id, strategy = %strategy, "evaluation started");
            }
            RunEvent::PromptRendered {
                run_id,
                message_count,
            } => {
                tracing::debug!(run_id = %run_id, message_count = message_count, "prompt rendered");
            }
            RunEvent::ProviderInvoked { run_id, model } => {
                tracing::info!(run_id = %run_id, model = %model, "judge model invoked");
            }
            RunEvent::EvaluationSucceeded { run_id, strategy } => {
                tracing::info!(run_id = %run_id, strategy = %strategy, "evaluation succeeded");
            }
            RunEvent::EvaluationFailed {
                run_id,
                strategy,
                error,
            } => {
                tracing::warn!(run_id = %run_id, strategy = %strategy, error = %error, "evaluation failed");
            }
        }
        Ok(())
    }
}
