use std::sync::Arc;

use arbiter_core::{ArbiterError, CallbackHandler, RunEvent};
use async_trait::async_trait;

/// Fans each event out to every handler, in order. A failing handler does
/// not keep the event from the ones after it; the first error is returned
/// once all have run, as `ArbiterError::Callback`.
pub struct CompositeCallback {
    handlers: Vec<Arc<dyn CallbackHandler>>,
}

impl CompositeCallback {
    pub fn new(handlers: Vec<Arc<dyn CallbackHandler>>) -> Self {
        Self { handlers }
    }
}

#[async_trait]
impl CallbackHandler for CompositeCallback {
    async fn on_event(&self, event: RunEvent) -> Result<(), ArbiterError> {
        let mut first_error = None;
        for handler in &self.handlers {
            if let Err(e) = handler.on_event(event.clone()).await {
                first_error.get_or_insert(match e {
                    ArbiterError::Callback(_) => e,
                    other => ArbiterError::Callback(other.to_string()),
                });
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
