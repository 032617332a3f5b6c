//! Chat assistant: snapshot-enriched prompts sent to the language model.

use std::sync::Arc;
use std::time::Duration;

use roadwatch_gemini::GenerativeModel;
use roadwatch_traffic::TrafficStore;
use tracing::{debug, error};

use crate::PromptBuilder;

/// Upper bound on a single provider call.
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Answers chat messages with the current traffic snapshot as context.
pub struct ChatAssistant {
    model: Arc<dyn GenerativeModel>,
    store: Arc<TrafficStore>,
}

impl ChatAssistant {
    /// Create an assistant over the given model and traffic store.
    pub fn new(model: Arc<dyn GenerativeModel>, store: Arc<TrafficStore>) -> Self {
        Self { model, store }
    }

    /// Answer a user message.
    ///
    /// Provider failures are absorbed: the underlying error is logged
    /// server-side and a human-readable error string is returned in place of
    /// a reply, so the caller always receives ordinary response text.
    #[tracing::instrument(skip(self, message), fields(message_len = message.len()))]
    pub async fn respond(&self, message: &str) -> String {
        let snapshot = self.store.snapshot().await;
        let prompt = PromptBuilder::build(&snapshot, message);

        match tokio::time::timeout(PROVIDER_TIMEOUT, self.model.generate(&prompt)).await {
            Ok(Ok(reply)) => {
                debug!(response_len = reply.len(), "chat response generated");
                reply
            }
            Ok(Err(e)) => {
                error!(error = %e, "language model request failed");
                format!("Error getting response from the language model: {e}")
            }
            Err(_) => {
                error!(
                    timeout_secs = PROVIDER_TIMEOUT.as_secs(),
                    "language model request timed out"
                );
                "Error getting response from the language model: request timed out".to_string()
            }
        }
    }
}
