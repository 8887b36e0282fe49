use std::sync::Arc;
use std::time::Duration;

use super::prompt::build_prompt;
use super::text_service::{GenerationError, TextService};
use crate::models::outline::DeckConfig;

pub const DEFAULT_TEXT_TIMEOUT: Duration = Duration::from_secs(30);

const HEALTH_PROMPT: &str =
    "Hello, are you working? Respond with 'Yes, ready for presentation generation.'";

/// Sends the outline prompt to the text service under a hard timeout.
/// Failures are returned as-is; nothing is retried here.
#[derive(Clone)]
pub struct OutlineRequester {
    service: Arc<dyn TextService>,
    timeout: Duration,
}

impl OutlineRequester {
    pub fn new(service: Arc<dyn TextService>, timeout: Duration) -> Self {
        Self { service, timeout }
    }

    pub fn model(&self) -> &str {
        self.service.model()
    }

    pub async fn request(&self, config: &DeckConfig) -> Result<String, GenerationError> {
        let prompt = build_prompt(config);
        log::info!(
            "Requesting outline: topic={:?} slides={} depth={} prompt_len={}",
            config.topic,
            config.slide_count,
            config.content_depth,
            prompt.len()
        );

        let raw = self.complete_with_timeout(&prompt).await?;
        log::info!("Text service returned {} chars", raw.len());
        Ok(raw)
    }

    /// Short round trip used by the health endpoint.
    pub async fn ping(&self) -> Result<String, GenerationError> {
        self.complete_with_timeout(HEALTH_PROMPT).await
    }

    async fn complete_with_timeout(&self, prompt: &str) -> Result<String, GenerationError> {
        match tokio::time::timeout(self.timeout, self.service.complete(prompt)).await {
            Ok(Ok(text)) if text.trim().is_empty() => Err(GenerationError::EmptyResponse),
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout(self.timeout)),
        }
    }
}
