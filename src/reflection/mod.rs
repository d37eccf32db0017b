//! Reflection Module
//!
//! Optional AI reflection on a journal entry. The call is slow and can fail
//! for reasons outside our control (network, auth, quota), so callers get
//! either a `Result` or, from `reflect_tagged`, a plain string whose failure
//! form starts with [`AI_ERROR_PREFIX`]. Nothing here touches storage.

mod prompt;
mod provider;

pub use prompt::{build_prompt, SYSTEM_PROMPT};
pub use provider::{LLMProvider, OpenAICompatibleProvider};

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::JournalConfig;
use crate::journal::JournalEntry;

/// Marker that starts every failed reflection string
pub const AI_ERROR_PREFIX: &str = "[AI Error]";

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum ReflectionError {
    #[error("{0}")]
    Provider(#[source] anyhow::Error),

    #[error("reflection timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),

    #[error("model returned an empty reflection")]
    EmptyResponse,
}

/// A reflection string classified by the failure marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReflectionOutcome {
    Reflection(String),
    Failed(String),
}

impl ReflectionOutcome {
    pub fn from_tagged(text: impl Into<String>) -> Self {
        let text = text.into();
        match text.strip_prefix(AI_ERROR_PREFIX) {
            Some(reason) => ReflectionOutcome::Failed(reason.trim().to_string()),
            None => ReflectionOutcome::Reflection(text),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ReflectionOutcome::Failed(_))
    }

    /// Back to the tagged string form
    pub fn into_tagged(self) -> String {
        match self {
            ReflectionOutcome::Reflection(text) => text,
            ReflectionOutcome::Failed(reason) => format!("{} {}", AI_ERROR_PREFIX, reason),
        }
    }
}

impl From<Result<String, ReflectionError>> for ReflectionOutcome {
    fn from(result: Result<String, ReflectionError>) -> Self {
        match result {
            Ok(text) => ReflectionOutcome::Reflection(text),
            Err(e) => ReflectionOutcome::Failed(e.to_string()),
        }
    }
}

/// Generates reflections for journal entries through an `LLMProvider`
#[derive(Clone)]
pub struct Reflector {
    provider: Arc<dyn LLMProvider>,
    model: String,
    timeout: Duration,
}

impl Reflector {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            provider,
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// OpenAI-compatible reflector using the model, URL, temperature and
    /// timeout from `config`
    pub fn from_config(config: &JournalConfig, api_key: impl Into<String>) -> Self {
        let provider = OpenAICompatibleProvider::new(
            config.api_base_url.clone(),
            Some(api_key.into()),
        )
        .with_temperature(config.reflection_temperature);
        Self::new(Arc::new(provider))
            .with_model(config.model.clone())
            .with_timeout(Duration::from_secs(config.reflection_timeout_secs))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the model to reflect on `entry`
    pub async fn reflect(&self, entry: &JournalEntry) -> Result<String, ReflectionError> {
        let prompt = build_prompt(entry);
        debug!("Reflection prompt for {} ({} chars)", self.model, prompt.len());

        let call = self
            .provider
            .generate(&self.model, prompt, Some(SYSTEM_PROMPT.to_string()));

        let content = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| ReflectionError::Timeout(self.timeout))?
            .map_err(ReflectionError::Provider)?;

        let content = content.trim();
        if content.is_empty() {
            return Err(ReflectionError::EmptyResponse);
        }
        Ok(content.to_string())
    }

    /// Like `reflect`, but failures come back as `"[AI Error] ..."`.
    pub async fn reflect_tagged(&self, entry: &JournalEntry) -> String {
        let outcome = ReflectionOutcome::from(self.reflect(entry).await);
        if let ReflectionOutcome::Failed(ref reason) = outcome {
            warn!("Reflection via {} failed: {}", self.model, reason);
        }
        outcome.into_tagged()
    }
}
