//! Gemini review backend.
//!
//! The network call goes through a [`CloudTransport`]; production uses
//! rig-core's Gemini client, tests substitute a counting fake.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers;

use crate::config::{BackendSettings, CloudSettings};
use crate::models::{ProviderId, ReviewInput};
use crate::prompt::build_prompt;

use super::{ReviewBackend, ReviewError};

/// Maximum tokens per completion response.
///
/// Thinking models spend part of the budget on reasoning tokens, and
/// Gemini's default limit truncates long project reviews.
const MAX_TOKENS: u64 = 65536;

/// Backend messages that mean the key itself was rejected.
static INVALID_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)api key not valid|api_key_invalid|invalid api key").unwrap()
});

/// How a cloud call failed, before mapping to [`ReviewError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloudFailure {
    /// The backend or client reported an error with a message.
    Backend(String),
    /// A failure that carried no usable message.
    Opaque,
}

impl CloudFailure {
    /// Wrap an error message, treating a blank one as opaque.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            CloudFailure::Opaque
        } else {
            CloudFailure::Backend(message)
        }
    }
}

/// One-shot text generation against the managed LLM API.
#[async_trait]
pub trait CloudTransport: Send + Sync {
    async fn generate(&self, api_key: &str, model: &str, prompt: &str)
    -> Result<String, CloudFailure>;
}

/// rig-core's Gemini client.
#[derive(Debug, Default, Clone, Copy)]
pub struct RigGeminiTransport;

#[async_trait]
impl CloudTransport for RigGeminiTransport {
    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
    ) -> Result<String, CloudFailure> {
        let client = providers::gemini::Client::new(api_key)
            .map_err(|e| CloudFailure::from_message(format!("failed to create Gemini client: {e}")))?;
        let agent = client
            .agent(model)
            .temperature(0.0)
            .max_tokens(MAX_TOKENS)
            .build();
        agent
            .prompt(prompt)
            .await
            .map_err(|e| CloudFailure::from_message(e.to_string()))
    }
}

/// The cloud review backend.
pub struct GeminiBackend {
    transport: Arc<dyn CloudTransport>,
}

impl GeminiBackend {
    pub fn new(transport: Arc<dyn CloudTransport>) -> Self {
        Self { transport }
    }

    /// Backend wired to the real Gemini API.
    pub fn with_rig() -> Self {
        Self::new(Arc::new(RigGeminiTransport))
    }
}

impl Default for GeminiBackend {
    fn default() -> Self {
        Self::with_rig()
    }
}

/// The cloud settings and a usable API key, or the configuration error.
fn credentials(settings: &BackendSettings) -> Result<(&CloudSettings, &str), ReviewError> {
    let BackendSettings::Cloud(cloud) = settings else {
        return Err(ReviewError::UnsupportedProvider(format!(
            "{} backend was given local endpoint settings",
            ProviderId::Gemini
        )));
    };
    let api_key = cloud.api_key().ok_or(ReviewError::MissingCredential {
        provider: ProviderId::Gemini,
    })?;
    Ok((cloud, api_key))
}

#[async_trait]
impl ReviewBackend for GeminiBackend {
    async fn review(
        &self,
        input: &ReviewInput,
        settings: &BackendSettings,
    ) -> Result<String, ReviewError> {
        let (cloud, api_key) = credentials(settings)?;

        let prompt = build_prompt(input);
        tracing::debug!(
            model = %cloud.model,
            mode = %input.mode(),
            prompt_len = prompt.len(),
            "sending review to Gemini"
        );

        self.transport
            .generate(api_key, &cloud.model, &prompt)
            .await
            .map_err(|failure| {
                tracing::warn!(?failure, "Gemini review failed");
                map_failure(failure)
            })
    }

    fn check_settings(&self, settings: &BackendSettings) -> Result<(), ReviewError> {
        credentials(settings).map(|_| ())
    }
}

fn map_failure(failure: CloudFailure) -> ReviewError {
    let provider = ProviderId::Gemini;
    match failure {
        CloudFailure::Backend(message) if INVALID_KEY_RE.is_match(&message) => {
            ReviewError::InvalidCredential { provider }
        }
        CloudFailure::Backend(message) => ReviewError::ProviderCommunication { provider, message },
        CloudFailure::Opaque => ReviewError::Unknown { provider },
    }
}
