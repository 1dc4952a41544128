//! Review backends and the error taxonomy they share.
//!
//! A backend receives the normalized [`ReviewInput`] plus only its own
//! slice of settings, builds its prompt, makes one network call and
//! returns the raw Markdown review text.

pub mod cloud;
pub mod dispatch;
pub mod local;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::BackendSettings;
use crate::models::{ProviderId, ReviewInput};

pub use cloud::{CloudFailure, CloudTransport, GeminiBackend, RigGeminiTransport};
pub use dispatch::Dispatcher;
pub use local::LocalBackend;

/// Everything that can go wrong between submitting a review and
/// receiving its text.
#[derive(Error, Debug)]
pub enum ReviewError {
    /// Nothing to review.
    #[error("{0}")]
    Validation(String),

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error(
        "{} API key is not configured. Set it with `codecritic settings set gemini.api_key <KEY>` \
         or export GEMINI_API_KEY.",
        .provider.display_name()
    )]
    MissingCredential { provider: ProviderId },

    #[error(
        "Configuration for {} is incomplete. Please configure the URL and model name in settings.",
        .provider.display_name()
    )]
    IncompleteConfiguration { provider: ProviderId },

    #[error(
        "The configured {} API key is invalid. Please check your settings.",
        .provider.display_name()
    )]
    InvalidCredential { provider: ProviderId },

    #[error("{} request to {url} failed with HTTP {status}: {body}", .provider.display_name())]
    ProviderHttp {
        provider: ProviderId,
        status: u16,
        url: String,
        body: String,
    },

    #[error(
        "Received an invalid response from {}: no review content was returned.",
        .provider.display_name()
    )]
    MalformedResponse { provider: ProviderId },

    #[error(
        "Could not connect to {name} at {url}. Please ensure that:\n  \
         1. The {name} server is running.\n  \
         2. The URL is correct in settings.\n  \
         3. The server accepts requests from this client (check its CORS / cross-origin \
         settings, e.g. OLLAMA_ORIGINS for Ollama or \"Enable CORS\" in LM Studio).",
        name = .provider.display_name()
    )]
    Unreachable { provider: ProviderId, url: String },

    #[error("Failed to communicate with {}: {message}", .provider.display_name())]
    ProviderCommunication { provider: ProviderId, message: String },

    #[error(
        "An unknown error occurred while communicating with {}.",
        .provider.display_name()
    )]
    Unknown { provider: ProviderId },

    #[error("A review is already in progress.")]
    ReviewInProgress,
}

/// A backend able to turn a review input into Markdown review text.
#[async_trait]
pub trait ReviewBackend: Send + Sync {
    /// Perform one review request.
    ///
    /// `settings` is the dispatcher's selection for this backend's
    /// provider; a backend handed the wrong kind of settings fails with
    /// [`ReviewError::UnsupportedProvider`].
    async fn review(
        &self,
        input: &ReviewInput,
        settings: &BackendSettings,
    ) -> Result<String, ReviewError>;

    /// Check `settings` without doing any I/O.
    ///
    /// Reports the same configuration errors `review` would, so callers
    /// can fail fast before starting a request.
    fn check_settings(&self, _settings: &BackendSettings) -> Result<(), ReviewError> {
        Ok(())
    }
}
