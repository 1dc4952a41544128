//! Provider selection.
//!
//! The dispatcher is a registry from [`ProviderId`] to backend. It passes
//! each backend only that provider's settings and returns the backend's
//! result untouched: no retries, no wrapping.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ProviderConfig;
use crate::models::{ProviderId, ReviewInput};

use super::{GeminiBackend, LocalBackend, ReviewBackend, ReviewError};

#[derive(Default, Clone)]
pub struct Dispatcher {
    backends: HashMap<ProviderId, Arc<dyn ReviewBackend>>,
}

impl Dispatcher {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the production backend for every provider.
    pub fn with_defaults() -> Self {
        let client = reqwest::Client::new();
        Self::new()
            .register(ProviderId::Gemini, Arc::new(GeminiBackend::with_rig()))
            .register(
                ProviderId::Ollama,
                Arc::new(LocalBackend::with_client(ProviderId::Ollama, client.clone())),
            )
            .register(
                ProviderId::LmStudio,
                Arc::new(LocalBackend::with_client(ProviderId::LmStudio, client)),
            )
    }

    /// Add or replace the backend for `provider`.
    pub fn register(mut self, provider: ProviderId, backend: Arc<dyn ReviewBackend>) -> Self {
        self.backends.insert(provider, backend);
        self
    }

    pub fn is_registered(&self, provider: ProviderId) -> bool {
        self.backends.contains_key(&provider)
    }

    fn backend(&self, provider: ProviderId) -> Result<&Arc<dyn ReviewBackend>, ReviewError> {
        self.backends
            .get(&provider)
            .ok_or_else(|| ReviewError::UnsupportedProvider(provider.to_string()))
    }

    /// Report configuration gaps for `provider` without any I/O.
    pub fn check(&self, provider: ProviderId, config: &ProviderConfig) -> Result<(), ReviewError> {
        self.backend(provider)?
            .check_settings(&config.settings_for(provider))
    }

    /// Send `input` to the backend registered for `provider`.
    pub async fn dispatch(
        &self,
        input: &ReviewInput,
        provider: ProviderId,
        config: &ProviderConfig,
    ) -> Result<String, ReviewError> {
        let backend = self.backend(provider)?;
        tracing::debug!(%provider, mode = %input.mode(), files = input.file_count(), "dispatching review");
        backend.review(input, &config.settings_for(provider)).await
    }

    /// Like [`dispatch`](Self::dispatch), for a provider named by string.
    pub async fn dispatch_named(
        &self,
        input: &ReviewInput,
        provider: &str,
        config: &ProviderConfig,
    ) -> Result<String, ReviewError> {
        let provider: ProviderId = provider.parse().map_err(ReviewError::UnsupportedProvider)?;
        self.dispatch(input, provider, config).await
    }
}
