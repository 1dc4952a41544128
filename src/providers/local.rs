//! Local OpenAI-compatible review backend (Ollama, LM Studio).
//!
//! One non-streaming `POST` of a chat-completion request to the
//! configured URL. The response is decoded into an explicit schema and
//! anything that does not fit it is a malformed response.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{BackendSettings, LocalEndpoint};
use crate::models::{ProviderId, ReviewInput};
use crate::prompt::{build_local_user_message, build_system_prompt};

use super::{ReviewBackend, ReviewError};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl ChatResponse {
    /// `choices[0].message.content`, when present and non-empty.
    fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()?
            .message?
            .content
            .filter(|content| !content.is_empty())
    }
}

/// Review backend for one local provider.
pub struct LocalBackend {
    provider: ProviderId,
    client: reqwest::Client,
}

impl LocalBackend {
    pub fn new(provider: ProviderId) -> Self {
        Self::with_client(provider, reqwest::Client::new())
    }

    pub fn with_client(provider: ProviderId, client: reqwest::Client) -> Self {
        Self { provider, client }
    }

    pub fn provider(&self) -> ProviderId {
        self.provider
    }

    /// The endpoint to call, if it is complete.
    fn endpoint<'a>(&self, settings: &'a BackendSettings) -> Result<&'a LocalEndpoint, ReviewError> {
        let provider = self.provider;
        let BackendSettings::Local(endpoint) = settings else {
            return Err(ReviewError::UnsupportedProvider(format!(
                "{provider} backend was given cloud settings"
            )));
        };
        if !endpoint.is_complete() {
            return Err(ReviewError::IncompleteConfiguration { provider });
        }
        Ok(endpoint)
    }
}

#[async_trait]
impl ReviewBackend for LocalBackend {
    async fn review(
        &self,
        input: &ReviewInput,
        settings: &BackendSettings,
    ) -> Result<String, ReviewError> {
        let provider = self.provider;
        let endpoint = self.endpoint(settings)?;
        let url = endpoint.url.trim();

        let system = build_system_prompt(input.mode(), input.language());
        let user = build_local_user_message(input);
        let request = ChatRequest {
            model: endpoint.model.trim(),
            messages: [
                ChatMessage {
                    role: "system",
                    content: &system,
                },
                ChatMessage {
                    role: "user",
                    content: &user,
                },
            ],
            stream: false,
        };

        tracing::debug!(%provider, url, model = request.model, "sending review request");

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(%provider, url, error = %e, "local provider unreachable");
                ReviewError::Unreachable {
                    provider,
                    url: url.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(%provider, url, error = %e, "failed to read error response body");
                    String::new()
                }
            };
            tracing::warn!(%provider, url, status = status.as_u16(), "local provider returned an error");
            return Err(ReviewError::ProviderHttp {
                provider,
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| {
            tracing::warn!(%provider, error = %e, "failed to read local provider response");
            ReviewError::MalformedResponse { provider }
        })?;
        serde_json::from_str::<ChatResponse>(&body)
            .ok()
            .and_then(ChatResponse::into_content)
            .ok_or_else(|| {
                tracing::warn!(%provider, "local provider response has no message content");
                ReviewError::MalformedResponse { provider }
            })
    }

    fn check_settings(&self, settings: &BackendSettings) -> Result<(), ReviewError> {
        self.endpoint(settings).map(|_| ())
    }
}
