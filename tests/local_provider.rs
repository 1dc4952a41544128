//! Integration tests for the local OpenAI-compatible providers.
//!
//! Runs the dispatcher against wiremock servers standing in for Ollama
//! and LM Studio, and against a port nothing listens on.

use codecritic::config::{LocalEndpoint, ProviderConfig};
use codecritic::models::{ProjectFile, ProviderId, ReviewInput};
use codecritic::providers::{Dispatcher, ReviewError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(provider: ProviderId, url: String) -> ProviderConfig {
    let mut config = ProviderConfig::default();
    let endpoint = LocalEndpoint::new(url, "test-model");
    match provider {
        ProviderId::Ollama => config.ollama = endpoint,
        ProviderId::LmStudio => config.lmstudio = endpoint,
        ProviderId::Gemini => unreachable!("local providers only"),
    }
    config
}

async fn server_replying(template: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(template)
        .mount(&server)
        .await;
    server
}

/// A URL on a port that refuses connections.
fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/v1/chat/completions")
}

fn snippet() -> ReviewInput {
    ReviewInput::snippet("function f() { return 1 }", "javascript")
}

#[tokio::test]
async fn well_formed_response_returns_content_exactly() {
    for provider in [ProviderId::Ollama, ProviderId::LmStudio] {
        let server = server_replying(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"content": "X"}}]
        })))
        .await;
        let config = config_for(provider, format!("{}/v1/chat/completions", server.uri()));

        let review = Dispatcher::with_defaults()
            .dispatch(&snippet(), provider, &config)
            .await
            .unwrap();
        assert_eq!(review, "X");
    }
}

#[tokio::test]
async fn http_500_carries_status_url_and_body() {
    let server = server_replying(ResponseTemplate::new(500).set_body_string("boom")).await;
    let url = format!("{}/v1/chat/completions", server.uri());
    let config = config_for(ProviderId::Ollama, url.clone());

    let err = Dispatcher::with_defaults()
        .dispatch(&snippet(), ProviderId::Ollama, &config)
        .await
        .unwrap_err();
    match err {
        ReviewError::ProviderHttp {
            provider,
            status,
            url: failed_url,
            body,
        } => {
            assert_eq!(provider, ProviderId::Ollama);
            assert_eq!(status, 500);
            assert_eq!(failed_url, url);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn success_without_content_is_malformed() {
    for body in [
        serde_json::json!({"choices": []}),
        serde_json::json!({"id": "chatcmpl-1"}),
        serde_json::json!({"choices": [{"message": {"role": "assistant"}}]}),
    ] {
        let server = server_replying(ResponseTemplate::new(200).set_body_json(body)).await;
        let config = config_for(
            ProviderId::LmStudio,
            format!("{}/v1/chat/completions", server.uri()),
        );
        let err = Dispatcher::with_defaults()
            .dispatch(&snippet(), ProviderId::LmStudio, &config)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReviewError::MalformedResponse {
                provider: ProviderId::LmStudio
            }
        ));
    }
}

#[tokio::test]
async fn non_json_success_is_malformed() {
    let server =
        server_replying(ResponseTemplate::new(200).set_body_string("<html>hi</html>")).await;
    let config = config_for(ProviderId::Ollama, format!("{}/v1/chat/completions", server.uri()));
    let err = Dispatcher::with_defaults()
        .dispatch(&snippet(), ProviderId::Ollama, &config)
        .await
        .unwrap_err();
    assert!(matches!(err, ReviewError::MalformedResponse { .. }));
}

#[tokio::test]
async fn connection_refused_is_unreachable_with_guidance() {
    let url = refused_url();
    let config = config_for(ProviderId::LmStudio, url.clone());

    let err = Dispatcher::with_defaults()
        .dispatch(&snippet(), ProviderId::LmStudio, &config)
        .await
        .unwrap_err();
    match &err {
        ReviewError::Unreachable {
            provider,
            url: failed_url,
        } => {
            assert_eq!(*provider, ProviderId::LmStudio);
            assert_eq!(*failed_url, url);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let message = err.to_string();
    assert!(message.contains("LM Studio"));
    assert!(message.contains("CORS"));
}

#[tokio::test]
async fn project_request_lists_files_in_order() {
    let server = server_replying(ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "choices": [{"message": {"content": "project ok"}}]
    })))
    .await;
    let config = config_for(ProviderId::Ollama, format!("{}/v1/chat/completions", server.uri()));
    let input = ReviewInput::project(
        vec![
            ProjectFile::new("api/main.go", "package main"),
            ProjectFile::new("api/db/db.go", "package db"),
        ],
        "go",
    );

    let review = Dispatcher::with_defaults()
        .dispatch(&input, ProviderId::Ollama, &config)
        .await
        .unwrap();
    assert_eq!(review, "project ok");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["model"], "test-model");
    assert_eq!(body["stream"], false);
    let system = body["messages"][0]["content"].as_str().unwrap();
    assert!(system.contains("entire project, primarily in go"));
    let user = body["messages"][1]["content"].as_str().unwrap();
    let main_pos = user.find("File: `api/main.go`").unwrap();
    let db_pos = user.find("File: `api/db/db.go`").unwrap();
    assert!(main_pos < db_pos);
}
