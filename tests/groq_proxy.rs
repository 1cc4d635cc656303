//! Tests for the Groq chat-completions proxy: provider calls, SSE streaming
//! via wiremock, and the `/api/groq/*` routes.

use std::sync::Arc;

use serde_json::{json, Value};
use tokio_stream::StreamExt;
use tutor_proxy::config::ProviderConfig;
use tutor_proxy::provider::groq::{GroqConfig, GroqMessage, GroqProvider, GroqUsage};
use tutor_proxy::provider::stub::StubProvider;
use tutor_proxy::provider::{ProviderError, TextGenerationProvider};
use tutor_proxy::server::{self, AppState, Server};
use tutor_proxy::tutor::{ChatProxy, StatusProbe};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMPLETIONS: &str = "/openai/v1/chat/completions";

fn provider(server: &MockServer) -> GroqProvider {
    GroqProvider::with_base(
        reqwest::Client::new(),
        "gsk-test".into(),
        "llama3-8b-8192".into(),
        &server.uri(),
    )
    .unwrap()
}

fn sse_body(deltas: &[&str]) -> String {
    let mut lines: Vec<String> = deltas
        .iter()
        .map(|d| format!("data: {}\n", json!({"choices": [{"delta": {"content": d}}]})))
        .collect();
    lines.push("data: [DONE]\n".into());
    lines.join("\n") + "\n"
}

async fn spawn(groq_key: Option<&str>, upstream: &MockServer) -> Server {
    let http = reqwest::Client::new();
    let groq_credential = ProviderConfig::new(groq_key.map(str::to_string), "your_groq_api_key_here");
    let groq = Arc::new(
        GroqProvider::with_base(
            http,
            groq_key.unwrap_or_default().to_string(),
            "llama3-8b-8192".into(),
            &upstream.uri(),
        )
        .unwrap(),
    );
    let stub = Arc::new(StubProvider::new());

    let state = AppState {
        chat: ChatProxy::new(ProviderConfig::absent(), stub.clone()),
        gemini_status: StatusProbe::new("Gemini", "GEMINI_API_KEY", ProviderConfig::absent(), stub),
        groq: groq.clone(),
        groq_status: StatusProbe::new("Groq", "GROQ_API_KEY", groq_credential.clone(), groq),
        groq_credential,
    };
    server::start(state, "127.0.0.1:0".parse().unwrap(), &["http://localhost:5173".to_string()])
        .await
        .unwrap()
}

// ─── Provider ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn chat_returns_content_and_usage() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .and(header("authorization", "Bearer gsk-test"))
        .and(body_partial_json(json!({"model": "llama3-70b-8192", "stream": false, "max_tokens": 256})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Photosynthesis turns light into sugar."}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19}
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let config = GroqConfig {
        model: "llama3-70b-8192".into(),
        max_tokens: 256,
        ..GroqConfig::default()
    };
    let reply = provider(&upstream)
        .chat(&[GroqMessage::user("What is photosynthesis?")], &config)
        .await
        .unwrap();

    assert_eq!(reply.content, "Photosynthesis turns light into sugar.");
    assert_eq!(
        reply.usage,
        Some(GroqUsage {
            prompt_tokens: 12,
            completion_tokens: 7,
            total_tokens: 19
        })
    );
}

#[tokio::test]
async fn chat_surfaces_http_errors() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&upstream)
        .await;

    let err = provider(&upstream)
        .chat(&[GroqMessage::user("hi")], &GroqConfig::default())
        .await
        .unwrap_err();
    match err {
        ProviderError::Status { status, body } => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(body, "invalid api key");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn streaming_yields_deltas_until_done() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(sse_body(&["Hello", "", " world"]))
                .insert_header("content-type", "text/event-stream"),
        )
        .mount(&upstream)
        .await;

    let stream = provider(&upstream)
        .stream_chat(&[GroqMessage::user("hi")], &GroqConfig::default())
        .await
        .unwrap();
    let chunks: Vec<String> = stream
        .collect::<Vec<anyhow::Result<String>>>()
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    assert_eq!(chunks, vec!["Hello", " world"]);
}

#[tokio::test]
async fn generate_and_status_check_use_the_trait() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .and(body_partial_json(json!({"max_tokens": 1, "model": "llama3-8b-8192"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "H"}}]
        })))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .and(body_partial_json(json!({"max_tokens": 1024})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": ""}}]
        })))
        .mount(&upstream)
        .await;

    let p = provider(&upstream);
    assert!(p.probe().await.is_ok());
    let out = p
        .generate("hi".into(), tutor_proxy::provider::GenerationParams::tutor())
        .await
        .unwrap();
    assert_eq!(out, None);
}

#[tokio::test]
async fn status_check_without_choices_is_unexpected_format() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&upstream)
        .await;

    let err = provider(&upstream).probe().await.unwrap_err();
    assert!(matches!(err, ProviderError::Decode(_)));
}

// ─── Routes ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn route_requires_key() {
    let upstream = MockServer::start().await;
    let srv = spawn(None, &upstream).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{}/api/groq/chat", srv.addr))
        .json(&json!({"messages": [{"role": "user", "content": "hi"}]}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 503);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Groq API key is required");

    let status: Value = reqwest::get(format!("http://{}/api/groq-status", srv.addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["status"], "disconnected");
    assert_eq!(status["details"], "Add GROQ_API_KEY to enable full AI features");
    srv.handle.abort();
}

#[tokio::test]
async fn route_rejects_empty_messages() {
    let upstream = MockServer::start().await;
    let srv = spawn(Some("gsk-test"), &upstream).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{}/api/groq/chat", srv.addr))
        .json(&json!({"messages": []}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    assert!(upstream.received_requests().await.unwrap().is_empty());
    srv.handle.abort();
}

#[tokio::test]
async fn route_relays_reply_and_upstream_failures() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .and(body_partial_json(json!({"temperature": 0.5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Sure."}}]
        })))
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(ResponseTemplate::new(503).set_body_string("over capacity"))
        .mount(&upstream)
        .await;

    let srv = spawn(Some("gsk-test"), &upstream).await;
    let client = reqwest::Client::new();
    let url = format!("http://{}/api/groq/chat", srv.addr);

    let resp = client
        .post(&url)
        .json(&json!({"messages": [{"role": "user", "content": "hi"}], "temperature": 0.5}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.json::<Value>().await.unwrap(), json!({"content": "Sure."}));

    let resp = client
        .post(&url)
        .json(&json!({"messages": [{"role": "user", "content": "hi"}]}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
    srv.handle.abort();
}

#[tokio::test]
async fn route_streams_server_sent_events() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(sse_body(&["Two", " plus", " two"]))
                .insert_header("content-type", "text/event-stream"),
        )
        .mount(&upstream)
        .await;

    let srv = spawn(Some("gsk-test"), &upstream).await;
    let resp = reqwest::Client::new()
        .post(format!("http://{}/api/groq/chat", srv.addr))
        .json(&json!({"messages": [{"role": "user", "content": "2+2?"}], "stream": true}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let text = resp.text().await.unwrap();
    let data: Vec<&str> = text
        .lines()
        .filter_map(|l| l.strip_prefix("data: "))
        .collect();
    assert_eq!(data, vec!["Two", " plus", " two", "[DONE]"]);
    assert!(text.contains("event: done"));
    srv.handle.abort();
}
