#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use hub_agent::{AgentEnvelope, AgentTransport, TransportError};
use serde_json::{json, Value};
use tower::ServiceExt;

use hub_api::config::HubConfig;
use hub_api::router::build_app_router;
use hub_api::state::AppState;

/// How the stub agent answers.
pub enum StubReply {
    /// Return this envelope immediately.
    Envelope(Value),
    /// Fail immediately with this message.
    Fail(String),
    /// Never answer.
    Hang,
}

pub struct StubTransport {
    reply: StubReply,
}

#[async_trait]
impl AgentTransport for StubTransport {
    async fn send(&self, _message: &str, _agent_id: &str) -> Result<AgentEnvelope, TransportError> {
        match &self.reply {
            StubReply::Envelope(value) => Ok(AgentEnvelope::new(value.clone())),
            StubReply::Fail(msg) => Err(TransportError::Other(msg.clone())),
            StubReply::Hang => std::future::pending().await,
        }
    }
}

/// Build a test `HubConfig` with safe defaults.
pub fn test_config() -> HubConfig {
    HubConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..Default::default()
    }
}

/// Build the full application router around a stub agent.
///
/// Returns the state too so tests can wait on the orchestrator directly.
pub fn build_test_app(reply: StubReply) -> (Router, AppState) {
    let state = AppState::new(test_config(), Arc::new(StubTransport { reply }));
    let app = build_app_router(state.clone()).expect("test router should build");
    (app, state)
}

/// A successful envelope carrying `document` as the agent result.
pub fn success_envelope(document: Value) -> StubReply {
    StubReply::Envelope(json!({
        "success": true,
        "response": { "result": document }
    }))
}

pub fn valid_brief(topic: &str) -> Value {
    json!({
        "topic": topic,
        "content_type": "Email",
        "word_count": 500
    })
}

/// Let the spawned attempt task run to completion.
pub async fn wait_for_terminal(state: &AppState) {
    for _ in 0..200 {
        if state.orchestrator.phase().is_terminal() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("generation did not reach a terminal phase");
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn post_empty(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
