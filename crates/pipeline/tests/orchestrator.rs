//! Integration tests for the generation orchestrator.
//!
//! A scripted transport hands control of each agent reply to the test, and
//! the clock is paused so progress ticks only fire when a test advances time.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use hub_agent::{AgentEnvelope, AgentTransport, TransportError};
use hub_core::agents::MARKETING_COORDINATOR_ID;
use hub_core::error::CoreError;
use hub_core::request::{ContentType, GenerationRequest};
use hub_events::{EventBus, GenerationEvent};
use hub_pipeline::orchestrator::{PARSE_FAILURE_MESSAGE, UNEXPECTED_FAILURE_MESSAGE};
use hub_pipeline::{GenerationPhase, Orchestrator, OrchestratorConfig};
use serde_json::{json, Value};
use tokio::sync::oneshot;

const PERIOD: Duration = Duration::from_millis(3000);

// ---------------------------------------------------------------------------
// Scripted transport
// ---------------------------------------------------------------------------

enum Reply {
    Envelope(Value),
    Error(TransportError),
    Panic,
}

#[derive(Default)]
struct ScriptedTransport {
    calls: Mutex<Vec<(String, String)>>,
    replies: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
}

impl ScriptedTransport {
    /// Queue the next call; the returned sender delivers its reply.
    fn expect_call(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().unwrap().push_back(rx);
        tx
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentTransport for ScriptedTransport {
    async fn send(&self, message: &str, agent_id: &str) -> Result<AgentEnvelope, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((message.to_string(), agent_id.to_string()));
        let reply = self.replies.lock().unwrap().pop_front();
        let Some(reply) = reply else {
            return Err(TransportError::Other("no reply scripted".to_string()));
        };
        match reply.await {
            Ok(Reply::Envelope(value)) => Ok(AgentEnvelope::new(value)),
            Ok(Reply::Error(e)) => Err(e),
            Ok(Reply::Panic) => panic!("scripted transport panic"),
            Err(_) => Err(TransportError::Other("reply dropped".to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn setup() -> (Orchestrator, Arc<ScriptedTransport>, Arc<EventBus>) {
    let transport = Arc::new(ScriptedTransport::default());
    let events = Arc::new(EventBus::default());
    let orchestrator = Orchestrator::new(
        transport.clone(),
        OrchestratorConfig {
            progress_interval: PERIOD,
            ..Default::default()
        },
        events.clone(),
    );
    (orchestrator, transport, events)
}

fn brief(topic: &str) -> GenerationRequest {
    GenerationRequest::new(topic)
        .with_content_type(ContentType::Email)
        .with_word_count(500)
}

fn success_with(result: Value) -> Reply {
    Reply::Envelope(json!({ "success": true, "response": { "result": result } }))
}

fn package(title: &str) -> Value {
    json!({
        "project_title": title,
        "written_content": { "title": format!("{title} headline"), "word_count": 498 },
        "seo_analysis": { "seo_score": 77 },
        "status": "Complete"
    })
}

/// Let spawned tasks run until they block.
async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

async fn tick() {
    tokio::time::advance(PERIOD).await;
    settle().await;
}

fn ticks(orchestrator: &Orchestrator) -> u64 {
    orchestrator
        .snapshot()
        .progress
        .map(|p| p.ticks)
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Single flight
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn second_start_is_rejected_while_in_flight() {
    let (orchestrator, transport, _events) = setup();
    let reply = transport.expect_call();

    let handle = orchestrator.start(brief("First")).unwrap();
    settle().await;
    tick().await;
    assert_eq!(ticks(&orchestrator), 1);

    let rejected = orchestrator.start(brief("Second"));
    assert_matches!(rejected, Err(CoreError::Conflict(_)));

    // The running attempt is untouched.
    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.phase, GenerationPhase::AwaitingResult);
    assert_eq!(snapshot.attempt, Some(handle.attempt()));
    assert_eq!(ticks(&orchestrator), 1);
    assert_eq!(transport.calls().len(), 1);

    reply.send(success_with(package("First"))).ok();
    assert_eq!(handle.wait().await, GenerationPhase::Succeeded);
}

#[tokio::test(start_paused = true)]
async fn back_to_back_start_is_rejected_while_dispatching() {
    let (orchestrator, transport, _events) = setup();
    let reply = transport.expect_call();

    // No await between the two calls: the first attempt has not reached
    // the transport yet.
    let handle = orchestrator.start(brief("First")).unwrap();
    let rejected = orchestrator.start(brief("Second"));
    assert_matches!(rejected, Err(CoreError::Conflict(_)));

    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.phase, GenerationPhase::Dispatching);
    assert_eq!(snapshot.attempt, Some(handle.attempt()));
    assert_eq!(ticks(&orchestrator), 0);

    settle().await;
    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].0.contains("First"));

    reply.send(success_with(package("First"))).ok();
    assert_eq!(handle.wait().await, GenerationPhase::Succeeded);
    assert_eq!(
        orchestrator.snapshot().result.map(|r| r.document.project_title().to_string()),
        Some("First".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn progress_advances_once_per_period() {
    let (orchestrator, transport, _events) = setup();
    let reply = transport.expect_call();
    let handle = orchestrator.start(brief("Ticks")).unwrap();
    settle().await;

    let snapshot = orchestrator.snapshot();
    assert!(snapshot.ticker_running);
    let progress = snapshot.progress.unwrap();
    assert_eq!(progress.ticks, 0);
    assert_eq!(progress.stage, "Drafting content...");
    assert_eq!(progress.active_agents, 1);
    assert_eq!(progress.active_agent_id.as_deref(), Some(MARKETING_COORDINATOR_ID));

    for expected in 1..=5 {
        tick().await;
        assert_eq!(ticks(&orchestrator), expected);
    }
    let progress = orchestrator.snapshot().progress.unwrap();
    assert_eq!(progress.stage, "Analyzing SEO...");
    assert_eq!(progress.active_agents, 4);

    reply.send(success_with(package("Ticks"))).ok();
    handle.wait().await;
}

// ---------------------------------------------------------------------------
// Failure paths
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn transport_failure_stops_the_ticker() {
    let (orchestrator, transport, _events) = setup();
    let reply = transport.expect_call();
    let handle = orchestrator.start(brief("Down")).unwrap();
    settle().await;
    tick().await;

    reply
        .send(Reply::Error(TransportError::Api {
            status: 502,
            body: "bad gateway".to_string(),
        }))
        .ok();
    assert_eq!(handle.wait().await, GenerationPhase::Failed);

    let snapshot = orchestrator.snapshot();
    assert!(!snapshot.ticker_running);
    assert_eq!(
        snapshot.error.as_deref(),
        Some("Agent service returned HTTP 502")
    );
    assert!(snapshot.result.is_none());
    assert_eq!(snapshot.history_len, 0);

    // No tick lands after the terminal phase.
    let frozen = ticks(&orchestrator);
    for _ in 0..3 {
        tick().await;
    }
    assert_eq!(ticks(&orchestrator), frozen);
    assert_eq!(orchestrator.phase(), GenerationPhase::Failed);
}

#[tokio::test(start_paused = true)]
async fn unparsable_result_fails_with_generic_message() {
    let (orchestrator, transport, _events) = setup();
    let reply = transport.expect_call();
    let handle = orchestrator.start(brief("Garbled")).unwrap();
    settle().await;

    reply
        .send(success_with(json!("I could not produce JSON today")))
        .ok();
    assert_eq!(handle.wait().await, GenerationPhase::Failed);

    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.error.as_deref(), Some(PARSE_FAILURE_MESSAGE));
    assert!(snapshot.result.is_none());
    assert_eq!(snapshot.history_len, 0);
}

#[tokio::test(start_paused = true)]
async fn unsuccessful_envelope_passes_error_through() {
    let (orchestrator, transport, _events) = setup();
    let reply = transport.expect_call();
    let handle = orchestrator.start(brief("Quota")).unwrap();
    settle().await;

    reply
        .send(Reply::Envelope(json!({ "success": false, "error": "quota exceeded" })))
        .ok();
    assert_eq!(handle.wait().await, GenerationPhase::Failed);
    assert_eq!(
        orchestrator.snapshot().error.as_deref(),
        Some("quota exceeded")
    );
}

#[tokio::test(start_paused = true)]
async fn panicking_transport_fails_the_attempt() {
    let (orchestrator, transport, _events) = setup();
    let reply = transport.expect_call();
    let handle = orchestrator.start(brief("Boom")).unwrap();
    settle().await;

    reply.send(Reply::Panic).ok();
    assert_eq!(handle.wait().await, GenerationPhase::Failed);

    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.phase, GenerationPhase::Failed);
    assert_eq!(snapshot.error.as_deref(), Some(UNEXPECTED_FAILURE_MESSAGE));
    assert!(!snapshot.ticker_running);

    // The orchestrator accepts new work afterwards.
    let reply = transport.expect_call();
    let handle = orchestrator.start(brief("Again")).unwrap();
    settle().await;
    reply.send(success_with(package("Again"))).ok();
    assert_eq!(handle.wait().await, GenerationPhase::Succeeded);
}

#[tokio::test(start_paused = true)]
async fn invalid_brief_never_reaches_the_transport() {
    let (orchestrator, transport, _events) = setup();

    let err = orchestrator.start(GenerationRequest::new("   ")).unwrap_err();
    assert_matches!(err, CoreError::Validation(ref msg) if msg.contains("content topic"));

    let err = orchestrator
        .start(brief("Too long").with_word_count(5000))
        .unwrap_err();
    assert_matches!(err, CoreError::Validation(_));

    settle().await;
    assert!(transport.calls().is_empty());
    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.phase, GenerationPhase::Idle);
    assert_eq!(snapshot.attempt, None);
    assert!(snapshot.progress.is_none());
}

// ---------------------------------------------------------------------------
// Success and history
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn end_to_end_success_records_history() {
    let (orchestrator, transport, _events) = setup();
    let request = brief("X");
    let reply = transport.expect_call();
    let handle = orchestrator.start(request.clone()).unwrap();
    settle().await;

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, request.compose_brief());
    assert_eq!(calls[0].1, MARKETING_COORDINATOR_ID);
    assert!(calls[0].0.contains("- Content Type: Email"));
    assert!(calls[0].0.contains("- Word Count: 500"));

    // The agent wraps its package in a JSON string.
    let stringified = serde_json::to_string(&package("X")).unwrap();
    reply.send(success_with(Value::String(stringified))).ok();
    assert_eq!(handle.wait().await, GenerationPhase::Succeeded);

    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.history_len, 1);
    assert!(!snapshot.ticker_running);
    assert!(snapshot.error.is_none());

    let result = snapshot.result.unwrap();
    assert!(result.artifacts.is_empty());
    assert_eq!(result.document.project_title(), "X");
    assert_eq!(result.document.seo().score(), 77.0);

    let entry = orchestrator.history_entry(result.history_id).unwrap();
    assert_eq!(entry.document, result.document);
    assert_eq!(entry.title, "X");
    assert_eq!(entry.content_type, ContentType::Email);
}

#[tokio::test(start_paused = true)]
async fn artifacts_from_module_outputs_are_kept() {
    let (orchestrator, transport, _events) = setup();
    let reply = transport.expect_call();
    let handle = orchestrator.start(brief("Images")).unwrap();
    settle().await;

    reply
        .send(Reply::Envelope(json!({
            "success": true,
            "response": { "result": package("Images") },
            "module_outputs": {
                "artifact_files": [
                    { "file_url": "https://cdn.example.com/header.png", "name": "header.png" }
                ]
            }
        })))
        .ok();
    assert_eq!(handle.wait().await, GenerationPhase::Succeeded);

    let result = orchestrator.snapshot().result.unwrap();
    assert_eq!(result.artifacts.len(), 1);
    assert_eq!(result.artifacts[0].file_url, "https://cdn.example.com/header.png");
    assert_eq!(orchestrator.history_summaries()[0].artifact_count, 1);
}

#[tokio::test(start_paused = true)]
async fn history_entries_survive_later_generations() {
    let (orchestrator, transport, _events) = setup();

    let reply = transport.expect_call();
    let first = orchestrator.start(brief("One")).unwrap();
    settle().await;
    reply.send(success_with(package("One"))).ok();
    first.wait().await;
    let first_id = orchestrator.snapshot().result.unwrap().history_id;
    let stored = orchestrator.history_entry(first_id).unwrap();

    let reply = transport.expect_call();
    let second = orchestrator.start(brief("Two")).unwrap();
    settle().await;
    assert!(orchestrator.snapshot().result.is_none());
    reply.send(success_with(package("Two"))).ok();
    second.wait().await;

    assert_eq!(orchestrator.history_entry(first_id).unwrap(), stored);
    let titles: Vec<_> = orchestrator
        .history_summaries()
        .into_iter()
        .map(|s| s.title)
        .collect();
    assert_eq!(titles, ["Two", "One"]);
}

#[tokio::test(start_paused = true)]
async fn restore_loads_history_into_view() {
    let (orchestrator, transport, _events) = setup();

    let mut ids = Vec::new();
    for topic in ["Alpha", "Beta"] {
        let reply = transport.expect_call();
        let handle = orchestrator.start(brief(topic)).unwrap();
        settle().await;
        reply.send(success_with(package(topic))).ok();
        handle.wait().await;
        ids.push(orchestrator.snapshot().result.unwrap().history_id);
    }

    orchestrator.restore(ids[0]).unwrap();
    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.phase, GenerationPhase::Succeeded);
    let result = snapshot.result.unwrap();
    assert_eq!(result.history_id, ids[0]);
    assert_eq!(result.document.project_title(), "Alpha");
    assert_eq!(snapshot.history_len, 2);

    assert_matches!(
        orchestrator.restore(99),
        Err(CoreError::NotFound { id: 99, .. })
    );

    let reply = transport.expect_call();
    let handle = orchestrator.start(brief("Gamma")).unwrap();
    settle().await;
    assert_matches!(orchestrator.restore(ids[1]), Err(CoreError::Conflict(_)));
    reply.send(success_with(package("Gamma"))).ok();
    handle.wait().await;
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn lifecycle_events_are_published_in_order() {
    let (orchestrator, transport, events) = setup();
    let mut rx = events.subscribe();

    let reply = transport.expect_call();
    let handle = orchestrator.start(brief("Events")).unwrap();
    settle().await;
    tick().await;
    tick().await;
    reply.send(success_with(package("Events"))).ok();
    handle.wait().await;

    let mut received = Vec::new();
    while let Ok(event) = rx.try_recv() {
        received.push(event.event);
    }

    assert_eq!(received.len(), 4);
    assert_matches!(
        &received[0],
        GenerationEvent::Started { topic, content_type: ContentType::Email, .. } if topic == "Events"
    );
    assert_matches!(received[1], GenerationEvent::Progress { ticks: 1, stage: "Analyzing SEO...", .. });
    assert_matches!(received[2], GenerationEvent::Progress { ticks: 2, .. });
    assert_matches!(received[3], GenerationEvent::Succeeded { artifact_count: 0, .. });
}
