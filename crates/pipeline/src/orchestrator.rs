//! Single-flight generation coordinator.
//!
//! All mutable state lives in one [`Session`] behind one lock. Three
//! activities touch it: `start` (caller), the progress tick task, and the
//! attempt task that awaits the transport. Tick updates are applied only
//! while their attempt is still in flight, and the completion path stops
//! the ticker under the same lock before it writes the terminal phase, so
//! no tick is ever observable after `Succeeded`/`Failed`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use chrono::Utc;
use hub_agent::{AgentEnvelope, AgentTransport, TransportError};
use hub_core::agents::{stage_label, MARKETING_COORDINATOR_ID};
use hub_core::artifacts::{extract, ArtifactFile};
use hub_core::document::MarketingDocument;
use hub_core::error::CoreError;
use hub_core::history::{HistoryEntry, HistoryStore, HistorySummary, NewHistoryEntry};
use hub_core::normalize::normalize;
use hub_core::request::GenerationRequest;
use hub_core::types::{AttemptId, HistoryId};
use hub_events::{EventBus, GenerationEvent};
use tokio::task::JoinHandle;

use crate::phase::GenerationPhase;
use crate::snapshot::{GenerationResult, GenerationSnapshot, ProgressSnapshot};
use crate::ticker::ProgressTicker;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default interval between simulated progress ticks.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(3000);

/// Failure reason when the agent answered but the payload was unusable.
pub const PARSE_FAILURE_MESSAGE: &str = "Received a response but could not parse the marketing data. The agent may have returned an unexpected format.";

/// Failure reason when nothing more specific is known.
pub const UNEXPECTED_FAILURE_MESSAGE: &str = "An unexpected error occurred.";

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Agent every brief is sent to.
    pub target_agent_id: String,
    /// Interval between simulated progress ticks.
    pub progress_interval: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            target_agent_id: MARKETING_COORDINATOR_ID.to_string(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Session {
    phase: GenerationPhase,
    /// Id of the most recently accepted attempt (0 = none yet).
    attempt: AttemptId,
    ticks: u64,
    ticker: Option<ProgressTicker>,
    error: Option<String>,
    result: Option<GenerationResult>,
    history: HistoryStore,
}

impl Session {
    fn is_current(&self, attempt: AttemptId) -> bool {
        self.attempt == attempt && self.phase.is_in_flight()
    }

    /// Release the tick source. Idempotent; only the first call stops a task.
    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
        }
    }

    fn fail(&mut self, reason: String) {
        self.stop_ticker();
        self.phase = GenerationPhase::Failed;
        self.error = Some(reason);
        self.result = None;
    }

    fn succeed(&mut self, result: GenerationResult) {
        self.stop_ticker();
        self.phase = GenerationPhase::Succeeded;
        self.error = None;
        self.result = Some(result);
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Coordinator for the single outstanding generation.
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Arc<dyn AgentTransport>,
    config: OrchestratorConfig,
    session: Mutex<Session>,
    events: Arc<EventBus>,
}

/// Handle to an accepted attempt.
#[derive(Debug)]
pub struct GenerationHandle {
    attempt: AttemptId,
    task: JoinHandle<GenerationPhase>,
}

impl GenerationHandle {
    pub fn attempt(&self) -> AttemptId {
        self.attempt
    }

    /// Wait for the attempt to reach a terminal phase.
    pub async fn wait(self) -> GenerationPhase {
        self.task.await.unwrap_or(GenerationPhase::Failed)
    }
}

impl Orchestrator {
    pub fn new(
        transport: Arc<dyn AgentTransport>,
        config: OrchestratorConfig,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                config,
                session: Mutex::new(Session::default()),
                events,
            }),
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.inner.config
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.inner.events
    }

    /// Validate and dispatch a brief.
    ///
    /// Rejected without any state change when the brief is invalid
    /// ([`CoreError::Validation`]) or another attempt is in flight
    /// ([`CoreError::Conflict`]). Must be called from within a Tokio runtime.
    pub fn start(&self, request: GenerationRequest) -> Result<GenerationHandle, CoreError> {
        request.check()?;

        let mut session = self.inner.lock();
        if session.phase.is_in_flight() {
            tracing::warn!(
                attempt = session.attempt,
                "Rejected generation start: another generation is in flight",
            );
            return Err(CoreError::Conflict(
                "A generation is already in progress".to_string(),
            ));
        }

        session.attempt += 1;
        let attempt = session.attempt;
        session.phase = GenerationPhase::Dispatching;
        session.ticks = 0;
        session.error = None;
        session.result = None;
        session.stop_ticker();

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        session.ticker = Some(ProgressTicker::spawn(
            self.inner.config.progress_interval,
            move || weak.upgrade().is_some_and(|inner| inner.advance_progress(attempt)),
        ));

        tracing::info!(
            attempt,
            topic = %request.topic,
            content_type = %request.content_type,
            "Generation accepted",
        );
        self.inner.events.publish(GenerationEvent::Started {
            attempt,
            topic: request.topic.clone(),
            content_type: request.content_type,
        });
        drop(session);

        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move { inner.run_attempt(attempt, request).await });
        Ok(GenerationHandle { attempt, task })
    }

    /// Load a stored generation back into view.
    ///
    /// The history entry itself is not touched.
    pub fn restore(&self, id: HistoryId) -> Result<(), CoreError> {
        let mut session = self.inner.lock();
        if session.phase.is_in_flight() {
            return Err(CoreError::Conflict(
                "Cannot restore while a generation is in progress".to_string(),
            ));
        }
        let entry = session.history.require(id)?;
        let result = GenerationResult {
            history_id: entry.id,
            document: entry.document.clone(),
            artifacts: entry.artifacts.clone(),
        };
        session.succeed(result);
        tracing::info!(history_id = id, "Restored generation from history");
        self.inner
            .events
            .publish(GenerationEvent::Restored { history_id: id });
        Ok(())
    }

    pub fn snapshot(&self) -> GenerationSnapshot {
        let session = self.inner.lock();
        let progress = (session.attempt > 0).then(|| {
            let active_agent_id = session
                .phase
                .is_in_flight()
                .then(|| self.inner.config.target_agent_id.clone());
            ProgressSnapshot::new(session.ticks, active_agent_id)
        });
        GenerationSnapshot {
            phase: session.phase,
            attempt: (session.attempt > 0).then_some(session.attempt),
            progress,
            ticker_running: session.ticker.is_some(),
            error: session.error.clone(),
            result: session.result.clone(),
            history_len: session.history.len(),
        }
    }

    pub fn phase(&self) -> GenerationPhase {
        self.inner.lock().phase
    }

    pub fn history_entry(&self, id: HistoryId) -> Option<HistoryEntry> {
        self.inner.lock().history.get(id).cloned()
    }

    pub fn history_summaries(&self) -> Vec<HistorySummary> {
        self.inner.lock().history.summaries()
    }

    pub fn history_len(&self) -> usize {
        self.inner.lock().history.len()
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Session> {
        // A panic while holding the lock leaves the session consistent
        // enough to keep serving; recover the guard.
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply one progress tick. Returns `false` once the attempt is over.
    fn advance_progress(&self, attempt: AttemptId) -> bool {
        let mut session = self.lock();
        if !session.is_current(attempt) {
            return false;
        }
        session.ticks += 1;
        let ticks = session.ticks;
        tracing::debug!(attempt, ticks, stage = stage_label(ticks), "Generation progress");
        self.events.publish(GenerationEvent::Progress {
            attempt,
            ticks,
            stage: stage_label(ticks),
        });
        true
    }

    async fn run_attempt(
        self: Arc<Self>,
        attempt: AttemptId,
        request: GenerationRequest,
    ) -> GenerationPhase {
        let mut guard = AttemptGuard {
            inner: Arc::clone(&self),
            attempt,
            armed: true,
        };

        let message = request.compose_brief();
        {
            let mut session = self.lock();
            if session.is_current(attempt) {
                session.phase = GenerationPhase::AwaitingResult;
            }
        }
        tracing::info!(
            attempt,
            agent_id = %self.config.target_agent_id,
            "Dispatching brief to agent",
        );

        let outcome = self
            .transport
            .send(&message, &self.config.target_agent_id)
            .await;

        guard.armed = false;
        self.complete(attempt, &request, outcome)
    }

    /// Terminal transition for `attempt`. The ticker is stopped first on
    /// every path.
    fn complete(
        &self,
        attempt: AttemptId,
        request: &GenerationRequest,
        outcome: Result<AgentEnvelope, TransportError>,
    ) -> GenerationPhase {
        let mut session = self.lock();
        if !session.is_current(attempt) {
            return session.phase;
        }
        session.stop_ticker();

        match outcome {
            Ok(envelope) if envelope.is_success() => {
                match normalize(Some(envelope.value())) {
                    Ok(document) => {
                        let artifacts = extract(Some(envelope.value()));
                        let history_id = record(&mut session.history, request, &document, &artifacts);
                        let artifact_count = artifacts.len();
                        session.succeed(GenerationResult {
                            history_id,
                            document,
                            artifacts,
                        });
                        tracing::info!(attempt, history_id, artifact_count, "Generation succeeded");
                        self.events.publish(GenerationEvent::Succeeded {
                            attempt,
                            history_id,
                            artifact_count,
                        });
                    }
                    Err(failure) => {
                        tracing::warn!(
                            attempt,
                            failure = %failure,
                            "Agent response could not be normalized",
                        );
                        self.fail(&mut session, attempt, PARSE_FAILURE_MESSAGE.to_string());
                    }
                }
            }
            Ok(envelope) => {
                let reason = envelope.failure_reason();
                tracing::warn!(attempt, reason = %reason, "Agent reported failure");
                self.fail(&mut session, attempt, reason);
            }
            Err(e) => {
                tracing::error!(attempt, error = %e, "Agent transport failed");
                let reason = e.to_string();
                let reason = if reason.trim().is_empty() {
                    UNEXPECTED_FAILURE_MESSAGE.to_string()
                } else {
                    reason
                };
                self.fail(&mut session, attempt, reason);
            }
        }
        session.phase
    }

    fn fail(&self, session: &mut Session, attempt: AttemptId, reason: String) {
        session.fail(reason.clone());
        self.events.publish(GenerationEvent::Failed { attempt, reason });
    }
}

/// Record a successful generation and return its history id.
fn record(
    history: &mut HistoryStore,
    request: &GenerationRequest,
    document: &MarketingDocument,
    artifacts: &[ArtifactFile],
) -> HistoryId {
    let title = document.display_title().unwrap_or(&request.topic).to_string();
    history.append(NewHistoryEntry {
        title,
        content_type: request.content_type,
        completed_at: Utc::now(),
        document: document.clone(),
        artifacts: artifacts.to_vec(),
    })
}

/// Fails the attempt if its task ends without completing, e.g. because the
/// transport panicked or the task was aborted.
struct AttemptGuard {
    inner: Arc<Inner>,
    attempt: AttemptId,
    armed: bool,
}

impl Drop for AttemptGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut session = self.inner.lock();
        if session.is_current(self.attempt) {
            tracing::error!(attempt = self.attempt, "Generation task ended without a result");
            self.inner
                .fail(&mut session, self.attempt, UNEXPECTED_FAILURE_MESSAGE.to_string());
        }
    }
}
