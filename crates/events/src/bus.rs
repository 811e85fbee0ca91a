//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] fans generation lifecycle events out to any number of
//! subscribers (the SSE endpoint, logging, tests). It is designed to be
//! shared via `Arc<EventBus>`.

use chrono::Utc;
use hub_core::request::ContentType;
use hub_core::types::{AttemptId, HistoryId, Timestamp};
use serde::Serialize;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A generation lifecycle transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GenerationEvent {
    /// A brief was accepted and is being dispatched.
    Started {
        attempt: AttemptId,
        topic: String,
        content_type: ContentType,
    },

    /// The simulated progress indicator advanced.
    Progress {
        attempt: AttemptId,
        ticks: u64,
        stage: &'static str,
    },

    /// The response was normalized and recorded in history.
    Succeeded {
        attempt: AttemptId,
        history_id: HistoryId,
        artifact_count: usize,
    },

    /// The attempt ended without a document.
    Failed { attempt: AttemptId, reason: String },

    /// A history entry was loaded back into view.
    Restored { history_id: HistoryId },
}

impl GenerationEvent {
    /// Dot-separated event name, e.g. `"generation.succeeded"`.
    pub fn event_type(&self) -> &'static str {
        match self {
            GenerationEvent::Started { .. } => "generation.started",
            GenerationEvent::Progress { .. } => "generation.progress",
            GenerationEvent::Succeeded { .. } => "generation.succeeded",
            GenerationEvent::Failed { .. } => "generation.failed",
            GenerationEvent::Restored { .. } => "generation.restored",
        }
    }
}

/// A [`GenerationEvent`] stamped with its creation time.
#[derive(Debug, Clone, Serialize)]
pub struct HubEvent {
    #[serde(flatten)]
    pub event: GenerationEvent,

    /// When the event was created (UTC).
    pub timestamp: Timestamp,
}

impl HubEvent {
    pub fn new(event: GenerationEvent) -> Self {
        Self {
            event,
            timestamp: Utc::now(),
        }
    }

    pub fn event_type(&self) -> &'static str {
        self.event.event_type()
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out event bus.
///
/// ```rust
/// use hub_events::bus::{EventBus, GenerationEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(GenerationEvent::Restored { history_id: 1 });
/// ```
pub struct EventBus {
    sender: broadcast::Sender<HubEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed events are dropped
    /// and slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With no subscribers the event is dropped.
    pub fn publish(&self, event: GenerationEvent) {
        tracing::trace!(event_type = event.event_type(), "Publishing hub event");
        // A SendError only means there are zero receivers.
        let _ = self.sender.send(HubEvent::new(event));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HubEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
