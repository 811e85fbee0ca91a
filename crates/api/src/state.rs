use std::sync::Arc;

use hub_agent::AgentTransport;
use hub_events::EventBus;
use hub_pipeline::Orchestrator;

use crate::config::HubConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The single-flight generation coordinator and its history.
    pub orchestrator: Orchestrator,
    pub config: Arc<HubConfig>,
    /// Lifecycle events, fanned out to SSE subscribers.
    pub event_bus: Arc<EventBus>,
}

impl AppState {
    /// Wire an orchestrator around `transport` using `config`.
    pub fn new(config: HubConfig, transport: Arc<dyn AgentTransport>) -> Self {
        let event_bus = Arc::new(EventBus::default());
        let orchestrator = Orchestrator::new(
            transport,
            config.orchestrator_config(),
            Arc::clone(&event_bus),
        );
        Self {
            orchestrator,
            config: Arc::new(config),
            event_bus,
        }
    }
}
