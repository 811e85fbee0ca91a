//! Read-only views of the orchestrator state.

use hub_core::agents::{active_agent_count, stage_label};
use hub_core::artifacts::ArtifactFile;
use hub_core::document::MarketingDocument;
use hub_core::types::{AttemptId, HistoryId};
use serde::Serialize;

use crate::phase::GenerationPhase;

/// The document currently in view and where it is stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationResult {
    pub history_id: HistoryId,
    pub document: MarketingDocument,
    pub artifacts: Vec<ArtifactFile>,
}

/// Simulated progress of the current attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressSnapshot {
    pub ticks: u64,
    pub stage: &'static str,
    /// How many roster agents to light up.
    pub active_agents: usize,
    /// Agent being addressed while the attempt is in flight.
    pub active_agent_id: Option<String>,
}

impl ProgressSnapshot {
    pub(crate) fn new(ticks: u64, active_agent_id: Option<String>) -> Self {
        Self {
            ticks,
            stage: stage_label(ticks),
            active_agents: active_agent_count(ticks),
            active_agent_id,
        }
    }
}

/// Point-in-time copy of everything a caller may display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationSnapshot {
    pub phase: GenerationPhase,
    /// Most recently accepted attempt, if any.
    pub attempt: Option<AttemptId>,
    pub progress: Option<ProgressSnapshot>,
    pub ticker_running: bool,
    pub error: Option<String>,
    pub result: Option<GenerationResult>,
    pub history_len: usize,
}
