//! Agent roster and progress stage labels.
//!
//! Only the coordinator is ever addressed directly; the other agents are
//! listed so progress displays can show the pipeline stages.

use serde::Serialize;

/// Agent that receives the brief and orchestrates the other agents.
pub const MARKETING_COORDINATOR_ID: &str = "6991e15a83535abf424bf440";

/// One named agent in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgentInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub role: &'static str,
}

/// Pipeline agents in stage order.
pub const AGENTS: &[AgentInfo] = &[
    AgentInfo {
        id: MARKETING_COORDINATOR_ID,
        name: "Marketing Coordinator",
        role: "Orchestrates the full pipeline",
    },
    AgentInfo {
        id: "6991e141197e042c402253be",
        name: "Content Writer",
        role: "Drafts written content",
    },
    AgentInfo {
        id: "6991e14183535abf424bf43e",
        name: "SEO Analyzer",
        role: "Evaluates SEO quality",
    },
    AgentInfo {
        id: "6991e1426a46d7921f7bf5a4",
        name: "Graphics Generator",
        role: "Creates visual assets",
    },
];

/// Human-readable progress stages, cycled while a generation is in flight.
pub const STAGE_LABELS: &[&str] = &[
    "Drafting content...",
    "Analyzing SEO...",
    "Generating graphics...",
    "Finalizing package...",
];

/// Label for the stage after `ticks` progress ticks, wrapping around.
pub fn stage_label(ticks: u64) -> &'static str {
    let index = (ticks % STAGE_LABELS.len() as u64) as usize;
    STAGE_LABELS[index]
}

/// Number of roster agents to show as active after `ticks` ticks.
pub fn active_agent_count(ticks: u64) -> usize {
    usize::try_from(ticks)
        .unwrap_or(usize::MAX)
        .saturating_add(1)
        .min(AGENTS.len())
}
