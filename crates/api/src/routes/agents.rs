use axum::extract::State;
use axum::{routing::get, Json, Router};
use hub_core::agents::{AgentInfo, AGENTS, STAGE_LABELS};
use serde::Serialize;

use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AgentRoster {
    /// Agent every brief is addressed to.
    pub target_agent_id: String,
    pub agents: &'static [AgentInfo],
    pub stages: &'static [&'static str],
}

/// GET /api/v1/agents
async fn list_agents(State(state): State<AppState>) -> Json<DataResponse<AgentRoster>> {
    Json(DataResponse {
        data: AgentRoster {
            target_agent_id: state.orchestrator.config().target_agent_id.clone(),
            agents: AGENTS,
            stages: STAGE_LABELS,
        },
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/agents", get(list_agents))
}
