//! Routes for the session history.
//!
//! ```text
//! GET    /                 list_history
//! GET    /{id}             get_history_entry
//! POST   /{id}/restore     restore_history_entry
//! GET    /{id}/export      export_history_entry
//! ```

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use hub_core::error::CoreError;
use hub_core::export::{export_filename, render_package};
use hub_core::history::{HistoryEntry, HistorySummary};
use hub_core::types::HistoryId;
use hub_pipeline::GenerationSnapshot;

use crate::error::AppResult;
use crate::response::{DataResponse, TextDownload};
use crate::state::AppState;

fn find_entry(state: &AppState, id: HistoryId) -> AppResult<HistoryEntry> {
    let entry = state
        .orchestrator
        .history_entry(id)
        .ok_or(CoreError::NotFound {
            entity: "history entry",
            id,
        })?;
    Ok(entry)
}

/// GET /api/v1/history
async fn list_history(State(state): State<AppState>) -> Json<DataResponse<Vec<HistorySummary>>> {
    Json(DataResponse {
        data: state.orchestrator.history_summaries(),
    })
}

/// GET /api/v1/history/{id}
async fn get_history_entry(
    State(state): State<AppState>,
    Path(id): Path<HistoryId>,
) -> AppResult<Json<DataResponse<HistoryEntry>>> {
    let entry = find_entry(&state, id)?;
    Ok(Json(DataResponse { data: entry }))
}

/// POST /api/v1/history/{id}/restore
///
/// Returns the snapshot after the entry has been loaded into view.
async fn restore_history_entry(
    State(state): State<AppState>,
    Path(id): Path<HistoryId>,
) -> AppResult<Json<DataResponse<GenerationSnapshot>>> {
    state.orchestrator.restore(id)?;
    Ok(Json(DataResponse {
        data: state.orchestrator.snapshot(),
    }))
}

/// GET /api/v1/history/{id}/export
async fn export_history_entry(
    State(state): State<AppState>,
    Path(id): Path<HistoryId>,
) -> AppResult<TextDownload> {
    let entry = find_entry(&state, id)?;
    Ok(TextDownload {
        filename: export_filename(&entry.document),
        body: render_package(&entry.document, &entry.artifacts),
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_history))
        .route("/{id}", get(get_history_entry))
        .route("/{id}/restore", post(restore_history_entry))
        .route("/{id}/export", get(export_history_entry))
}
