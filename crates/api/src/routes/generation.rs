//! Routes for the current generation.
//!
//! ```text
//! POST   /              start_generation
//! GET    /              get_generation
//! GET    /export        export_generation
//! GET    /events        generation_events (SSE)
//! ```

use std::convert::Infallible;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use futures::stream::{self, Stream};
use hub_core::export::{export_filename, render_package};
use hub_core::request::GenerationRequest;
use hub_core::types::AttemptId;
use hub_events::HubEvent;
use hub_pipeline::GenerationSnapshot;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, TextDownload};
use crate::state::AppState;

/// Body of a `202 Accepted` start response.
#[derive(Debug, Serialize)]
pub struct StartGenerationResponse {
    pub attempt: AttemptId,
}

/// POST /api/v1/generation
///
/// Accepts the brief and returns immediately; progress and the outcome are
/// observed through `GET /generation` or the event stream.
async fn start_generation(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> AppResult<impl IntoResponse> {
    let handle = state.orchestrator.start(request)?;
    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: StartGenerationResponse {
                attempt: handle.attempt(),
            },
        }),
    ))
}

/// GET /api/v1/generation
async fn get_generation(State(state): State<AppState>) -> Json<DataResponse<GenerationSnapshot>> {
    Json(DataResponse {
        data: state.orchestrator.snapshot(),
    })
}

/// GET /api/v1/generation/export
async fn export_generation(State(state): State<AppState>) -> AppResult<TextDownload> {
    let result = state
        .orchestrator
        .snapshot()
        .result
        .ok_or_else(|| AppError::NotFound("No generated content to export".to_string()))?;
    Ok(TextDownload {
        filename: export_filename(&result.document),
        body: render_package(&result.document, &result.artifacts),
    })
}

/// GET /api/v1/generation/events
async fn generation_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::debug!("Event stream subscriber connected");
    Sse::new(event_stream(state.event_bus.subscribe())).keep_alive(KeepAlive::default())
}

/// Turn a bus subscription into SSE frames. Lagged receivers skip ahead;
/// the stream ends when the bus is dropped.
fn event_stream(rx: Receiver<HubEvent>) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => match Event::default().event(event.event_type()).json_data(&event) {
                    Ok(frame) => return Some((Ok(frame), rx)),
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to encode event for SSE");
                    }
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "SSE subscriber lagged, events dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_generation).post(start_generation))
        .route("/export", get(export_generation))
        .route("/events", get(generation_events))
}
