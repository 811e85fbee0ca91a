pub mod agents;
pub mod generation;
pub mod health;
pub mod history;
pub mod sample;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /generation                  start (POST), current snapshot (GET)
/// /generation/export           text export of the current result
/// /generation/events           lifecycle events (SSE)
///
/// /history                     summaries, most recent first
/// /history/{id}                full entry
/// /history/{id}/restore        load entry into view (POST)
/// /history/{id}/export         text export of an entry
///
/// /agents                      roster, target agent, stage labels
/// /sample                      demo brief and package
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/generation", generation::router())
        .nest("/history", history::router())
        .merge(agents::router())
        .merge(sample::router())
}
