//! Shared response envelope types for API handlers.
//!
//! JSON responses use a `{ "data": ... }` envelope. Plain-text exports are
//! the exception.

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// A `text/plain` download with a suggested filename.
#[derive(Debug)]
pub struct TextDownload {
    pub filename: String,
    pub body: String,
}

impl IntoResponse for TextDownload {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename=\"{}\"", self.filename.replace('"', ""));
        (
            [
                (CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (CONTENT_DISPOSITION, disposition),
            ],
            self.body,
        )
            .into_response()
    }
}
