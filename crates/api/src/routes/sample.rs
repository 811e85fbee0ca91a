use axum::{routing::get, Json, Router};
use hub_core::artifacts::ArtifactFile;
use hub_core::document::MarketingDocument;
use hub_core::request::GenerationRequest;
use hub_core::sample::{sample_artifacts, sample_document, sample_request};
use serde::Serialize;

use crate::response::DataResponse;
use crate::state::AppState;

/// Demo brief and the package it would produce.
#[derive(Debug, Serialize)]
pub struct SamplePackage {
    pub request: GenerationRequest,
    pub document: MarketingDocument,
    pub artifacts: Vec<ArtifactFile>,
}

/// GET /api/v1/sample
async fn get_sample() -> Json<DataResponse<SamplePackage>> {
    Json(DataResponse {
        data: SamplePackage {
            request: sample_request(),
            document: sample_document(),
            artifacts: sample_artifacts(),
        },
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/sample", get(get_sample))
}
