//! Domain core for the marketing content hub.
//!
//! Everything in this crate is synchronous and free of I/O: the brief
//! model, the document model, the response normalizer and artifact
//! extractor, the history store, and the plain-text export renderer.

pub mod agents;
pub mod artifacts;
pub mod document;
pub mod error;
pub mod export;
pub mod history;
pub mod normalize;
pub mod request;
pub mod sample;
pub mod types;
