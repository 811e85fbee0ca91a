//! Generation orchestration.
//!
//! [`Orchestrator`] owns the single in-flight generation: it validates
//! and dispatches a brief through an [`AgentTransport`](hub_agent::AgentTransport),
//! drives a simulated progress indicator with a [`ProgressTicker`], and on
//! completion normalizes the response, extracts artifacts and records the
//! result in the session history.

pub mod orchestrator;
pub mod phase;
pub mod snapshot;
pub mod ticker;

pub use orchestrator::{GenerationHandle, Orchestrator, OrchestratorConfig};
pub use phase::GenerationPhase;
pub use snapshot::{GenerationResult, GenerationSnapshot, ProgressSnapshot};
pub use ticker::ProgressTicker;
