//! The transport seam between the orchestrator and the agent service.

use async_trait::async_trait;

use crate::envelope::AgentEnvelope;

/// Errors from reaching the agent service.
///
/// The `Display` text is shown to users as the failure reason, so each
/// variant reads as a complete sentence fragment.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP request itself failed (network, DNS, TLS, body decode).
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status. The body is kept for
    /// logs and never rendered.
    #[error("Agent service returned HTTP {status}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Any other failure reported by a transport implementation.
    #[error("{0}")]
    Other(String),
}

/// Sends a message to an agent and returns its raw response.
///
/// Implementations make exactly one attempt; retries are the caller's
/// decision.
#[async_trait]
pub trait AgentTransport: Send + Sync {
    async fn send(&self, message: &str, agent_id: &str) -> Result<AgentEnvelope, TransportError>;
}
