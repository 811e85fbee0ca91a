//! Client side of the generative-agent service.
//!
//! The orchestrator only sees the [`AgentTransport`] trait: one async
//! call that sends a brief to an agent and returns the raw, untrusted
//! [`AgentEnvelope`]. [`HttpAgentTransport`] is the production
//! implementation over HTTP.

pub mod envelope;
pub mod http;
pub mod transport;

pub use envelope::AgentEnvelope;
pub use http::HttpAgentTransport;
pub use transport::{AgentTransport, TransportError};
