//! HTTP implementation of [`AgentTransport`] using [`reqwest`].

use async_trait::async_trait;
use serde::Serialize;

use crate::envelope::AgentEnvelope;
use crate::transport::{AgentTransport, TransportError};

/// Path appended to the base URL for agent calls.
const AGENT_PATH: &str = "/api/agent";

/// Request body posted to the agent service.
#[derive(Debug, Serialize)]
struct AgentCall<'a> {
    message: &'a str,
    agent_id: &'a str,
}

/// HTTP client for the agent service.
pub struct HttpAgentTransport {
    client: reqwest::Client,
    api_url: String,
}

impl HttpAgentTransport {
    /// Create a transport for a service base URL, e.g. `http://host:8000`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Create a transport reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { client, api_url }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{AGENT_PATH}", self.api_url)
    }

    /// Ensure the response has a success status code, returning a
    /// [`TransportError::Api`] with the body text otherwise.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(status = status.as_u16(), body = %body, "Agent service rejected the call");
            return Err(TransportError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl AgentTransport for HttpAgentTransport {
    async fn send(&self, message: &str, agent_id: &str) -> Result<AgentEnvelope, TransportError> {
        tracing::debug!(agent_id, endpoint = %self.endpoint(), "Calling agent service");

        let response = self
            .client
            .post(self.endpoint())
            .json(&AgentCall { message, agent_id })
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Ok(AgentEnvelope::new(response.json::<serde_json::Value>().await?))
    }
}
