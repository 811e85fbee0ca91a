//! Raw response envelope returned by the agent service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fallback failure reason when the service gives none.
pub const GENERIC_FAILURE: &str = "Failed to generate content. Please try again.";

/// The untrusted JSON returned by the agent service.
///
/// Nominally `{ success, response: { result, message }, error,
/// module_outputs }`, but any shape is accepted; accessors never fail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentEnvelope(Value);

impl AgentEnvelope {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    /// `true` only when the envelope says `"success": true`.
    pub fn is_success(&self) -> bool {
        self.0.get("success").and_then(Value::as_bool) == Some(true)
    }

    /// Failure reason reported by the service: `error`, then
    /// `response.message`, skipping blanks.
    pub fn error_message(&self) -> Option<&str> {
        let error = self.0.get("error").and_then(Value::as_str);
        let message = self
            .0
            .get("response")
            .and_then(|response| response.get("message"))
            .and_then(Value::as_str);
        [error, message]
            .into_iter()
            .flatten()
            .find(|text| !text.trim().is_empty())
    }

    /// [`error_message`](Self::error_message) or [`GENERIC_FAILURE`].
    pub fn failure_reason(&self) -> String {
        self.error_message().unwrap_or(GENERIC_FAILURE).to_string()
    }
}

impl From<Value> for AgentEnvelope {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
