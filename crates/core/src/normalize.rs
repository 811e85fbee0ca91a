//! Response normalization: raw agent envelope to [`MarketingDocument`].
//!
//! The envelope is nominally `{ success, response: { result, message }, error }`
//! but nothing about it is trusted. The payload at `response.result` may
//! be an object, a JSON string, a JSON object buried in prose, or wrapped
//! in one extra `{ "result": {...} }` layer. Recovery is as charitable as
//! possible; there is no schema validation beyond "is an object".

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::document::MarketingDocument;

/// Greedy span from the first `{` to the last `}`, across newlines.
static OBJECT_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

/// Why an envelope could not be turned into a document.
///
/// Callers should log the variant but never show it (or the payload) to
/// end users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NormalizationFailure {
    #[error("response envelope is empty")]
    EmptyEnvelope,

    #[error("response payload is not parseable JSON")]
    UnparsablePayload,

    #[error("response payload is not a JSON object")]
    NotAnObject,
}

/// Turn an agent envelope into a document.
pub fn normalize(envelope: Option<&Value>) -> Result<MarketingDocument, NormalizationFailure> {
    let envelope = match envelope {
        None | Some(Value::Null) => return Err(NormalizationFailure::EmptyEnvelope),
        Some(envelope) => envelope,
    };

    match payload_object(envelope)? {
        Some(object) => Ok(MarketingDocument::from_object(object)),
        None => Err(NormalizationFailure::NotAnObject),
    }
}

/// Resolve `response.result` to a JSON object.
///
/// Returns `Ok(None)` when the payload resolves to something other than
/// an object, and `Err(UnparsablePayload)` when textual payloads cannot be
/// parsed at all.
pub(crate) fn payload_object(
    envelope: &Value,
) -> Result<Option<Map<String, Value>>, NormalizationFailure> {
    Ok(match unwrap_result_layer(parsed_result(envelope)?) {
        Value::Object(object) => Some(object),
        _ => None,
    })
}

/// `response.result` with textual payloads parsed, before any unwrapping.
pub(crate) fn parsed_result(envelope: &Value) -> Result<Value, NormalizationFailure> {
    let candidate = envelope
        .get("response")
        .and_then(|response| response.get("result"))
        .cloned()
        .unwrap_or(Value::Null);

    match candidate {
        Value::String(text) => {
            parse_payload_text(&text).ok_or(NormalizationFailure::UnparsablePayload)
        }
        other => Ok(other),
    }
}

/// Parse text as JSON, falling back to the greedy `{...}` span inside it.
pub(crate) fn parse_payload_text(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Some(value);
    }
    let span = OBJECT_SPAN_RE.find(text)?;
    tracing::debug!(
        prose_len = text.len() - span.len(),
        "Recovering embedded object from payload text"
    );
    serde_json::from_str::<Value>(span.as_str()).ok()
}

/// Unwrap `{ "result": {...} }` exactly once.
fn unwrap_result_layer(candidate: Value) -> Value {
    match candidate {
        Value::Object(mut object) if object.get("result").is_some_and(Value::is_object) => {
            object.remove("result").unwrap_or(Value::Null)
        }
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
