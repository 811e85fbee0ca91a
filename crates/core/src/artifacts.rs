//! Artifact extraction: generated-file references from an agent envelope.
//!
//! The agent may report generated files at several depths, or only
//! mention an image URL inline in prose. [`extract`] scans every known
//! location in a fixed priority order and deduplicates by URL, keeping
//! the first occurrence.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::parsed_result;

/// Format tag given to URLs found in free text.
pub const INLINE_IMAGE_FORMAT: &str = "image";

/// Path extensions treated as images when scanning free text.
const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "svg"];

/// A whole bare http(s) URL token.
static URL_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s"'<>()\[\]{}]+"#).expect("valid regex")
});

/// A generated asset reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactFile {
    /// Identity key.
    pub file_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// MIME type or a generic tag such as `"image"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_type: Option<String>,
}

impl ArtifactFile {
    pub fn new(file_url: impl Into<String>) -> Self {
        Self {
            file_url: file_url.into(),
            name: None,
            format_type: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_format(mut self, format_type: impl Into<String>) -> Self {
        self.format_type = Some(format_type.into());
        self
    }

    /// Name to show for the file: explicit name, else the last path segment.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| last_path_segment(&self.file_url))
    }

    /// Build from one JSON list entry. Entries without a non-empty string
    /// URL yield `None`.
    fn from_entry(entry: &Value) -> Option<Self> {
        let url = entry
            .get("file_url")
            .or_else(|| entry.get("url"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|url| !url.is_empty())?;

        let text = |key: &str| {
            entry
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Some(Self {
            file_url: url.to_string(),
            name: text("name"),
            format_type: text("format_type"),
        })
    }

    fn from_inline_url(url: &str) -> Self {
        Self::new(url)
            .with_name(last_path_segment(url))
            .with_format(INLINE_IMAGE_FORMAT)
    }
}

/// Collect artifacts from every known location of an envelope.
///
/// Order: top-level list, list inside `response`, list inside the parsed
/// `response.result` object (and inside its nested `result` object when
/// wrapped), then image URLs in `response.result` /
/// `response.message` text. Never fails; an envelope with no artifacts
/// (or no envelope at all) yields an empty list.
pub fn extract(envelope: Option<&Value>) -> Vec<ArtifactFile> {
    let Some(envelope) = envelope else {
        return Vec::new();
    };

    let mut candidates = Vec::new();

    // a. top level
    candidates.extend(listed_artifacts(envelope));

    // b. inside `response`
    let response = envelope.get("response");
    if let Some(response) = response {
        candidates.extend(listed_artifacts(response));
    }

    // c. inside the parsed result object, then inside its `result` wrapper
    if let Ok(result) = parsed_result(envelope) {
        if result.is_object() {
            candidates.extend(listed_artifacts(&result));
        }
        if let Some(inner) = result.get("result").filter(|inner| inner.is_object()) {
            candidates.extend(listed_artifacts(inner));
        }
    }

    // d. bare image URLs in free text
    if let Some(response) = response {
        for key in ["result", "message"] {
            if let Some(text) = response.get(key).and_then(Value::as_str) {
                candidates.extend(
                    inline_image_urls(text)
                        .into_iter()
                        .map(|url| ArtifactFile::from_inline_url(&url)),
                );
            }
        }
    }

    dedup_by_url(candidates)
}

/// Image URLs mentioned in free text, in order of appearance.
///
/// Each URL is kept whole, query and fragment included, when its path
/// ends in an image extension. Trailing sentence punctuation is dropped.
pub fn inline_image_urls(text: &str) -> Vec<String> {
    URL_TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?']))
        .filter(|url| has_image_path(url))
        .map(str::to_string)
        .collect()
}

/// Whether the URL path (not the host) ends in an image extension.
fn has_image_path(url: &str) -> bool {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let rest = rest.split(['?', '#']).next().unwrap_or(rest);
    let Some((_, path)) = rest.split_once('/') else {
        return false;
    };
    path.rsplit_once('.').is_some_and(|(_, ext)| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known))
    })
}

/// Artifact list at `module_outputs.artifact_files` or `artifact_files`.
fn listed_artifacts(node: &Value) -> Vec<ArtifactFile> {
    let lists = [
        node.get("module_outputs")
            .and_then(|outputs| outputs.get("artifact_files")),
        node.get("artifact_files"),
    ];

    lists
        .into_iter()
        .flatten()
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(ArtifactFile::from_entry)
        .collect()
}

fn dedup_by_url(candidates: Vec<ArtifactFile>) -> Vec<ArtifactFile> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|artifact| seen.insert(artifact.file_url.clone()))
        .collect()
}

fn last_path_segment(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(path)
        .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
