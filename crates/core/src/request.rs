//! Content brief submitted to the marketing coordinator agent.
//!
//! A [`GenerationRequest`] is built by the caller, validated, and then
//! handed to the orchestrator which owns it for the rest of the attempt.
//! [`GenerationRequest::compose_brief`] renders the outbound message.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Smallest target word count accepted for a brief.
pub const MIN_WORD_COUNT: u32 = 300;
/// Largest target word count accepted for a brief.
pub const MAX_WORD_COUNT: u32 = 2000;
/// Word count used when the caller does not pick one.
pub const DEFAULT_WORD_COUNT: u32 = 800;

/// Substituted for an empty target audience in the outbound message.
pub const DEFAULT_AUDIENCE: &str = "General audience";
/// Substituted for empty keyword lists and brand notes.
pub const NONE_SPECIFIED: &str = "None specified";

const BRIEF_CLOSING: &str = "Please create a complete marketing content package including written content, SEO analysis, and graphics.";

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Kind of marketing asset requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContentType {
    #[default]
    #[serde(rename = "Blog Post", alias = "BlogPost")]
    BlogPost,
    #[serde(rename = "Social Media", alias = "SocialMedia")]
    SocialMedia,
    #[serde(rename = "Ad Copy", alias = "AdCopy")]
    AdCopy,
    #[serde(rename = "Email")]
    Email,
}

impl ContentType {
    /// Human-readable label used in the brief and in exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::BlogPost => "Blog Post",
            ContentType::SocialMedia => "Social Media",
            ContentType::AdCopy => "Ad Copy",
            ContentType::Email => "Email",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Voice the copy should be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Persuasive,
    Informative,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Casual => "Casual",
            Tone::Persuasive => "Persuasive",
            Tone::Informative => "Informative",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// GenerationRequest
// ---------------------------------------------------------------------------

/// Input brief for one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GenerationRequest {
    #[validate(custom(function = "validate_topic"))]
    pub topic: String,

    #[serde(default)]
    pub content_type: ContentType,

    #[serde(default)]
    pub tone: Tone,

    /// May be empty; the brief then names [`DEFAULT_AUDIENCE`].
    #[serde(default)]
    pub target_audience: String,

    /// Ordered, distinct, trimmed keywords.
    #[serde(default, deserialize_with = "deserialize_keywords")]
    keywords: Vec<String>,

    #[validate(range(min = 300, max = 2000, message = "word_count must be between 300 and 2000"))]
    #[serde(default = "default_word_count")]
    pub word_count: u32,

    #[serde(default)]
    pub brand_notes: Option<String>,
}

impl GenerationRequest {
    /// Create a brief with the console defaults for every field but the topic.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            content_type: ContentType::default(),
            tone: Tone::default(),
            target_audience: String::new(),
            keywords: Vec::new(),
            word_count: DEFAULT_WORD_COUNT,
            brand_notes: None,
        }
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.target_audience = audience.into();
        self
    }

    pub fn with_word_count(mut self, word_count: u32) -> Self {
        self.word_count = word_count;
        self
    }

    pub fn with_brand_notes(mut self, notes: impl Into<String>) -> Self {
        self.brand_notes = Some(notes.into());
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for keyword in keywords {
            self.add_keyword(keyword.as_ref());
        }
        self
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Add a keyword, trimming it. Blank and already-present keywords are
    /// ignored. Returns `true` when the keyword was added.
    pub fn add_keyword(&mut self, keyword: &str) -> bool {
        push_distinct(&mut self.keywords, keyword)
    }

    /// Remove a keyword by exact match. Returns `true` when one was removed.
    pub fn remove_keyword(&mut self, keyword: &str) -> bool {
        let before = self.keywords.len();
        self.keywords.retain(|k| k != keyword);
        self.keywords.len() != before
    }

    /// Validate the brief before dispatch.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|errors| CoreError::Validation(describe_errors(&errors)))
    }

    /// Render the outbound message sent to the coordinator agent.
    ///
    /// The output depends only on the request fields.
    pub fn compose_brief(&self) -> String {
        let audience = if self.target_audience.trim().is_empty() {
            DEFAULT_AUDIENCE
        } else {
            self.target_audience.as_str()
        };
        let keywords = if self.keywords.is_empty() {
            NONE_SPECIFIED.to_string()
        } else {
            self.keywords.join(", ")
        };
        let brand_notes = match self.brand_notes.as_deref() {
            Some(notes) if !notes.trim().is_empty() => notes,
            _ => NONE_SPECIFIED,
        };

        format!(
            "Content Brief:\n\
             - Topic: {topic}\n\
             - Content Type: {content_type}\n\
             - Tone: {tone}\n\
             - Target Audience: {audience}\n\
             - Primary Keywords: {keywords}\n\
             - Word Count: {word_count}\n\
             - Brand Voice Notes: {brand_notes}\n\
             \n\
             {BRIEF_CLOSING}",
            topic = self.topic,
            content_type = self.content_type,
            tone = self.tone,
            word_count = self.word_count,
        )
    }
}

fn default_word_count() -> u32 {
    DEFAULT_WORD_COUNT
}

fn validate_topic(topic: &str) -> Result<(), ValidationError> {
    if topic.trim().is_empty() {
        let mut err = ValidationError::new("blank_topic");
        err.message = Some("Please enter a content topic before generating.".into());
        return Err(err);
    }
    Ok(())
}

/// Flatten validator output into one message, field errors sorted by name.
fn describe_errors(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{field} is invalid ({})", e.code),
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn deserialize_keywords<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    let mut keywords = Vec::with_capacity(raw.len());
    for keyword in &raw {
        push_distinct(&mut keywords, keyword);
    }
    Ok(keywords)
}

fn push_distinct(keywords: &mut Vec<String>, keyword: &str) -> bool {
    let keyword = keyword.trim();
    if keyword.is_empty() || keywords.iter().any(|k| k == keyword) {
        return false;
    }
    keywords.push(keyword.to_string());
    true
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
