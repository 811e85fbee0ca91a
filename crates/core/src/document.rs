//! Marketing package returned by the coordinator agent.
//!
//! The agent is a generative system, so nothing about the payload shape is
//! guaranteed. Every field is optional and decoded leniently: a value of
//! the wrong JSON type becomes `None` instead of failing the whole
//! document. Accessors return `""` / `0` for unknown values so callers
//! never have to treat absence as an error.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Lenient field decoding
// ---------------------------------------------------------------------------

/// Accept a JSON string; anything else decodes as `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Accept a JSON number or a numeric string; anything else decodes as `None`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    })
}

/// Accept a nested object; anything that does not decode becomes the default.
fn lenient_section<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Drafted copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WrittenContent {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Body text in a lightweight markdown dialect.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub word_count: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl WrittenContent {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }

    pub fn meta_description(&self) -> &str {
        self.meta_description.as_deref().unwrap_or_default()
    }

    /// Word count reported by the agent, truncated to a whole number.
    pub fn word_count(&self) -> u64 {
        self.word_count
            .filter(|n| *n > 0.0)
            .map(|n| n as u64)
            .unwrap_or(0)
    }

    pub fn content_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or_default()
    }

    pub fn summary(&self) -> &str {
        self.summary.as_deref().unwrap_or_default()
    }
}

/// SEO review of the drafted copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeoAnalysis {
    /// 0-100.
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub seo_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub keyword_analysis: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub readability_score: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub heading_structure: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub meta_description_quality: Option<String>,
    /// Comma-delimited list; see [`SeoAnalysis::recommendation_list`].
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub content_length_assessment: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub improvement_summary: Option<String>,
}

impl SeoAnalysis {
    /// Score clamped to 0-100; unknown scores read as 0.
    pub fn score(&self) -> f64 {
        self.seo_score.unwrap_or(0.0).clamp(0.0, 100.0)
    }

    pub fn rating(&self) -> SeoRating {
        SeoRating::from_score(self.score())
    }

    pub fn keyword_analysis(&self) -> &str {
        self.keyword_analysis.as_deref().unwrap_or_default()
    }

    pub fn readability_score(&self) -> &str {
        self.readability_score.as_deref().unwrap_or_default()
    }

    pub fn heading_structure(&self) -> &str {
        self.heading_structure.as_deref().unwrap_or_default()
    }

    pub fn meta_description_quality(&self) -> &str {
        self.meta_description_quality.as_deref().unwrap_or_default()
    }

    pub fn recommendations(&self) -> &str {
        self.recommendations.as_deref().unwrap_or_default()
    }

    pub fn content_length_assessment(&self) -> &str {
        self.content_length_assessment.as_deref().unwrap_or_default()
    }

    pub fn improvement_summary(&self) -> &str {
        self.improvement_summary.as_deref().unwrap_or_default()
    }

    /// Split the comma-delimited recommendations into trimmed, non-empty items.
    pub fn recommendation_list(&self) -> Vec<String> {
        self.recommendations()
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Coarse bucket for an SEO score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeoRating {
    Excellent,
    Good,
    NeedsWork,
}

impl SeoRating {
    /// `>= 80` is excellent, `>= 60` good, anything lower needs work.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            SeoRating::Excellent
        } else if score >= 60.0 {
            SeoRating::Good
        } else {
            SeoRating::NeedsWork
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeoRating::Excellent => "Excellent",
            SeoRating::Good => "Good",
            SeoRating::NeedsWork => "Needs Work",
        }
    }
}

/// Brief for the generated visual asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphicsSpec {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub image_description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub image_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub design_notes: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub suggested_alt_text: Option<String>,
    /// e.g. `"1200x630"`.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
}

impl GraphicsSpec {
    pub fn image_description(&self) -> &str {
        self.image_description.as_deref().unwrap_or_default()
    }

    pub fn image_type(&self) -> &str {
        self.image_type.as_deref().unwrap_or_default()
    }

    pub fn design_notes(&self) -> &str {
        self.design_notes.as_deref().unwrap_or_default()
    }

    pub fn suggested_alt_text(&self) -> &str {
        self.suggested_alt_text.as_deref().unwrap_or_default()
    }

    pub fn dimensions(&self) -> &str {
        self.dimensions.as_deref().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// MarketingDocument
// ---------------------------------------------------------------------------

/// The normalized marketing package.
///
/// Only [`crate::normalize::normalize`] produces one from an agent
/// response; there is no partially-valid document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketingDocument {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub project_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub content_brief_summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_section", skip_serializing_if = "Option::is_none")]
    pub written_content: Option<WrittenContent>,
    #[serde(default, deserialize_with = "lenient_section", skip_serializing_if = "Option::is_none")]
    pub seo_analysis: Option<SeoAnalysis>,
    #[serde(default, deserialize_with = "lenient_section", skip_serializing_if = "Option::is_none")]
    pub graphics: Option<GraphicsSpec>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl MarketingDocument {
    /// Decode a JSON object leniently. Never fails for object input.
    pub fn from_object(object: serde_json::Map<String, Value>) -> Self {
        serde_json::from_value(Value::Object(object)).unwrap_or_default()
    }

    pub fn project_title(&self) -> &str {
        self.project_title.as_deref().unwrap_or_default()
    }

    pub fn content_brief_summary(&self) -> &str {
        self.content_brief_summary.as_deref().unwrap_or_default()
    }

    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or_default()
    }

    /// Written section, or an all-unknown section when absent.
    pub fn written(&self) -> WrittenContent {
        self.written_content.clone().unwrap_or_default()
    }

    pub fn seo(&self) -> SeoAnalysis {
        self.seo_analysis.clone().unwrap_or_default()
    }

    pub fn graphics_spec(&self) -> GraphicsSpec {
        self.graphics.clone().unwrap_or_default()
    }

    /// Best available display title: project title, then content title.
    pub fn display_title(&self) -> Option<&str> {
        self.project_title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| {
                self.written_content
                    .as_ref()
                    .and_then(|w| w.title.as_deref())
                    .filter(|t| !t.trim().is_empty())
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_fields_read_as_unknown() {
        let doc: MarketingDocument = serde_json::from_value(json!({})).unwrap();
        assert_eq!(doc.project_title(), "");
        assert_eq!(doc.written().word_count(), 0);
        assert_eq!(doc.seo().score(), 0.0);
        assert_eq!(doc.graphics_spec().dimensions(), "");
        assert!(doc.display_title().is_none());
    }

    #[test]
    fn wrong_types_do_not_fail_the_document() {
        let doc: MarketingDocument = serde_json::from_value(json!({
            "project_title": 42,
            "written_content": "not an object",
            "seo_analysis": { "seo_score": "82", "recommendations": ["a"] },
            "graphics": { "dimensions": "1200x630", "image_type": null },
            "status": "Complete"
        }))
        .unwrap();

        assert!(doc.project_title.is_none());
        assert!(doc.written_content.is_none());
        assert_eq!(doc.seo().score(), 82.0);
        assert!(doc.seo().recommendations.is_none());
        assert_eq!(doc.graphics_spec().dimensions(), "1200x630");
        assert_eq!(doc.status(), "Complete");
    }

    #[test]
    fn recommendations_split_on_commas() {
        let seo = SeoAnalysis {
            recommendations: Some("Add links, , Use H3 tags ,FAQ".to_string()),
            ..Default::default()
        };
        assert_eq!(seo.recommendation_list(), ["Add links", "Use H3 tags", "FAQ"]);
        assert!(SeoAnalysis::default().recommendation_list().is_empty());
    }

    #[test]
    fn score_is_clamped_and_rated() {
        let seo = |score: f64| SeoAnalysis {
            seo_score: Some(score),
            ..Default::default()
        };
        assert_eq!(seo(140.0).score(), 100.0);
        assert_eq!(seo(-3.0).score(), 0.0);
        assert_eq!(seo(82.0).rating(), SeoRating::Excellent);
        assert_eq!(seo(80.0).rating(), SeoRating::Excellent);
        assert_eq!(seo(60.0).rating(), SeoRating::Good);
        assert_eq!(seo(59.9).rating(), SeoRating::NeedsWork);
        assert_eq!(SeoRating::NeedsWork.as_str(), "Needs Work");
    }

    #[test]
    fn display_title_falls_back_to_content_title() {
        let doc: MarketingDocument = serde_json::from_value(json!({
            "project_title": "  ",
            "written_content": { "title": "Inner title" }
        }))
        .unwrap();
        assert_eq!(doc.display_title(), Some("Inner title"));
    }

    #[test]
    fn serialization_omits_unknown_fields() {
        let doc = MarketingDocument {
            project_title: Some("X".to_string()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&doc).unwrap(), json!({ "project_title": "X" }));
    }
}
