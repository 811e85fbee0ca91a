//! Plain-text export of a marketing package.

use std::fmt::Write;

use crate::artifacts::ArtifactFile;
use crate::document::{GraphicsSpec, MarketingDocument, SeoAnalysis, WrittenContent};

/// Filename stem used when the document has no project title.
pub const DEFAULT_EXPORT_STEM: &str = "marketing-content";

/// Render a document and its artifacts as a downloadable text file.
///
/// Unknown fields render as empty strings (or `0` for numbers).
pub fn render_package(document: &MarketingDocument, artifacts: &[ArtifactFile]) -> String {
    let written = document.written();
    let seo = document.seo();
    let gfx = document.graphics_spec();

    let mut out = String::new();
    // Writing to a String never fails.
    let _ = write_sections(&mut out, document, &written, &seo, &gfx, artifacts);
    out
}

fn write_sections(
    out: &mut String,
    document: &MarketingDocument,
    written: &WrittenContent,
    seo: &SeoAnalysis,
    gfx: &GraphicsSpec,
    artifacts: &[ArtifactFile],
) -> std::fmt::Result {
    writeln!(out, "MARKETING CONTENT PACKAGE")?;
    writeln!(out, "========================")?;
    writeln!(out)?;
    writeln!(out, "Project: {}", document.project_title())?;
    writeln!(out, "Brief: {}", document.content_brief_summary())?;
    writeln!(out, "Status: {}", document.status())?;
    writeln!(out)?;

    writeln!(out, "--- WRITTEN CONTENT ---")?;
    writeln!(out)?;
    writeln!(out, "Title: {}", written.title())?;
    writeln!(out, "Type: {}", written.content_type())?;
    writeln!(out, "Word Count: {}", written.word_count())?;
    writeln!(out, "Meta Description: {}", written.meta_description())?;
    writeln!(out, "Summary: {}", written.summary())?;
    writeln!(out)?;
    writeln!(out, "{}", written.content())?;
    writeln!(out)?;

    writeln!(out, "--- SEO ANALYSIS ---")?;
    writeln!(out)?;
    writeln!(out, "SEO Score: {}/100", seo.score())?;
    writeln!(out, "Keyword Analysis: {}", seo.keyword_analysis())?;
    writeln!(out, "Readability: {}", seo.readability_score())?;
    writeln!(out, "Heading Structure: {}", seo.heading_structure())?;
    writeln!(out, "Meta Quality: {}", seo.meta_description_quality())?;
    writeln!(out, "Content Length: {}", seo.content_length_assessment())?;
    writeln!(out, "Recommendations: {}", seo.recommendations())?;
    writeln!(out, "Improvement Summary: {}", seo.improvement_summary())?;
    writeln!(out)?;

    writeln!(out, "--- GRAPHICS ---")?;
    writeln!(out)?;
    writeln!(out, "Description: {}", gfx.image_description())?;
    writeln!(out, "Type: {}", gfx.image_type())?;
    writeln!(out, "Design Notes: {}", gfx.design_notes())?;
    writeln!(out, "Alt Text: {}", gfx.suggested_alt_text())?;
    writeln!(out, "Dimensions: {}", gfx.dimensions())?;

    if !artifacts.is_empty() {
        writeln!(out)?;
        writeln!(out, "Image URLs:")?;
        for (i, artifact) in artifacts.iter().enumerate() {
            writeln!(out, "  {}. {}", i + 1, artifact.file_url)?;
        }
    }
    Ok(())
}

/// Download filename: project title slugged on whitespace, lowercased.
pub fn export_filename(document: &MarketingDocument) -> String {
    let title = document
        .project_title
        .as_deref()
        .unwrap_or(DEFAULT_EXPORT_STEM);
    let stem = title.split_whitespace().collect::<Vec<_>>().join("-");
    let stem = if stem.is_empty() {
        DEFAULT_EXPORT_STEM.to_string()
    } else {
        stem.to_lowercase()
    };
    format!("{stem}.txt")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn renders_every_section() {
        let doc: MarketingDocument = serde_json::from_value(json!({
            "project_title": "Launch",
            "written_content": { "title": "Hello", "word_count": 512, "content": "# Body" },
            "seo_analysis": { "seo_score": 71, "recommendations": "a, b" },
            "graphics": { "dimensions": "1080x1080" },
            "status": "Complete"
        }))
        .unwrap();
        let artifacts = [
            ArtifactFile::new("https://x/one.png"),
            ArtifactFile::new("https://x/two.png"),
        ];

        let text = render_package(&doc, &artifacts);
        assert!(text.starts_with("MARKETING CONTENT PACKAGE\n========================\n\nProject: Launch\n"));
        assert!(text.contains("--- WRITTEN CONTENT ---\n\nTitle: Hello\n"));
        assert!(text.contains("Word Count: 512\n"));
        assert!(text.contains("\n# Body\n"));
        assert!(text.contains("SEO Score: 71/100\n"));
        assert!(text.contains("Recommendations: a, b\n"));
        assert!(text.contains("--- GRAPHICS ---\n\n"));
        assert!(text.contains("Dimensions: 1080x1080\n"));
        assert!(text.ends_with("Image URLs:\n  1. https://x/one.png\n  2. https://x/two.png\n"));
    }

    #[test]
    fn empty_document_renders_blanks() {
        let text = render_package(&MarketingDocument::default(), &[]);
        assert!(text.contains("Project: \n"));
        assert!(text.contains("Word Count: 0\n"));
        assert!(text.contains("SEO Score: 0/100\n"));
        assert!(!text.contains("Image URLs"));
    }

    #[test]
    fn filename_is_slugged() {
        let doc = MarketingDocument {
            project_title: Some("The Future  of AI".to_string()),
            ..Default::default()
        };
        assert_eq!(export_filename(&doc), "the-future-of-ai.txt");
        assert_eq!(export_filename(&MarketingDocument::default()), "marketing-content.txt");
    }
}
