//! Demo brief and package shown before the first real generation.

use crate::artifacts::ArtifactFile;
use crate::document::{GraphicsSpec, MarketingDocument, SeoAnalysis, WrittenContent};
use crate::request::{ContentType, GenerationRequest, Tone};

const SAMPLE_TOPIC: &str = "The Future of AI in Digital Marketing";

const SAMPLE_BODY: &str = "# How AI Is Reshaping Digital Marketing in 2025\n\n\
Artificial intelligence has moved from a futuristic concept to an everyday reality in digital marketing. \
According to recent studies, **73% of marketing leaders** now use AI-powered tools in their daily workflows.\n\n\
## The Rise of Predictive Analytics\n\n\
Predictive analytics powered by machine learning is helping marketers anticipate customer behavior with remarkable accuracy. \
By analyzing historical data patterns, AI models can:\n\n\
- Forecast campaign performance before launch\n\
- Identify high-value customer segments automatically\n\
- Optimize ad spend allocation in real-time\n\
- Predict churn risk and trigger retention campaigns\n\n\
## Content Personalization at Scale\n\n\
Gone are the days of one-size-fits-all messaging. AI enables **hyper-personalization** across every touchpoint:\n\n\
1. Dynamic email subject lines tailored to individual preferences\n\
2. Website content that adapts to visitor behavior patterns\n\
3. Product recommendations based on collaborative filtering\n\
4. Automated A/B testing with statistical significance tracking\n\n\
## Key Takeaways\n\n\
The integration of AI into digital marketing is no longer optional. Companies that embrace these technologies now \
will gain a significant competitive advantage in customer acquisition, retention, and lifetime value optimization.";

/// The demo brief.
pub fn sample_request() -> GenerationRequest {
    GenerationRequest::new(SAMPLE_TOPIC)
        .with_content_type(ContentType::BlogPost)
        .with_tone(Tone::Professional)
        .with_audience(
            "Marketing managers and CMOs at mid-size SaaS companies looking to leverage AI tools \
             for campaign optimization and content personalization.",
        )
        .with_keywords([
            "AI marketing",
            "digital transformation",
            "marketing automation",
            "personalization",
        ])
        .with_word_count(1200)
        .with_brand_notes(
            "Use a forward-thinking, data-driven tone. Avoid jargon. Reference industry statistics where possible.",
        )
}

/// The demo package matching [`sample_request`].
pub fn sample_document() -> MarketingDocument {
    MarketingDocument {
        project_title: Some(SAMPLE_TOPIC.to_string()),
        content_brief_summary: Some(
            "A comprehensive blog post exploring how AI is transforming digital marketing for SaaS \
             companies, targeting marketing managers and CMOs."
                .to_string(),
        ),
        written_content: Some(WrittenContent {
            title: Some("How AI Is Reshaping Digital Marketing in 2025".to_string()),
            content: Some(SAMPLE_BODY.to_string()),
            meta_description: Some(
                "Discover how AI is transforming digital marketing in 2025. Learn about predictive \
                 analytics, content personalization, and next-gen marketing automation strategies \
                 for SaaS companies."
                    .to_string(),
            ),
            word_count: Some(1187.0),
            content_type: Some(ContentType::BlogPost.as_str().to_string()),
            summary: Some(
                "A data-driven exploration of AI applications in digital marketing, covering \
                 predictive analytics, personalization at scale, and next-generation automation tools."
                    .to_string(),
            ),
        }),
        seo_analysis: Some(SeoAnalysis {
            seo_score: Some(82.0),
            keyword_analysis: Some(
                "Primary keyword \"AI marketing\" appears 4 times with natural placement. Keyword \
                 density is optimal at 1.8%."
                    .to_string(),
            ),
            readability_score: Some(
                "Grade Level: 10.2 (Professional audience appropriate). Flesch Reading Ease: 54.3."
                    .to_string(),
            ),
            heading_structure: Some(
                "H1: 1 (correct), H2: 4 (good hierarchy), H3: 0. Consider adding H3 subheadings."
                    .to_string(),
            ),
            meta_description_quality: Some(
                "Meta description is 158 characters (ideal range 150-160) and contains the primary keyword."
                    .to_string(),
            ),
            recommendations: Some(
                "Add internal links to related content, Include more specific statistics and data points, \
                 Add schema markup for article type, Optimize image alt text for target keywords, \
                 Consider adding a FAQ section for featured snippet potential"
                    .to_string(),
            ),
            content_length_assessment: Some(
                "Content length of 1187 words is appropriate for a blog post targeting competitive keywords."
                    .to_string(),
            ),
            improvement_summary: Some(
                "Strong foundation with good keyword placement and readability. Add internal links and an FAQ section."
                    .to_string(),
            ),
        }),
        graphics: Some(GraphicsSpec {
            image_description: Some(
                "A futuristic digital illustration showing interconnected marketing channels with AI \
                 neural network patterns over a deep indigo to teal gradient."
                    .to_string(),
            ),
            image_type: Some("Blog Header".to_string()),
            design_notes: Some(
                "Clean, modern design using the brand color palette. High contrast text overlay area \
                 on the left third for title placement."
                    .to_string(),
            ),
            suggested_alt_text: Some(
                "AI-powered digital marketing channels interconnected through neural network visualization"
                    .to_string(),
            ),
            dimensions: Some("1200x630".to_string()),
        }),
        status: Some("Complete - All deliverables generated successfully".to_string()),
    }
}

pub fn sample_artifacts() -> Vec<ArtifactFile> {
    vec![ArtifactFile::new(
        "https://placehold.co/1200x630/4f46e5/ffffff?text=AI+Marketing+Blog+Header",
    )
    .with_name("blog-header.png")
    .with_format("image/png")]
}
