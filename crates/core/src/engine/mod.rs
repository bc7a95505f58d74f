//! The built-in extraction engine.
//!
//! Metadata, charset and the next-page link are read from the page as served;
//! the content block is chosen on a cleaned copy by paragraph scoring and then
//! serialized with absolute (or hook-rewritten) links.

pub mod clean;
pub mod document;
pub mod meta;
pub mod pagination;
pub mod scoring;
pub mod serialize;

pub use clean::{CleanConfig, clean_html};
pub use document::{Document, Element};
pub use meta::{MetaTags, extract_title};
pub use pagination::find_next_page;
pub use scoring::{ScoreConfig, TopCandidate, top_candidate};
pub use serialize::{IMAGE_PLACEHOLDER, serialize_content, wrap_document};

use crate::transcode::{ExtractionResult, ImageElement, Transcoder, TranscodingInput};
use crate::{FolioError, Result};

/// Tuning for [`ReadabilityTranscoder`].
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub score: ScoreConfig,
    pub clean: CleanConfig,
}

/// Readability-style [`Transcoder`].
///
/// ```rust
/// use folio_core::engine::ReadabilityTranscoder;
/// use folio_core::{SerializationOptions, Transcoder, TranscodingInput};
/// use url::Url;
///
/// let html = r#"<html><head><title>Post</title></head><body><article class="post">
///     <p>First paragraph of the story, long enough to count, with commas, too.</p>
///     <p>Second paragraph of the story, also long enough, with more commas, here.</p>
/// </article></body></html>"#;
/// let url = Url::parse("https://example.com/post").unwrap();
/// let input = TranscodingInput {
///     html,
///     url: &url,
///     options: SerializationOptions { body_only: true, include_headline: false, pretty_print: false, image_placeholders: false },
///     anchor_rewriter: None,
/// };
///
/// let result = ReadabilityTranscoder::default().transcode(&input).unwrap();
/// assert_eq!(result.title.as_deref(), Some("Post"));
/// assert!(result.content.contains("Second paragraph"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReadabilityTranscoder {
    config: EngineConfig,
}

impl ReadabilityTranscoder {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl Transcoder for ReadabilityTranscoder {
    fn transcode(&self, input: &TranscodingInput<'_>) -> Result<ExtractionResult> {
        let page = Document::parse(input.html);
        let meta = MetaTags::new(&page);
        let title = extract_title(&page, &meta);

        let cleaned = Document::parse(&clean_html(input.html, &self.config.clean));
        let top = top_candidate(&cleaned, &self.config.score);
        let (container, content_extracted) = match top {
            Some(top) if top.score >= self.config.score.min_score => {
                tracing::debug!(url = %input.url, tag = %top.element.tag_name(), score = top.score, "content candidate");
                (Some(top.element), true)
            }
            _ => {
                tracing::debug!(url = %input.url, "no content candidate, using body");
                (cleaned.body(), false)
            }
        };

        let (markup, images) = match container {
            Some(element) if content_extracted => (element.outer_html(), collect_images(&element, input)),
            Some(element) => (element.inner_html(), collect_images(&element, input)),
            None => (String::new(), Vec::new()),
        };

        let content = serialize_content(&markup, title.as_deref(), input.url, &input.options, input.anchor_rewriter)
            .map_err(|e| FolioError::Extraction(e.to_string()))?;

        let title_extracted = title.is_some();
        Ok(ExtractionResult {
            title,
            content,
            description: meta.description(),
            images,
            front_image: meta.image(input.url),
            favicon: meta.favicon(input.url),
            next_page_url: find_next_page(&page, input.url),
            charset: meta.charset(),
            content_extracted,
            title_extracted,
        })
    }
}

/// `<img>` elements under `container`, `src` resolved against the page URL.
fn collect_images(container: &Element<'_>, input: &TranscodingInput<'_>) -> Vec<ImageElement> {
    container
        .select("img")
        .unwrap_or_default()
        .iter()
        .map(|img| ImageElement {
            src: img.attr("src").map(|src| match input.url.join(src.trim()) {
                Ok(absolute) => absolute.to_string(),
                Err(_) => src.to_string(),
            }),
            title: img.attr("title").map(str::to_string),
            alt: img.attr("alt").map(str::to_string),
        })
        .collect()
}
