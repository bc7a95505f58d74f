//! The article a read returns, and its output formats.

use std::sync::LazyLock;

use encoding_rs::Encoding;
use regex::Regex;
use serde::{Serialize, Serializer};
use url::Url;

use crate::crawl::PageAccumulator;
use crate::engine::{Document, IMAGE_PLACEHOLDER};
use crate::{FolioError, Result};

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[\w'-]+\b").expect("valid regex"));

/// Output format options for Article content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// HTML format (extracted content).
    Html,
    /// Markdown converted from the content.
    Markdown,
    /// Plain text format.
    PlainText,
    /// JSON format (the whole article).
    Json,
}

/// An image found in the article content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleImage {
    /// Position in the merged image list, starting at "1".
    pub id: String,
    /// Absolute image URL; `None` when the source was not a valid URL.
    pub uri: Option<Url>,
    pub title: Option<String>,
    pub alternative_text: Option<String>,
}

impl ArticleImage {
    /// True when the image has an absolute http(s) URL.
    pub fn is_valid_uri(&self) -> bool {
        self.uri.as_ref().is_some_and(|uri| matches!(uri.scheme(), "http" | "https"))
    }
}

/// The result of reading one article, possibly merged from several pages.
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Readable HTML: a fragment by default, a full document when headers were
    /// requested.
    pub content: String,
    /// The engine trusted its content block and it has at least one word.
    pub content_extracted: bool,
    /// Decoded HTML of the first page as served.
    pub raw: String,
    /// Text of `content`, block elements on their own lines.
    pub plain_content: Option<String>,
    pub word_count: usize,
    pub page_count: usize,
    pub front_image: Option<Url>,
    pub favicon: Option<Url>,
    pub images: Vec<ArticleImage>,
    /// Continuation of the article when it was not followed.
    pub next_page: Option<Url>,
    /// Charset the first page was decoded with.
    #[serde(serialize_with = "serialize_encoding")]
    pub encoding: Option<&'static Encoding>,
}

impl Article {
    /// Builds the article from everything a crawl merged.
    ///
    /// Images are numbered once over the merged list, and `<!--IMG-->` markers
    /// become `<!--IMG_{id}-->` in the same order.
    pub fn assemble(acc: PageAccumulator) -> Self {
        let PageAccumulator { result, page_count, encoding, raw_html } = acc;

        let images: Vec<ArticleImage> = result
            .images
            .into_iter()
            .enumerate()
            .map(|(index, image)| ArticleImage {
                id: (index + 1).to_string(),
                uri: image.src.as_deref().and_then(|src| Url::parse(src).ok()),
                title: image.title,
                alternative_text: image.alt,
            })
            .collect();

        let content = number_placeholders(&result.content);
        let plain_content = html_to_text(&content);
        let word_count = plain_content.as_deref().map(count_words).unwrap_or(0);

        Self {
            title: result.title,
            description: result.description,
            content,
            content_extracted: result.content_extracted && word_count > 0,
            raw: raw_html,
            plain_content,
            word_count,
            page_count,
            front_image: result.front_image,
            favicon: result.favicon,
            images,
            next_page: result.next_page_url.as_deref().and_then(|next| Url::parse(next).ok()),
            encoding,
        }
    }

    /// Converts content to the specified format.
    pub fn to_format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Html => Ok(self.content.clone()),
            OutputFormat::Markdown => self.to_markdown(),
            OutputFormat::PlainText => Ok(self.to_text()),
            OutputFormat::Json => self.to_json().map(|v| v.to_string()),
        }
    }

    /// Gets content as Markdown.
    #[cfg(feature = "markdown")]
    pub fn to_markdown(&self) -> Result<String> {
        htmd::convert(&self.content).map_err(|e| FolioError::Extraction(format!("markdown conversion failed: {e}")))
    }

    /// Gets content as Markdown. Without the `markdown` feature this is the
    /// plain text.
    #[cfg(not(feature = "markdown"))]
    pub fn to_markdown(&self) -> Result<String> {
        Ok(self.to_text())
    }

    /// Gets the whole article as structured JSON.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| FolioError::Extraction(e.to_string()))
    }

    /// Gets content as plain text; empty when none could be derived.
    pub fn to_text(&self) -> String {
        self.plain_content.clone().unwrap_or_default()
    }
}

fn serialize_encoding<S: Serializer>(
    encoding: &Option<&'static Encoding>, serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match encoding {
        Some(encoding) => serializer.serialize_some(encoding.name()),
        None => serializer.serialize_none(),
    }
}

/// Numbers image markers `1..` in document order.
fn number_placeholders(content: &str) -> String {
    let mut parts = content.split(IMAGE_PLACEHOLDER);
    let mut numbered = parts.next().unwrap_or_default().to_string();
    for (index, part) in parts.enumerate() {
        numbered.push_str(&format!("<!--IMG_{}-->", index + 1));
        numbered.push_str(part);
    }
    numbered
}

/// Readable text of an HTML fragment; `None` when it has no markup to read.
fn html_to_text(html: &str) -> Option<String> {
    if html.trim().is_empty() {
        return None;
    }
    Some(Document::parse_fragment(html).text_content())
}

fn count_words(text: &str) -> usize {
    WORD.find_iter(text).count()
}
