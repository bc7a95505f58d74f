//! Boundary between fetched bytes and the extraction engine.
//!
//! A [`Transcoder`] turns decoded HTML into an [`ExtractionResult`]. The
//! adapter in this module owns everything around that call: picking the
//! charset (header first, then the one the document declares about itself),
//! decoding, and handing the engine its serialization options and the optional
//! anchor rewrite hook.

use encoding_rs::Encoding;
use url::Url;

use crate::encoding::{decode_bytes, resolve_encoding};
use crate::fetch::FetchResult;
use crate::{ReadOptions, Result};

/// Hook applied to every anchor `href` the engine serializes.
///
/// Called with the article URL and the candidate href, returns the href to
/// write. Must not keep state between calls.
pub type AnchorRewriter = dyn Fn(&str, &str) -> String + Send + Sync;

/// An `<img>` found in the extracted content, attributes as written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageElement {
    pub src: Option<String>,
    pub title: Option<String>,
    pub alt: Option<String>,
}

/// What an extraction engine reports for one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionResult {
    pub title: Option<String>,
    /// Serialized article HTML.
    pub content: String,
    pub description: Option<String>,
    /// Images inside the content, in document order.
    pub images: Vec<ImageElement>,
    pub front_image: Option<Url>,
    pub favicon: Option<Url>,
    /// Absolute URL of the next page of a paginated article.
    pub next_page_url: Option<String>,
    /// Charset the document declares in its own markup.
    pub charset: Option<String>,
    /// The engine found a content block it trusts.
    pub content_extracted: bool,
    pub title_extracted: bool,
}

/// How the engine should serialize the content it extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializationOptions {
    /// Emit only the content fragment, not a whole document.
    pub body_only: bool,
    /// Prepend the title as `<h1>`.
    pub include_headline: bool,
    pub pretty_print: bool,
    /// Replace images with `<!--IMG-->` markers.
    pub image_placeholders: bool,
}

impl From<&ReadOptions> for SerializationOptions {
    fn from(options: &ReadOptions) -> Self {
        Self {
            body_only: !options.include_headers,
            include_headline: options.include_headline,
            pretty_print: options.pretty_print,
            image_placeholders: options.replace_images_with_placeholders,
        }
    }
}

/// Everything an engine gets for one extraction call.
pub struct TranscodingInput<'a> {
    pub html: &'a str,
    pub url: &'a Url,
    pub options: SerializationOptions,
    /// When absent the engine writes absolute URLs.
    pub anchor_rewriter: Option<&'a AnchorRewriter>,
}

/// A content extraction engine.
///
/// Implementations are shared across concurrent reads; per-call state travels
/// in [`TranscodingInput`].
pub trait Transcoder: Send + Sync {
    fn transcode(&self, input: &TranscodingInput<'_>) -> Result<ExtractionResult>;
}

/// One page after charset negotiation and extraction.
#[derive(Debug, Clone)]
pub struct PageExtraction {
    pub result: ExtractionResult,
    /// Header charset if it resolved, else the document's, else none.
    pub encoding: Option<&'static Encoding>,
    /// The decoded document the final extraction ran on.
    pub raw_html: String,
}

/// Decodes and extracts one fetched page.
///
/// The first pass decodes with the header charset (UTF-8 when absent or
/// unknown). If the engine then reports a charset that resolves, the page is
/// decoded and extracted again with it when the header gave none, or when
/// `prefer_html_encoding` is set and the two names differ.
pub fn extract_page(
    transcoder: &dyn Transcoder, url: &Url, fetched: &FetchResult, options: &ReadOptions,
) -> Result<PageExtraction> {
    let serialization = SerializationOptions::from(options);
    let rewriter: Option<&AnchorRewriter> = if options.use_deep_links { Some(&reverse_deep_link) } else { None };

    let run = |encoding: Option<&'static Encoding>| -> Result<(ExtractionResult, String)> {
        let html = decode_bytes(&fetched.bytes, encoding);
        let input = TranscodingInput { html: &html, url, options: serialization, anchor_rewriter: rewriter };
        let result = transcoder.transcode(&input)?;
        Ok((result, html))
    };

    let header_encoding = resolve_encoding(fetched.charset.as_deref());
    let (mut result, mut raw_html) = run(header_encoding)?;

    let document_charset = result.charset.clone();
    let document_encoding = resolve_encoding(document_charset.as_deref());

    if let Some(encoding) = document_encoding {
        let header_disagrees = match (&fetched.charset, &document_charset) {
            (Some(header), Some(document)) => !header.eq_ignore_ascii_case(document),
            _ => true,
        };
        if fetched.charset.is_none() || (options.prefer_html_encoding && header_disagrees) {
            tracing::debug!(
                url = %url,
                header = ?fetched.charset,
                document = ?document_charset,
                "re-extracting with document charset"
            );
            (result, raw_html) = run(Some(encoding))?;
        }
    }

    Ok(PageExtraction { result, encoding: header_encoding.or(document_encoding), raw_html })
}

/// Keeps links into the article itself relative.
///
/// `href` is rewritten to `#fragment` when, without its fragment, it is the
/// article URL (itself stripped of any fragment) and the fragment is not
/// empty. Anything else passes through unchanged.
///
/// ```rust
/// use folio_core::reverse_deep_link;
///
/// let article = "https://example.com/docs/page#intro";
/// assert_eq!(reverse_deep_link(article, "https://example.com/docs/page#usage"), "#usage");
/// assert_eq!(reverse_deep_link(article, "https://example.com/other#usage"), "https://example.com/other#usage");
/// ```
pub fn reverse_deep_link(article_url: &str, href: &str) -> String {
    let article_base = article_url.split('#').next().unwrap_or(article_url);

    match href.split_once('#') {
        Some((base, fragment)) if base == article_base && !fragment.is_empty() => format!("#{fragment}"),
        _ => href.to_string(),
    }
}
