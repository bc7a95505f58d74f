//! Metadata lookups in `<head>`: description, lead image, favicon, charset
//! and title.

use url::Url;

use super::document::{Document, Element};

/// `(attribute, expected value, attribute to read)` in priority order.
type Candidates = &'static [(&'static str, &'static str, &'static str)];

const DESCRIPTION: Candidates = &[("property", "og:description", "content"), ("name", "description", "content")];

const IMAGE: Candidates = &[
    ("property", "og:image", "content"),
    ("rel", "apple-touch-icon", "href"),
    ("rel", "apple-touch-icon-precomposed", "href"),
    ("name", "msapplication-square310x310logo", "content"),
    ("name", "msapplication-square150x150logo", "content"),
    ("name", "msapplication-square70x70logo", "content"),
    ("name", "msapplication-TileImage", "content"),
    ("rel", "image_src", "href"),
];

const FAVICON: Candidates = &[("rel", "icon", "href"), ("rel", "shortcut icon", "href")];

const TITLE: Candidates = &[("property", "og:title", "content"), ("name", "twitter:title", "content")];

/// `<meta>` and `<link>` elements of a document's head.
pub struct MetaTags<'a> {
    tags: Vec<Element<'a>>,
}

impl<'a> MetaTags<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self { tags: doc.select("head meta, head link").unwrap_or_default() }
    }

    pub fn description(&self) -> Option<String> {
        self.search(DESCRIPTION)
    }

    pub fn image(&self, base: &Url) -> Option<Url> {
        self.search(IMAGE).and_then(|href| base.join(&href).ok())
    }

    pub fn favicon(&self, base: &Url) -> Option<Url> {
        self.search(FAVICON).and_then(|href| base.join(&href).ok())
    }

    pub fn title(&self) -> Option<String> {
        self.search(TITLE)
    }

    /// Declared charset, upper-cased: `<meta charset>` first, then the
    /// `http-equiv="Content-Type"` form.
    pub fn charset(&self) -> Option<String> {
        let declared = self
            .tags
            .iter()
            .find_map(|tag| tag.attr("charset"))
            .map(str::to_string)
            .filter(|c| !c.trim().is_empty())
            .or_else(|| {
                let content = self.search(&[("http-equiv", "Content-Type", "content")])?;
                let lower = content.to_ascii_lowercase();
                let start = lower.find("charset=")? + "charset=".len();
                Some(content[start..].split(';').next().unwrap_or_default().to_string())
            })?;

        let charset = declared.trim().trim_matches(['"', '\'']).to_uppercase();
        (!charset.is_empty()).then_some(charset)
    }

    /// First candidate whose value is longer than one character wins.
    fn search(&self, candidates: &[(&str, &str, &str)]) -> Option<String> {
        candidates.iter().find_map(|(attr, expected, target)| {
            let tag = self
                .tags
                .iter()
                .find(|tag| tag.attr(attr).is_some_and(|value| value.eq_ignore_ascii_case(expected)))?;
            let value = tag.attr(target)?.trim();
            (value.chars().count() > 1).then(|| value.to_string())
        })
    }
}

/// Best title for the page: social meta tags, then `<title>`, then the first
/// `<h1>`.
pub fn extract_title(doc: &Document, meta: &MetaTags<'_>) -> Option<String> {
    meta.title().or_else(|| doc.title()).or_else(|| {
        doc.first("h1")
            .map(|h1| h1.text().split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|t| !t.is_empty())
    })
}
