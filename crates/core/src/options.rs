//! Per-read options.

/// Options controlling one read.
///
/// # Example
///
/// ```rust
/// use folio_core::ReadOptions;
///
/// let options = ReadOptions::builder()
///     .multipage_download(true)
///     .use_deep_links(true)
///     .build();
/// assert!(options.multipage_download);
/// assert!(options.include_headline);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// Return a full HTML document (doctype, head, body) instead of the body
    /// fragment only (default: false).
    pub include_headers: bool,

    /// Prepend the article title as an `<h1>` (default: true).
    pub include_headline: bool,

    /// Keep in-page anchors as `#fragment` instead of absolutizing them
    /// (default: false).
    pub use_deep_links: bool,

    /// Break block-level closing tags onto their own lines (default: true).
    pub pretty_print: bool,

    /// When header and document disagree on the charset, decode with the
    /// document's (default: true).
    pub prefer_html_encoding: bool,

    /// Follow "next page" links and merge them into one article
    /// (default: false).
    pub multipage_download: bool,

    /// Replace `<img>` elements with numbered `<!--IMG_n-->` markers
    /// (default: false).
    pub replace_images_with_placeholders: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            include_headers: false,
            include_headline: true,
            use_deep_links: false,
            pretty_print: true,
            prefer_html_encoding: true,
            multipage_download: false,
            replace_images_with_placeholders: false,
        }
    }
}

impl ReadOptions {
    /// Creates a new builder for ReadOptions.
    pub fn builder() -> ReadOptionsBuilder {
        ReadOptionsBuilder::new()
    }
}

/// Builder for [`ReadOptions`].
pub struct ReadOptionsBuilder {
    options: ReadOptions,
}

impl ReadOptionsBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { options: ReadOptions::default() }
    }

    pub fn include_headers(mut self, value: bool) -> Self {
        self.options.include_headers = value;
        self
    }

    pub fn include_headline(mut self, value: bool) -> Self {
        self.options.include_headline = value;
        self
    }

    pub fn use_deep_links(mut self, value: bool) -> Self {
        self.options.use_deep_links = value;
        self
    }

    pub fn pretty_print(mut self, value: bool) -> Self {
        self.options.pretty_print = value;
        self
    }

    pub fn prefer_html_encoding(mut self, value: bool) -> Self {
        self.options.prefer_html_encoding = value;
        self
    }

    pub fn multipage_download(mut self, value: bool) -> Self {
        self.options.multipage_download = value;
        self
    }

    pub fn replace_images_with_placeholders(mut self, value: bool) -> Self {
        self.options.replace_images_with_placeholders = value;
        self
    }

    /// Builds the options.
    pub fn build(self) -> ReadOptions {
        self.options
    }
}

impl Default for ReadOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
