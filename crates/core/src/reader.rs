//! Public entry point for reading articles.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use url::Url;

use crate::article::Article;
use crate::crawl::Crawl;
use crate::engine::ReadabilityTranscoder;
use crate::fetch::{Fetcher, HttpFetcher, HttpOptions};
use crate::transcode::Transcoder;
use crate::{FolioError, ReadOptions, Result};

/// Reads articles from the web.
///
/// A `Reader` holds the transport and the extraction engine and can serve any
/// number of concurrent reads; everything a single read tracks lives only for
/// that call.
///
/// # Example
///
/// ```rust,no_run
/// use folio_core::{ReadOptions, Reader};
///
/// # async fn run() -> folio_core::Result<()> {
/// let reader = Reader::new()?;
/// let options = ReadOptions::builder().multipage_download(true).build();
/// let article = reader.read_with_options("https://example.com/story", &options).await?;
/// println!("{} pages, {} words", article.page_count, article.word_count);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Reader {
    fetcher: Arc<dyn Fetcher>,
    transcoder: Arc<dyn Transcoder>,
    multipage_limit: usize,
}

impl Reader {
    /// Creates a reader with default HTTP options and the built-in engine.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::HttpError`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Creates a reader with custom HTTP options.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::ConfigError`] for an unusable user agent and
    /// [`FolioError::HttpError`] if the HTTP client cannot be built.
    pub fn with_http_options(options: HttpOptions) -> Result<Self> {
        Self::builder().http_options(options).build()
    }

    pub fn builder() -> ReaderBuilder {
        ReaderBuilder::new()
    }

    /// Maximum number of pages merged into one article.
    pub fn multipage_limit(&self) -> usize {
        self.multipage_limit
    }

    /// Reads `url` with default [`ReadOptions`].
    ///
    /// # Errors
    ///
    /// See [`Reader::read_with_cancellation`].
    pub async fn read(&self, url: &str) -> Result<Article> {
        self.read_with_options(url, &ReadOptions::default()).await
    }

    /// Reads `url` with the given options.
    ///
    /// # Errors
    ///
    /// See [`Reader::read_with_cancellation`].
    pub async fn read_with_options(&self, url: &str, options: &ReadOptions) -> Result<Article> {
        self.read_with_cancellation(url, options, &CancellationToken::new()).await
    }

    /// Reads `url`, stopping as soon as `cancel` fires.
    ///
    /// # Errors
    ///
    /// - [`FolioError::InvalidUrl`] if `url` is not an absolute http(s) URL
    /// - [`FolioError::Status`], [`FolioError::HttpError`] or
    ///   [`FolioError::Timeout`] if the first page cannot be fetched
    /// - [`FolioError::Extraction`] if the first page cannot be extracted
    /// - [`FolioError::Cancelled`] if `cancel` fires before the read completes
    ///
    /// Failures on later pages of a multipage read are not errors: the article
    /// is returned with the pages merged so far.
    pub async fn read_with_cancellation(
        &self, url: &str, options: &ReadOptions, cancel: &CancellationToken,
    ) -> Result<Article> {
        let url = parse_article_url(url)?;
        tracing::debug!(url = %url, multipage = options.multipage_download, "reading article");

        let crawl = Crawl::new(self.fetcher.as_ref(), self.transcoder.as_ref(), options, self.multipage_limit, cancel);
        let merged = crawl.run(&url).await?;

        let article = Article::assemble(merged);
        tracing::debug!(
            url = %url,
            pages = article.page_count,
            words = article.word_count,
            extracted = article.content_extracted,
            "read article"
        );
        Ok(article)
    }
}

/// Builder for [`Reader`].
///
/// # Example
///
/// ```rust
/// use folio_core::{HttpOptions, Reader};
///
/// let reader = Reader::builder()
///     .http_options(HttpOptions { request_timeout: Some(10), ..Default::default() })
///     .multipage_limit(3)
///     .build()
///     .unwrap();
/// assert_eq!(reader.multipage_limit(), 3);
/// ```
pub struct ReaderBuilder {
    fetcher: Option<Arc<dyn Fetcher>>,
    transcoder: Option<Arc<dyn Transcoder>>,
    http_options: HttpOptions,
    multipage_limit: Option<usize>,
}

impl ReaderBuilder {
    pub fn new() -> Self {
        Self { fetcher: None, transcoder: None, http_options: HttpOptions::default(), multipage_limit: None }
    }

    /// Uses `fetcher` instead of an [`HttpFetcher`] built from the HTTP
    /// options.
    pub fn fetcher(mut self, fetcher: impl Fetcher + 'static) -> Self {
        self.fetcher = Some(Arc::new(fetcher));
        self
    }

    /// Uses `transcoder` instead of [`ReadabilityTranscoder`].
    pub fn transcoder(mut self, transcoder: impl Transcoder + 'static) -> Self {
        self.transcoder = Some(Arc::new(transcoder));
        self
    }

    pub fn http_options(mut self, options: HttpOptions) -> Self {
        self.http_options = options;
        self
    }

    /// Overrides [`HttpOptions::multipage_limit`].
    pub fn multipage_limit(mut self, limit: usize) -> Self {
        self.multipage_limit = Some(limit);
        self
    }

    /// Builds the reader.
    ///
    /// # Errors
    ///
    /// Fails only when no fetcher was supplied and the HTTP fetcher cannot be
    /// built from the options.
    pub fn build(self) -> Result<Reader> {
        let fetcher: Arc<dyn Fetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpFetcher::new(&self.http_options)?),
        };
        let transcoder: Arc<dyn Transcoder> = match self.transcoder {
            Some(transcoder) => transcoder,
            None => Arc::new(ReadabilityTranscoder::default()),
        };

        Ok(Reader {
            fetcher,
            transcoder,
            multipage_limit: self.multipage_limit.unwrap_or(self.http_options.multipage_limit),
        })
    }
}

impl Default for ReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads `url` with a default [`Reader`] and default [`ReadOptions`].
///
/// # Errors
///
/// See [`Reader::read_with_cancellation`].
pub async fn read(url: &str) -> Result<Article> {
    Reader::new()?.read(url).await
}

fn parse_article_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url.trim()).map_err(|e| FolioError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(FolioError::InvalidUrl(format!("{url}: unsupported scheme {scheme}"))),
    }
}
