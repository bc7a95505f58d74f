//! Page retrieval over HTTP.
//!
//! The [`Fetcher`] trait is the transport seam of a read: one GET per page,
//! status validation, and the raw body handed back undecoded together with the
//! charset the server declared. [`HttpFetcher`] is the reqwest-backed default.

use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_ENCODING, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::encoding::charset_from_content_type;
use crate::{FolioError, Result};

const ACCEPT_HEADER: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_ENCODING_HEADER: &str = "gzip,deflate";

/// HTTP configuration shared by every read of a [`Reader`](crate::Reader).
///
/// User agent strings are templates: `{0}` is replaced with `; Folio/<version>`.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Preconfigured client to use instead of building one.
    ///
    /// When set, `request_timeout` and the user agent fields are still applied
    /// per request, but client-level settings (redirects, decompression) are
    /// whatever the caller configured.
    pub client: Option<Client>,
    /// Per-request timeout in seconds. `None` means no timeout.
    pub request_timeout: Option<u64>,
    /// Send the mobile user agent instead of the desktop one.
    pub use_mobile_user_agent: bool,
    /// Desktop user agent template.
    pub user_agent: String,
    /// Mobile user agent template.
    pub user_agent_mobile: String,
    /// Maximum number of pages merged into one article (default: 10).
    pub multipage_limit: usize,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            client: None,
            request_timeout: None,
            use_mobile_user_agent: false,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64{0}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36".to_string(),
            user_agent_mobile: "Mozilla/5.0 (Linux; Android 14; Mobile{0}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Mobile Safari/537.36".to_string(),
            multipage_limit: 10,
        }
    }
}

impl HttpOptions {
    /// The user agent actually sent, with the template filled in.
    pub fn effective_user_agent(&self) -> String {
        let template = if self.use_mobile_user_agent { &self.user_agent_mobile } else { &self.user_agent };
        template.replace("{0}", &format!("; Folio/{}", env!("CARGO_PKG_VERSION")))
    }
}

/// One fetched page, body still encoded.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// Raw (decompressed) response body. Cheap to clone and re-read.
    pub bytes: Bytes,
    /// Charset from the `Content-Type` header, if any.
    pub charset: Option<String>,
    /// HTTP status code.
    pub status: u16,
    /// URL after redirects.
    pub final_url: Url,
}

/// Retrieves a single page.
///
/// Implementations must be safe to share between concurrent reads and should
/// stop promptly with [`FolioError::Cancelled`] once `cancel` fires.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url, cancel: &CancellationToken) -> Result<FetchResult>;
}

/// reqwest-backed [`Fetcher`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    headers: HeaderMap,
    timeout: Option<u64>,
}

impl HttpFetcher {
    /// Builds a fetcher from HTTP options.
    ///
    /// Redirects are followed and gzip/deflate bodies are decompressed by the
    /// client. Headers and the timeout are attached per request, so they also
    /// apply to a caller-supplied client.
    pub fn new(options: &HttpOptions) -> Result<Self> {
        let client = match &options.client {
            Some(client) => client.clone(),
            None => Client::builder()
                .gzip(true)
                .deflate(true)
                .redirect(reqwest::redirect::Policy::limited(10))
                .build()
                .map_err(FolioError::HttpError)?,
        };

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HEADER));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static(ACCEPT_ENCODING_HEADER));
        let user_agent = HeaderValue::from_str(&options.effective_user_agent())
            .map_err(|e| FolioError::ConfigError(format!("invalid user agent: {e}")))?;
        headers.insert(USER_AGENT, user_agent);

        Ok(Self { client, headers, timeout: options.request_timeout })
    }

    async fn get(&self, url: &Url) -> Result<FetchResult> {
        let mut request = self.client.get(url.clone()).headers(self.headers.clone());
        if let Some(timeout) = self.timeout {
            request = request.timeout(Duration::from_secs(timeout));
        }
        let response = request.send().await.map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FolioError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let charset = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(charset_from_content_type);
        let final_url = response.url().clone();
        let bytes = response.bytes().await.map_err(|e| self.map_error(e))?;

        tracing::debug!(url = %url, status = status.as_u16(), bytes = bytes.len(), charset = ?charset, "fetched page");

        Ok(FetchResult { bytes, charset, status: status.as_u16(), final_url })
    }

    fn map_error(&self, err: reqwest::Error) -> FolioError {
        match self.timeout {
            Some(timeout) if err.is_timeout() => FolioError::Timeout { timeout },
            _ => FolioError::HttpError(err),
        }
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, cancel: &CancellationToken) -> Result<FetchResult> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FolioError::Cancelled),
            result = self.get(url) => result,
        }
    }
}
