//! Error types for Folio operations.
//!
//! Every failure a read can surface is a variant of [`FolioError`]. Transport,
//! status and extraction failures on the first page of an article abort the
//! read; on later pages they only truncate the crawl. Cancellation is kept as
//! its own variant so callers can tell "gave up" from "went wrong".
//!
//! # Example
//!
//! ```rust
//! use folio_core::{FolioError, Result};
//!
//! fn require_content(html: &str) -> Result<&str> {
//!     if html.is_empty() {
//!         return Err(FolioError::Extraction("empty document".to_string()));
//!     }
//!     Ok(html)
//! }
//! ```

use thiserror::Error;

/// Main error type for reading articles.
///
/// # Example
///
/// ```rust,no_run
/// use folio_core::{FolioError, Reader};
///
/// # async fn run() -> folio_core::Result<()> {
/// let reader = Reader::new()?;
/// match reader.read("https://example.com/story").await {
///     Ok(article) => println!("{:?}", article.title),
///     Err(FolioError::Status { status, .. }) => println!("server said {status}"),
///     Err(FolioError::Cancelled) => println!("cancelled"),
///     Err(e) => println!("Error: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Error, Debug)]
pub enum FolioError {
    /// Network-level failure reported by reqwest (DNS, connect, TLS, body read).
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Request error: {reason} ({status})")]
    Status { status: u16, reason: String },

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Decoding or extraction of a fetched page failed.
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// HTML parsing errors, usually an invalid selector.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// Invalid reader configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The read was cancelled through its cancellation token.
    #[error("Read was cancelled")]
    Cancelled,
}

impl FolioError {
    /// Returns `true` for [`FolioError::Cancelled`].
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FolioError::Cancelled)
    }

    /// HTTP status carried by the error, if the server responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FolioError::Status { status, .. } => Some(*status),
            FolioError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for FolioError.
pub type Result<T> = std::result::Result<T, FolioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FolioError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_status_error_carries_reason_and_code() {
        let err = FolioError::Status { status: 404, reason: "Not Found".to_string() };
        assert_eq!(err.to_string(), "Request error: Not Found (404)");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_timeout_error() {
        let err = FolioError::Timeout { timeout: 30 };
        assert!(err.to_string().contains("30"));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_cancelled_is_distinct() {
        assert!(FolioError::Cancelled.is_cancelled());
        assert!(!FolioError::Extraction("boom".to_string()).is_cancelled());
    }
}
