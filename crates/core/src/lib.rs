//! Reads web articles: fetches pages, negotiates their charset, follows
//! "next page" links and extracts the readable content.
//!
//! ```rust,no_run
//! # async fn run() -> folio_core::Result<()> {
//! let article = folio_core::read("https://example.com/story").await?;
//! println!("{}", article.title.unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod article;
pub mod crawl;
pub mod encoding;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod options;
pub mod reader;
pub mod transcode;

pub use article::{Article, ArticleImage, OutputFormat};
pub use crawl::{PageAccumulator, normalize_mobile_domain};
pub use encoding::{decode_bytes, resolve_encoding};
pub use engine::{EngineConfig, ReadabilityTranscoder};
pub use error::{FolioError, Result};
pub use fetch::{FetchResult, Fetcher, HttpFetcher, HttpOptions};
pub use options::{ReadOptions, ReadOptionsBuilder};
pub use reader::{Reader, ReaderBuilder, read};
pub use transcode::{
    AnchorRewriter, ExtractionResult, ImageElement, PageExtraction, SerializationOptions, Transcoder,
    TranscodingInput, extract_page, reverse_deep_link,
};
