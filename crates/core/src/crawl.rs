//! Multipage crawl: fetch, extract and merge pages until a stop condition.

use std::collections::HashSet;

use encoding_rs::Encoding;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::engine::wrap_document;
use crate::fetch::Fetcher;
use crate::transcode::{ExtractionResult, PageExtraction, Transcoder, extract_page};
use crate::{FolioError, ReadOptions, Result};

/// Hosts whose mobile variant serves broken markup, with their desktop
/// replacement.
const FAULTY_MOBILE_DOMAINS: &[(&str, &str)] = &[
    ("m.spiegel.de", "www.spiegel.de"),
    ("mobil.zeit.de", "www.zeit.de"),
    ("m.faz.net", "www.faz.net"),
    ("m.heise.de", "www.heise.de"),
    ("mobile.nytimes.com", "www.nytimes.com"),
];

/// Pages merged so far.
#[derive(Debug, Clone)]
pub struct PageAccumulator {
    /// Merged extraction: concatenated content, all images, the last page's
    /// next-page pointer.
    pub result: ExtractionResult,
    /// Number of merged pages, at least 1.
    pub page_count: usize,
    /// Encoding of the first page.
    pub encoding: Option<&'static Encoding>,
    /// Decoded HTML of the first page.
    pub raw_html: String,
}

impl PageAccumulator {
    pub fn new(first: PageExtraction) -> Self {
        Self { result: first.result, page_count: 1, encoding: first.encoding, raw_html: first.raw_html }
    }

    /// Appends `page` after a boundary marker for its page number.
    ///
    /// Title and the other metadata stay the first page's. Content and images
    /// are appended and the next-page pointer is replaced.
    pub fn merge(&mut self, page: ExtractionResult) {
        self.page_count += 1;
        self.result
            .content
            .push_str(&format!("<div class=\"folio-page\" id=\"folio-page-{}\"></div>", self.page_count));
        self.result.content.push_str(&page.content);
        self.result.images.extend(page.images);
        self.result.next_page_url = page.next_page_url;
    }

    pub fn clear_next_page(&mut self) {
        self.result.next_page_url = None;
    }
}

/// Replaces hosts listed as faulty mobile domains with their desktop host.
pub fn normalize_mobile_domain(url: &Url) -> Url {
    let Some(host) = url.host_str() else { return url.clone() };

    match FAULTY_MOBILE_DOMAINS.iter().find(|(mobile, _)| host.eq_ignore_ascii_case(mobile)) {
        Some((_, desktop)) => {
            let mut normalized = url.clone();
            match normalized.set_host(Some(desktop)) {
                Ok(()) => normalized,
                Err(_) => url.clone(),
            }
        }
        None => url.clone(),
    }
}

/// State of a single read. Never shared between reads.
pub(crate) struct Crawl<'a> {
    fetcher: &'a dyn Fetcher,
    transcoder: &'a dyn Transcoder,
    options: &'a ReadOptions,
    page_limit: usize,
    cancel: &'a CancellationToken,
    visited: HashSet<Url>,
}

impl<'a> Crawl<'a> {
    pub(crate) fn new(
        fetcher: &'a dyn Fetcher, transcoder: &'a dyn Transcoder, options: &'a ReadOptions, page_limit: usize,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self { fetcher, transcoder, options, page_limit: page_limit.max(1), cancel, visited: HashSet::new() }
    }

    /// Crawls from `start`.
    ///
    /// Every page is extracted as a body fragment and only the first one
    /// carries the headline. When headers were requested, the merged content
    /// is wrapped into one document at the end.
    ///
    /// The first page's failure is the read's failure. Later failures end the
    /// crawl with what was merged so far, except cancellation, which always
    /// fails the read.
    pub(crate) async fn run(mut self, start: &Url) -> Result<PageAccumulator> {
        let start = normalize_mobile_domain(start);
        let first = self.page(&start, true).await?;
        let mut acc = PageAccumulator::new(first);

        while self.options.multipage_download && acc.page_count < self.page_limit {
            let Some(next) = acc.result.next_page_url.clone() else { break };

            let next = match Url::parse(&next) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(next = %next, error = %e, "unusable next page url");
                    acc.clear_next_page();
                    break;
                }
            };

            if self.visited.contains(&visit_key(&next)) {
                tracing::debug!(url = %next, "next page already visited");
                acc.clear_next_page();
                break;
            }

            let page = match self.page(&next, false).await {
                Ok(page) => page,
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => {
                    tracing::warn!(url = %next, error = %e, pages = acc.page_count, "stopping crawl after failed page");
                    acc.clear_next_page();
                    break;
                }
            };

            if acc.result.content.contains(&page.result.content) {
                tracing::debug!(url = %next, "page repeats merged content");
                acc.clear_next_page();
                break;
            }

            acc.merge(page.result);
            tracing::debug!(url = %next, pages = acc.page_count, "merged page");
        }

        if self.options.include_headers {
            acc.result.content = wrap_document(&acc.result.content, acc.result.title.as_deref());
        }

        Ok(acc)
    }

    async fn page(&mut self, url: &Url, first: bool) -> Result<PageExtraction> {
        if self.cancel.is_cancelled() {
            return Err(FolioError::Cancelled);
        }
        self.visited.insert(visit_key(url));

        let fetched = self.fetcher.fetch(url, self.cancel).await?;
        self.visited.insert(visit_key(&fetched.final_url));

        let options = ReadOptions {
            include_headers: false,
            include_headline: first && self.options.include_headline,
            ..self.options.clone()
        };
        let page = extract_page(self.transcoder, &fetched.final_url, &fetched, &options)?;
        if self.cancel.is_cancelled() {
            return Err(FolioError::Cancelled);
        }
        Ok(page)
    }
}

fn visit_key(url: &Url) -> Url {
    let mut key = url.clone();
    key.set_fragment(None);
    key
}
