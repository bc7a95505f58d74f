//! "Next page" link detection for articles split over several URLs.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use url::{Position, Url};

use super::document::Document;

static NEXT_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(next|weiter|continue|další|suivant|siguiente|>([^|]|$)|»([^|]|$))").expect("valid regex"));

static PREV_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(prev|earl|old|new|zurück|<|«)").expect("valid regex"));

static FIRST_LAST: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(first|last)").expect("valid regex"));

static PAGINATION_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(pag(e|ing|inat)|next)").expect("valid regex"));

static UNLIKELY_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(comment|sidebar|footer|related|sponsor|extra)").expect("valid regex"));

/// Score a link needs before it is trusted as the next page.
const MIN_NEXT_SCORE: i32 = 50;

/// Link texts longer than this are prose, not pager controls.
const MAX_LINK_TEXT: usize = 25;

/// Finds the absolute URL of the page that continues this one.
///
/// A `<link rel="next">` in the head wins outright. Otherwise every anchor on
/// the same host is scored on its text, `rel`, and the class/id of itself and
/// its parent; the best one scoring at least 50 is returned.
pub fn find_next_page(doc: &Document, page_url: &Url) -> Option<String> {
    let current = without_fragment(page_url);
    let base = article_base(page_url);

    let resolve = |href: &str| -> Option<Url> {
        let url = page_url.join(href.trim()).ok()?;
        let url = without_fragment(&url);
        let usable = matches!(url.scheme(), "http" | "https")
            && url.host_str() == page_url.host_str()
            && url != current
            && url.as_str().trim_end_matches('/') != base.as_str().trim_end_matches('/');
        usable.then_some(url)
    };

    if let Some(next) = doc
        .select("head link[rel~=\"next\"][href]")
        .unwrap_or_default()
        .into_iter()
        .find_map(|link| link.attr("href").and_then(resolve))
    {
        return Some(next.to_string());
    }

    let mut best: HashMap<String, i32> = HashMap::new();
    for link in doc.select("a[href]").unwrap_or_default() {
        let Some(url) = link.attr("href").and_then(resolve) else { continue };
        let text = link.text().split_whitespace().collect::<Vec<_>>().join(" ");
        if text.chars().count() > MAX_LINK_TEXT {
            continue;
        }

        let rel_next = link
            .attr("rel")
            .is_some_and(|rel| rel.split_whitespace().any(|r| r.eq_ignore_ascii_case("next")));
        let tail = &url[Position::BeforePath..];
        let leftover = tail.strip_prefix(base.path()).unwrap_or(tail);
        if !rel_next && !leftover.chars().any(|c| c.is_ascii_digit()) {
            continue;
        }

        let mut score = 0;
        if rel_next {
            score += 100;
        }
        if NEXT_LINK.is_match(&text) {
            score += 50;
        } else if FIRST_LAST.is_match(&text) {
            score -= 65;
        }
        if PREV_LINK.is_match(&text) {
            score -= 200;
        }

        let own_class = link.class_and_id();
        if PAGINATION_CLASS.is_match(&own_class) {
            score += 25;
        }
        if UNLIKELY_CLASS.is_match(&own_class) {
            score -= 50;
        }
        if let Some(parent) = link.parent() {
            let parent_class = parent.class_and_id();
            if PAGINATION_CLASS.is_match(&parent_class) {
                score += 25;
            }
            if UNLIKELY_CLASS.is_match(&parent_class) {
                score -= 25;
            }
        }
        if let Ok(number) = text.parse::<i32>() {
            score += if number == 1 { -10 } else { (10 - number).max(0) };
        }

        let entry = best.entry(url.to_string()).or_insert(i32::MIN);
        *entry = (*entry).max(score);
    }

    best.into_iter()
        .filter(|(_, score)| *score >= MIN_NEXT_SCORE)
        .max_by(|(a_url, a), (b_url, b)| a.cmp(b).then_with(|| b_url.cmp(a_url)))
        .map(|(url, _)| url)
}

fn without_fragment(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url
}

/// The URL with query, fragment and a trailing page-number segment removed.
fn article_base(url: &Url) -> Url {
    let mut base = url.clone();
    base.set_query(None);
    base.set_fragment(None);

    let segments: Vec<&str> = url.path().split('/').filter(|s| !s.is_empty()).collect();
    let kept: Vec<&str> = match segments.split_last() {
        Some((last, rest)) if last.chars().all(|c| c.is_ascii_digit()) => rest.to_vec(),
        _ => segments,
    };
    base.set_path(&kept.join("/"));
    base
}
