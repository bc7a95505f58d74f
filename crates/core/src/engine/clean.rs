//! Markup cleanup before candidate scoring.

use std::sync::LazyLock;

use regex::Regex;

use crate::{FolioError, Result};

/// Elements that never hold readable article text.
const NON_CONTENT: &str = "script, style, noscript, iframe, svg, canvas, template, object, embed, button";

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

static UNLIKELY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(banner|breadcrumbs?|combx|comment|community|cookie|disqus|extra|foot|header|menu|related|remark|rss|shoutbox|sidebar|sponsor|ad-break|agegate|pagination|pager|popup|share|social)",
    )
    .expect("valid regex")
});

static MAYBE_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(article|body|content|entry|hentry|h-entry|main|page|post|text|blog|story|tweet)")
        .expect("valid regex")
});

static HIDDEN_STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(display\s*:\s*none|visibility\s*:\s*hidden)").expect("valid regex"));

/// Which cleanup steps run before scoring.
#[derive(Debug, Clone)]
pub struct CleanConfig {
    /// Drop scripts, styles, embeds and other non-content elements.
    pub remove_non_content: bool,
    /// Drop elements whose class or id marks them as page chrome.
    pub remove_unlikely: bool,
    /// Drop elements hidden with inline styles or the `hidden` attribute.
    pub remove_hidden: bool,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self { remove_non_content: true, remove_unlikely: true, remove_hidden: true }
    }
}

/// Strips comments and the elements `config` asks for.
///
/// Rewriting failures leave the markup as it was; scoring still works on
/// uncleaned HTML, only less precisely.
pub fn clean_html(html: &str, config: &CleanConfig) -> String {
    let without_comments = COMMENT.replace_all(html, "");

    let mut handlers = Vec::new();
    if config.remove_non_content {
        handlers.push(lol_html::element!(NON_CONTENT, |el| {
            el.remove();
            Ok(())
        }));
    }
    if config.remove_hidden {
        handlers.push(lol_html::element!("*", |el| {
            let hidden = el.has_attribute("hidden")
                || el.get_attribute("style").is_some_and(|style| HIDDEN_STYLE.is_match(&style));
            if hidden {
                el.remove();
            }
            Ok(())
        }));
    }
    if config.remove_unlikely {
        handlers.push(lol_html::element!("*", |el| {
            if matches!(el.tag_name().as_str(), "html" | "body" | "article" | "main" | "a") {
                return Ok(());
            }
            let names = format!(
                "{} {}",
                el.get_attribute("class").unwrap_or_default(),
                el.get_attribute("id").unwrap_or_default()
            );
            if UNLIKELY.is_match(&names) && !MAYBE_CANDIDATE.is_match(&names) {
                el.remove();
            }
            Ok(())
        }));
    }

    if handlers.is_empty() {
        return without_comments.into_owned();
    }

    let settings = lol_html::Settings { element_content_handlers: handlers, ..Default::default() };
    match rewrite(&without_comments, settings) {
        Ok(cleaned) => cleaned,
        Err(e) => {
            tracing::debug!(error = %e, "cleanup skipped");
            without_comments.into_owned()
        }
    }
}

/// Runs `html` through a streaming rewriter configured by `settings`.
pub(crate) fn rewrite(html: &str, settings: lol_html::Settings<'_, '_>) -> Result<String> {
    let mut output = Vec::with_capacity(html.len());
    let mut rewriter = lol_html::HtmlRewriter::new(settings, |chunk: &[u8]| output.extend_from_slice(chunk));

    rewriter.write(html.as_bytes()).map_err(|e| FolioError::HtmlParseError(e.to_string()))?;
    rewriter.end().map_err(|e| FolioError::HtmlParseError(e.to_string()))?;

    Ok(String::from_utf8_lossy(&output).into_owned())
}
