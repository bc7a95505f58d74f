//! Turns the chosen content element into the HTML an article carries.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use super::clean::rewrite;
use crate::Result;
use crate::transcode::{AnchorRewriter, SerializationOptions};

/// Marker written in place of an image when placeholders are enabled.
pub const IMAGE_PLACEHOLDER: &str = "<!--IMG-->";

static BLOCK_CLOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(</(?:p|div|h[1-6]|li|ul|ol|dl|blockquote|pre|table|tr|section|article|figure|header|footer)>|<br\s*/?>)\s*")
        .expect("valid regex")
});

/// Serializes `content` for `url` as `options` describe.
///
/// Links and image sources become absolute. With an anchor rewriter, each
/// absolute href is passed through it as `(article url, href)`.
pub fn serialize_content(
    content: &str, title: Option<&str>, url: &Url, options: &SerializationOptions, anchor_rewriter: Option<&AnchorRewriter>,
) -> Result<String> {
    let placeholders = options.image_placeholders;
    let settings = lol_html::Settings {
        element_content_handlers: vec![
            lol_html::element!("a[href]", |el| {
                if let Some(href) = el.get_attribute("href")
                    && let Ok(absolute) = url.join(href.trim())
                {
                    let href = match anchor_rewriter {
                        Some(hook) => hook(url.as_str(), absolute.as_str()),
                        None => absolute.to_string(),
                    };
                    el.set_attribute("href", &href)?;
                }
                Ok(())
            }),
            lol_html::element!("img", |el| {
                if placeholders {
                    el.replace(IMAGE_PLACEHOLDER, lol_html::html_content::ContentType::Html);
                } else if let Some(src) = el.get_attribute("src")
                    && let Ok(absolute) = url.join(src.trim())
                {
                    el.set_attribute("src", absolute.as_str())?;
                }
                Ok(())
            }),
        ],
        ..Default::default()
    };

    let mut html = rewrite(content, settings)?;

    if options.include_headline
        && let Some(title) = title.filter(|t| !t.trim().is_empty())
    {
        html = format!("<h1>{}</h1>{}", escape_text(title.trim()), html);
    }

    if options.pretty_print {
        html = BLOCK_CLOSE.replace_all(html.trim(), "$1\n").trim_end().to_string();
    }

    if !options.body_only {
        html = wrap_document(&html, title);
    }

    Ok(html)
}

/// Wraps serialized content in a standalone UTF-8 document titled `title`.
pub fn wrap_document(content: &str, title: Option<&str>) -> String {
    let head_title = title.map(|t| format!("<title>{}</title>", escape_text(t.trim()))).unwrap_or_default();
    format!("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">{head_title}</head>\n<body>\n{content}\n</body></html>")
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
