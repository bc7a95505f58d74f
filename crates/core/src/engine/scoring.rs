//! Content candidate scoring.
//!
//! Paragraph-like elements award points to their parent and grandparent;
//! containers start from a tag and class/id bias, and the final score is
//! discounted by link density. The best container is the article body.

use std::collections::HashMap;
use std::sync::LazyLock;

use ego_tree::NodeId;
use regex::Regex;

use super::document::{Document, Element};

/// Class/id fragments that suggest main content.
static POSITIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(article|body|content|entry|hentry|h-entry|main|page|post|text|blog|story|tweet)")
        .expect("valid regex")
});

/// Class/id fragments that suggest boilerplate.
static NEGATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(banner|breadcrumbs?|combx|comment|community|disqus|extra|foot|header|menu|related|remark|rss|shoutbox|sidebar|sponsor|ad-break|agegate|pagination|pager|popup|share|social)",
    )
    .expect("valid regex")
});

/// Tuning knobs for candidate scoring.
#[derive(Debug, Clone)]
pub struct ScoreConfig {
    /// Bonus for a positive class/id.
    pub positive_weight: f64,
    /// Penalty for a negative class/id.
    pub negative_weight: f64,
    /// Paragraphs shorter than this many characters award nothing.
    pub min_paragraph_chars: usize,
    /// Characters per length point. Zero is treated as one.
    pub chars_per_point: usize,
    /// Cap on length points per paragraph.
    pub max_length_points: f64,
    /// Minimum final score for a candidate to count as extracted content.
    pub min_score: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            positive_weight: 25.0,
            negative_weight: -25.0,
            min_paragraph_chars: 25,
            chars_per_point: 100,
            max_length_points: 3.0,
            min_score: 20.0,
        }
    }
}

/// The winning container and its score.
#[derive(Debug, Clone, Copy)]
pub struct TopCandidate<'a> {
    pub element: Element<'a>,
    pub score: f64,
}

/// Starting score for a container, by tag.
pub fn base_tag_score(tag: &str) -> f64 {
    match tag {
        "article" => 10.0,
        "section" => 8.0,
        "div" => 5.0,
        "td" | "blockquote" | "pre" => 3.0,
        "form" | "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" | "header" | "footer" | "nav" => -5.0,
        _ => 0.0,
    }
}

/// Class/id bias; the id is checked before the class names.
pub fn class_id_weight(element: &Element<'_>, config: &ScoreConfig) -> f64 {
    let names = element
        .attr("id")
        .into_iter()
        .chain(element.attr("class").into_iter().flat_map(str::split_whitespace));

    for name in names {
        if POSITIVE.is_match(name) {
            return config.positive_weight;
        }
        if NEGATIVE.is_match(name) {
            return config.negative_weight;
        }
    }
    0.0
}

/// Share of an element's text that sits inside links, 0.0 to 1.0.
pub fn link_density(element: &Element<'_>) -> f64 {
    let text_length = element.text().chars().count();
    if text_length == 0 {
        return 0.0;
    }

    let link_length: usize = element
        .select("a")
        .unwrap_or_default()
        .iter()
        .map(|link| link.text().chars().count())
        .sum();

    link_length as f64 / text_length as f64
}

/// Points a paragraph hands to its ancestors: one for existing, one per
/// comma, and up to `max_length_points` for length.
fn paragraph_score(text: &str, config: &ScoreConfig) -> f64 {
    let length_points = ((text.chars().count() / config.chars_per_point.max(1)) as f64).min(config.max_length_points);
    1.0 + text.matches(',').count() as f64 + length_points
}

/// Picks the element most likely to hold the article body.
///
/// Returns `None` when no paragraph is long enough to score anything.
pub fn top_candidate<'a>(doc: &'a Document, config: &ScoreConfig) -> Option<TopCandidate<'a>> {
    let mut scores: HashMap<NodeId, (Element<'a>, f64)> = HashMap::new();

    for paragraph in doc.select("p, pre, td").unwrap_or_default() {
        let text = paragraph.text();
        let text = text.trim();
        if text.chars().count() < config.min_paragraph_chars {
            continue;
        }

        let points = paragraph_score(text, config);
        let parent = paragraph.parent();
        let grandparent = parent.and_then(|p| p.parent());

        for (ancestor, share) in [(parent, points), (grandparent, points / 2.0)] {
            let Some(ancestor) = ancestor else { continue };
            if matches!(ancestor.tag_name().as_str(), "html" | "body") {
                continue;
            }
            let entry = scores.entry(ancestor.node_id()).or_insert_with(|| {
                let initial = base_tag_score(&ancestor.tag_name()) + class_id_weight(&ancestor, config);
                (ancestor, initial)
            });
            entry.1 += share;
        }
    }

    scores
        .into_values()
        .map(|(element, score)| TopCandidate { element, score: score * (1.0 - link_density(&element)) })
        .max_by(|a, b| a.score.total_cmp(&b.score))
}
