//! Thin wrappers over `scraper` used by the engine.

use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node, Selector};

use crate::{FolioError, Result};

/// Elements that end a line when flattening HTML to text.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption", "figure", "footer",
    "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table",
    "td", "th", "tr", "ul",
];

/// A parsed HTML document.
///
/// ```rust
/// use folio_core::engine::Document;
///
/// let doc = Document::parse("<html><head><title>Test</title></head><body><p>Hello</p></body></html>");
/// assert_eq!(doc.title(), Some("Test".to_string()));
/// ```
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses a full document. Parsing never fails; broken markup is repaired
    /// the way browsers do it.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Parses an HTML fragment such as extracted article content.
    pub fn parse_fragment(html: &str) -> Self {
        Self { html: Html::parse_fragment(html) }
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).map(|element| Element { element }).collect())
    }

    /// First element matching `selector`, if any.
    pub fn first(&self, selector: &str) -> Option<Element<'_>> {
        let sel = Selector::parse(selector).ok()?;
        self.html.select(&sel).next().map(|element| Element { element })
    }

    /// Text of the `<title>` element, trimmed; `None` when missing or blank.
    pub fn title(&self) -> Option<String> {
        self.first("title")
            .map(|el| el.text().trim().to_string())
            .filter(|t| !t.is_empty())
    }

    /// The `<body>` element, if the parser produced one.
    pub fn body(&self) -> Option<Element<'_>> {
        self.first("body")
    }

    /// Readable text of the whole document: block elements end lines, runs of
    /// whitespace collapse, script and style text is dropped.
    pub fn text_content(&self) -> String {
        let mut raw = String::new();
        flatten_text(*self.html.root_element(), &mut raw);

        raw.lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A single element of a [`Document`].
#[derive(Clone, Copy, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    pub fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    pub fn outer_html(&self) -> String {
        self.element.html()
    }

    /// Concatenated text of all descendants.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Lowercase tag name.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// Class and id joined with a space, for pattern matching.
    pub fn class_and_id(&self) -> String {
        format!("{} {}", self.attr("class").unwrap_or_default(), self.attr("id").unwrap_or_default())
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel = parse_selector(selector)?;
        Ok(self.element.select(&sel).map(|element| Element { element }).collect())
    }

    /// Nearest ancestor element.
    pub fn parent(&self) -> Option<Element<'a>> {
        self.element.parent().and_then(ElementRef::wrap).map(|element| Element { element })
    }

    /// Identity of the underlying node, stable for the document's lifetime.
    pub fn node_id(&self) -> ego_tree::NodeId {
        self.element.id()
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| FolioError::HtmlParseError(format!("Invalid selector: {}", e)))
}

fn flatten_text(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(text),
        Node::Element(element) => {
            let name = element.name();
            if matches!(name, "script" | "style" | "noscript" | "template" | "title") {
                return;
            }
            let block = BLOCK_TAGS.contains(&name);
            if block {
                out.push('\n');
            }
            for child in node.children() {
                flatten_text(child, out);
            }
            if block {
                out.push('\n');
            }
        }
        _ => {
            for child in node.children() {
                flatten_text(child, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <title>Test Page</title>
        </head>
        <body>
            <h1>Heading</h1>
            <p class="content">Paragraph <b>1</b></p>
            <p class="content">Paragraph 2</p>
            <script>var ignored = true;</script>
            <a href="https://example.com">Link</a>
        </body>
        </html>
    "#;

    #[test]
    fn test_parse_document() {
        let doc = Document::parse(SAMPLE_HTML);
        assert_eq!(doc.title(), Some("Test Page".to_string()));
    }

    #[test]
    fn test_select_elements() {
        let doc = Document::parse(SAMPLE_HTML);
        let elements = doc.select("p.content").unwrap();

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].text(), "Paragraph 1");
        assert_eq!(elements[1].class_and_id(), "content ");
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML);
        assert!(matches!(doc.select("[[invalid"), Err(FolioError::HtmlParseError(_))));
    }

    #[test]
    fn test_text_content_separates_blocks() {
        let doc = Document::parse(SAMPLE_HTML);
        let text = doc.text_content();

        assert!(text.contains("Heading\nParagraph 1\nParagraph 2"));
        assert!(!text.contains("ignored"));
    }

    #[test]
    fn test_parent() {
        let doc = Document::parse("<div id=\"outer\"><p>x</p></div>");
        let p = doc.first("p").unwrap();
        assert_eq!(p.parent().unwrap().attr("id"), Some("outer"));
    }
}
