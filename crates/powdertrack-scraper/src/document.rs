//! Parsed-page abstraction consumed by the extraction strategies.
//!
//! A [`Document`] is created once per fetch, owned exclusively by the
//! extraction attempt that produced it, and discarded afterward. It hides
//! the HTML tree behind the handful of read-only views the strategies
//! need: flattened text, metadata elements, JSON-LD blocks, data-attribute
//! elements, and class-matched containers.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::ScrapeError;

/// Container element tags worth scanning for label/value content.
const CONTAINER_TAGS: [&str; 5] = ["div", "span", "p", "td", "li"];

/// How much of the flattened text the document-level inch inference reads.
const UNIT_SNIFF_CHARS: usize = 1000;

/// One `<meta>` element's identifying text and content.
#[derive(Debug, Clone)]
pub struct MetaTag {
    /// Concatenated `name` and `property` attributes, lower-cased.
    pub name: String,
    pub content: String,
}

/// A container element matched by class/id pattern.
#[derive(Debug, Clone)]
pub struct ClassElement {
    /// Whitespace-collapsed text of the element itself.
    pub text: String,
    /// Text of a descendant whose class mentions "label", when present.
    pub label: Option<String>,
    /// Text of a descendant whose class mentions "value", when present.
    pub value: Option<String>,
    /// Whitespace-collapsed text of the parent element, for context
    /// classification (base vs summit).
    pub parent_text: String,
}

/// An element carrying a named data attribute.
#[derive(Debug, Clone)]
pub struct AttrElement {
    /// The attribute's raw value.
    pub value: String,
    /// Whitespace-collapsed element text.
    pub text: String,
    /// Parent context text.
    pub parent_text: String,
}

/// One fetched page, parsed and ready for strategy scans.
pub struct Document {
    html: Html,
    text: String,
    inches_inferred: bool,
}

impl Document {
    /// Parses an HTML body into a `Document`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::MalformedDocument`] when the body is empty or
    /// contains no text content at all — such responses carry nothing any
    /// strategy could work with.
    pub fn parse(body: &str, url: &str) -> Result<Self, ScrapeError> {
        if body.trim().is_empty() {
            return Err(ScrapeError::MalformedDocument {
                url: url.to_owned(),
                reason: "empty response body".to_owned(),
            });
        }

        let html = Html::parse_document(body);
        let text = flatten_text(&html);
        if text.is_empty() {
            return Err(ScrapeError::MalformedDocument {
                url: url.to_owned(),
                reason: "document has no text content".to_owned(),
            });
        }

        let prefix: String = text.chars().take(UNIT_SNIFF_CHARS).collect();
        let inch_marker = Regex::new(r#"\d+\s*(?:in\b|inch|")"#).expect("valid regex");
        let inches_inferred = inch_marker.is_match(&prefix);

        Ok(Self {
            html,
            text,
            inches_inferred,
        })
    }

    /// The whole document's text content, whitespace-collapsed.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Document-level unit inference: `true` when the leading portion of
    /// the text carries an inch marker. Fields matched without a local
    /// unit are then interpreted as inches.
    #[must_use]
    pub fn prefix_suggests_inches(&self) -> bool {
        self.inches_inferred
    }

    /// All `<meta>` elements with their combined name/property and content.
    #[must_use]
    pub fn meta_tags(&self) -> Vec<MetaTag> {
        let selector = Selector::parse("meta").expect("valid selector");
        self.html
            .select(&selector)
            .map(|el| {
                let name = format!(
                    "{}{}",
                    el.value().attr("name").unwrap_or(""),
                    el.value().attr("property").unwrap_or("")
                )
                .to_lowercase();
                let content = el.value().attr("content").unwrap_or("").to_owned();
                MetaTag { name, content }
            })
            .collect()
    }

    /// Parsed contents of every `<script type="application/ld+json">`
    /// block; blocks that fail to parse as JSON are skipped.
    #[must_use]
    pub fn jsonld_blocks(&self) -> Vec<serde_json::Value> {
        let selector =
            Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid selector");
        self.html
            .select(&selector)
            .filter_map(|el| {
                let raw: String = el.text().collect();
                serde_json::from_str(&raw).ok()
            })
            .collect()
    }

    /// Elements carrying the named attribute, with its value and context.
    #[must_use]
    pub fn attr_elements(&self, attr: &str) -> Vec<AttrElement> {
        let selector = Selector::parse(&format!("[{attr}]")).expect("valid selector");
        self.html
            .select(&selector)
            .filter_map(|el| {
                let value = el.value().attr(attr)?.to_owned();
                Some(AttrElement {
                    value,
                    text: element_text(el),
                    parent_text: parent_text(el),
                })
            })
            .collect()
    }

    /// Container elements (`div`/`span`/`p`/`td`/`li`) whose class or id
    /// matches `pattern`, in document order.
    #[must_use]
    pub fn class_elements(&self, pattern: &Regex) -> Vec<ClassElement> {
        let selector = Selector::parse(&CONTAINER_TAGS.join(", ")).expect("valid selector");
        let label_re = Regex::new("(?i)label").expect("valid regex");
        let value_re = Regex::new("(?i)value").expect("valid regex");

        self.html
            .select(&selector)
            .filter(|el| {
                let class = el.value().attr("class").unwrap_or("");
                let id = el.value().attr("id").unwrap_or("");
                pattern.is_match(class) || pattern.is_match(id)
            })
            .map(|el| ClassElement {
                text: element_text(el),
                label: child_text_by_class(el, &label_re),
                value: child_text_by_class(el, &value_re),
                parent_text: parent_text(el),
            })
            .collect()
    }
}

/// Collects the element's own text, whitespace-collapsed.
fn element_text(el: ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<Vec<_>>().join(" "))
}

/// Text of the element's parent, or empty when at the tree root.
fn parent_text(el: ElementRef<'_>) -> String {
    el.parent()
        .and_then(ElementRef::wrap)
        .map(element_text)
        .unwrap_or_default()
}

/// First descendant element whose class matches `class_re`, as text.
fn child_text_by_class(el: ElementRef<'_>, class_re: &Regex) -> Option<String> {
    el.descendants()
        .filter_map(ElementRef::wrap)
        .find(|child| {
            child.id() != el.id()
                && child
                    .value()
                    .attr("class")
                    .is_some_and(|c| class_re.is_match(c))
        })
        .map(element_text)
}

fn flatten_text(html: &Html) -> String {
    collapse_whitespace(&html.root_element().text().collect::<Vec<_>>().join(" "))
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_body() {
        let result = Document::parse("   \n ", "https://example.com");
        assert!(matches!(
            result,
            Err(ScrapeError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn flattens_text_with_collapsed_whitespace() {
        let doc = Document::parse(
            "<html><body><p>Base:\n   40in</p><p>Summit: 60in</p></body></html>",
            "https://example.com",
        )
        .unwrap();
        assert_eq!(doc.text(), "Base: 40in Summit: 60in");
    }

    #[test]
    fn infers_inches_from_document_prefix() {
        let doc = Document::parse(
            "<html><body>Snow stake reads 12in this morning</body></html>",
            "https://example.com",
        )
        .unwrap();
        assert!(doc.prefix_suggests_inches());

        let doc = Document::parse(
            "<html><body>Schneebericht: 50cm Neuschnee</body></html>",
            "https://example.com",
        )
        .unwrap();
        assert!(!doc.prefix_suggests_inches());
    }

    #[test]
    fn meta_tags_combine_name_and_property() {
        let doc = Document::parse(
            r#"<html><head>
                <meta property="og:description" content="Fresh snow: 10in overnight">
                <meta name="keywords" content="skiing">
            </head><body>x</body></html>"#,
            "https://example.com",
        )
        .unwrap();
        let tags = doc.meta_tags();
        assert!(tags
            .iter()
            .any(|t| t.name == "og:description" && t.content.contains("10in")));
    }

    #[test]
    fn jsonld_blocks_skip_invalid_json() {
        let doc = Document::parse(
            r#"<html><head>
                <script type="application/ld+json">{"@type": "SkiResort", "name": "Vail"}</script>
                <script type="application/ld+json">not json at all</script>
            </head><body>x</body></html>"#,
            "https://example.com",
        )
        .unwrap();
        let blocks = doc.jsonld_blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0]["@type"], "SkiResort");
    }

    #[test]
    fn attr_elements_expose_value_and_context() {
        let doc = Document::parse(
            r#"<html><body><div class="report"><span data-snow="8">8 inches</span></div></body></html>"#,
            "https://example.com",
        )
        .unwrap();
        let elements = doc.attr_elements("data-snow");
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].value, "8");
        assert_eq!(elements[0].text, "8 inches");
        assert_eq!(elements[0].parent_text, "8 inches");
    }

    #[test]
    fn class_elements_match_by_regex_and_find_label_value_children() {
        let doc = Document::parse(
            r#"<html><body>
                <div class="snow-report__stat">
                    <div class="snow-report__stat-label">Base Depth</div>
                    <div class="snow-report__stat-value">42"</div>
                </div>
                <div class="unrelated">nothing</div>
            </body></html>"#,
            "https://example.com",
        )
        .unwrap();
        let pattern = Regex::new("(?i)snow").unwrap();
        let elements = doc.class_elements(&pattern);
        // The outer stat div plus its two inner divs all carry a matching class.
        assert!(!elements.is_empty());
        let stat = &elements[0];
        assert_eq!(stat.label.as_deref(), Some("Base Depth"));
        assert_eq!(stat.value.as_deref(), Some("42\""));
    }

    #[test]
    fn class_elements_match_on_id() {
        let doc = Document::parse(
            r#"<html><body><div id="snowDepth">40in</div></body></html>"#,
            "https://example.com",
        )
        .unwrap();
        let pattern = Regex::new("(?i)snow|depth").unwrap();
        assert_eq!(doc.class_elements(&pattern).len(), 1);
    }
}
