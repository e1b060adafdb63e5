// crawl/extract.rs — visible-content extraction from fetched HTML.
//
// Parsing happens synchronously: `scraper::Html` is not `Send`, so the
// document must never live across an await point. Callers parse into a
// plain `PageDocument` and drop the DOM before the next fetch.

use std::collections::HashMap;

use scraper::{Html, Node, Selector};

/// Maximum number of characters of visible text kept per page.
pub const MAX_TEXT_CHARS: usize = 20_000;

/// Plain-data view of one parsed page: owned strings only, `Send`-safe.
#[derive(Debug, Clone)]
pub struct PageDocument {
    pub title: String,
    pub meta: HashMap<String, String>,
    pub text: String,
    /// Raw `href` attribute values, document order, unnormalized.
    pub hrefs: Vec<String>,
}

impl PageDocument {
    pub fn parse(html: &str) -> Self {
        let doc = Html::parse_document(html);

        let title_sel = Selector::parse("title").unwrap();
        let title = doc
            .select(&title_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        let meta_sel = Selector::parse("meta").unwrap();
        let mut meta = HashMap::new();
        for el in doc.select(&meta_sel) {
            // Prefer `name`, fall back to `property` (og:* tags).
            let key = match el.value().attr("name").or_else(|| el.value().attr("property")) {
                Some(k) => k.to_string(),
                None => continue,
            };
            let value = el.value().attr("content").unwrap_or("").to_string();
            meta.insert(key, value);
        }

        let link_sel = Selector::parse("a[href]").unwrap();
        let hrefs = doc
            .select(&link_sel)
            .filter_map(|el| el.value().attr("href"))
            .map(|h| h.to_string())
            .collect();

        Self {
            title,
            meta,
            text: visible_text(&doc),
            hrefs,
        }
    }
}

/// Joins trimmed text nodes with newlines, skipping script/style/noscript
/// subtrees, truncated to the first [`MAX_TEXT_CHARS`] characters.
fn visible_text(doc: &Html) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for node in doc.tree.root().descendants() {
        if let Node::Text(text) = node.value() {
            let hidden = node.ancestors().any(|a| match a.value() {
                Node::Element(el) => matches!(el.name(), "script" | "style" | "noscript"),
                _ => false,
            });
            if hidden {
                continue;
            }
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed);
            }
        }
    }
    truncate_chars(&parts.join("\n"), MAX_TEXT_CHARS)
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <html>
          <head>
            <title>  Acme Widgets  </title>
            <meta name="description" content="widgets for all">
            <meta property="og:title" content="Acme">
            <meta content="orphan tag with no key">
            <style>.hidden { display: none }</style>
          </head>
          <body>
            <script>var tracked = true;</script>
            <noscript>enable javascript</noscript>
            <h1>Welcome</h1>
            <p>We sell <a href="/widgets">widgets</a> and <a href="https://partners.example.com/x#top">more</a>.</p>
          </body>
        </html>"#;

    #[test]
    fn title_is_trimmed() {
        let doc = PageDocument::parse(SAMPLE);
        assert_eq!(doc.title, "Acme Widgets");
    }

    #[test]
    fn missing_title_yields_empty_string() {
        let doc = PageDocument::parse("<html><body>hi</body></html>");
        assert_eq!(doc.title, "");
    }

    #[test]
    fn meta_prefers_name_over_property() {
        let doc = PageDocument::parse(SAMPLE);
        assert_eq!(doc.meta.get("description").unwrap(), "widgets for all");
        assert_eq!(doc.meta.get("og:title").unwrap(), "Acme");
        assert_eq!(doc.meta.len(), 2);
    }

    #[test]
    fn script_style_noscript_are_invisible() {
        let doc = PageDocument::parse(SAMPLE);
        assert!(doc.text.contains("Welcome"));
        assert!(doc.text.contains("widgets"));
        assert!(!doc.text.contains("tracked"));
        assert!(!doc.text.contains("display: none"));
        assert!(!doc.text.contains("enable javascript"));
    }

    #[test]
    fn hrefs_collected_in_document_order() {
        let doc = PageDocument::parse(SAMPLE);
        assert_eq!(
            doc.hrefs,
            vec!["/widgets", "https://partners.example.com/x#top"]
        );
    }

    #[test]
    fn text_truncates_on_char_boundary() {
        let body: String = "é".repeat(MAX_TEXT_CHARS + 50);
        let html = format!("<html><body><p>{body}</p></body></html>");
        let doc = PageDocument::parse(&html);
        assert_eq!(doc.text.chars().count(), MAX_TEXT_CHARS);
    }
}
