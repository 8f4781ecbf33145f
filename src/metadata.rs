//! Metadata and on-page SEO signals read from a parsed document.

use std::collections::{BTreeMap, HashSet};

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use url::Url;

// Selectors are compiled once; all of them are static and valid.
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("Failed to parse title selector"));
static META_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta").expect("Failed to parse meta selector"));
static H1_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1").expect("Failed to parse h1 selector"));
static H2_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h2").expect("Failed to parse h2 selector"));
static H3_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h3").expect("Failed to parse h3 selector"));
static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("Failed to parse img selector"));
static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("Failed to parse anchor selector"));
static CANONICAL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("link[rel][href]").expect("Failed to parse link selector"));
static SCHEMA_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script[type]").expect("Failed to parse script selector"));
static HTML_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("html").expect("Failed to parse html selector"));

/// The three basic SEO fields of a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metadata {
    pub title: Option<String>,
    /// `meta[name=keywords]` split on commas, in document order.
    pub keywords: Vec<String>,
    pub description: Option<String>,
}

impl Metadata {
    pub fn title_len(&self) -> usize {
        self.title.as_deref().map_or(0, |t| t.chars().count())
    }

    pub fn description_len(&self) -> usize {
        self.description.as_deref().map_or(0, |d| d.chars().count())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Headings {
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
}

/// Everything else on the page a search engine looks at.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageSignals {
    pub headings: Headings,
    pub images_total: usize,
    pub images_with_alt: usize,
    pub internal_links: usize,
    pub external_links: usize,
    pub canonical_url: Option<String>,
    pub robots: Option<String>,
    pub open_graph: BTreeMap<String, String>,
    pub twitter: BTreeMap<String, String>,
    pub language: Option<String>,
    pub has_viewport: bool,
    pub schema_blocks: usize,
}

impl PageSignals {
    pub fn images_without_alt(&self) -> usize {
        self.images_total - self.images_with_alt
    }

    /// Share of images carrying alt text, `None` when the page has no images.
    pub fn alt_ratio(&self) -> Option<f64> {
        (self.images_total > 0).then(|| self.images_with_alt as f64 / self.images_total as f64)
    }
}

/// Extract title, keywords and description from raw HTML.
pub fn extract_metadata(html: &str) -> Metadata {
    let document = Html::parse_document(html);
    metadata_from_document(&document)
}

pub fn metadata_from_document(document: &Html) -> Metadata {
    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty());

    let keywords = meta_content(document, "keywords")
        .map(|content| split_keywords(&content))
        .unwrap_or_default();

    let description = meta_content(document, "description")
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty());

    Metadata {
        title,
        keywords,
        description,
    }
}

/// Extract headings, images, links and social/technical tags.
///
/// `base` resolves relative links and decides which of them are internal.
pub fn extract_signals(document: &Html, base: &Url) -> PageSignals {
    let headings = Headings {
        h1: heading_texts(document, &H1_SELECTOR),
        h2: heading_texts(document, &H2_SELECTOR),
        h3: heading_texts(document, &H3_SELECTOR),
    };

    let mut images_total = 0;
    let mut images_with_alt = 0;
    for image in document.select(&IMG_SELECTOR) {
        images_total += 1;
        if image.value().attr("alt").is_some_and(|alt| !alt.trim().is_empty()) {
            images_with_alt += 1;
        }
    }

    let (internal_links, external_links) = count_links(document, base);

    let canonical_url = document
        .select(&CANONICAL_SELECTOR)
        .find(|link| {
            link.value()
                .attr("rel")
                .is_some_and(|rel| rel.split_whitespace().any(|r| r.eq_ignore_ascii_case("canonical")))
        })
        .and_then(|link| link.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty());

    let mut open_graph = BTreeMap::new();
    let mut twitter = BTreeMap::new();
    let mut has_viewport = false;
    for meta in document.select(&META_SELECTOR) {
        let element = meta.value();
        let content = element.attr("content").unwrap_or_default().trim();
        if let Some(property) = element.attr("property") {
            if property.starts_with("og:") {
                open_graph
                    .entry(property.to_string())
                    .or_insert_with(|| content.to_string());
            }
        }
        if let Some(name) = element.attr("name") {
            if name.starts_with("twitter:") {
                twitter
                    .entry(name.to_string())
                    .or_insert_with(|| content.to_string());
            }
            if name.eq_ignore_ascii_case("viewport") {
                has_viewport = true;
            }
        }
    }

    let schema_blocks = document
        .select(&SCHEMA_SELECTOR)
        .filter(|script| {
            script
                .value()
                .attr("type")
                .is_some_and(|t| t.trim().eq_ignore_ascii_case("application/ld+json"))
        })
        .count();

    let language = document
        .select(&HTML_SELECTOR)
        .next()
        .and_then(|html| html.value().attr("lang"))
        .map(|lang| lang.trim().to_string())
        .filter(|lang| !lang.is_empty());

    PageSignals {
        headings,
        images_total,
        images_with_alt,
        internal_links,
        external_links,
        canonical_url,
        robots: meta_content(document, "robots"),
        open_graph,
        twitter,
        language,
        has_viewport,
        schema_blocks,
    }
}

/// `content` of the first `<meta name=...>` that matches, ignoring case, and
/// carries a `content` attribute.
fn meta_content(document: &Html, name: &str) -> Option<String> {
    document
        .select(&META_SELECTOR)
        .filter(|meta| {
            meta.value()
                .attr("name")
                .is_some_and(|n| n.trim().eq_ignore_ascii_case(name))
        })
        .find_map(|meta| meta.value().attr("content"))
        .map(str::to_string)
}

fn split_keywords(content: &str) -> Vec<String> {
    content
        .split(',')
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(str::to_string)
        .collect()
}

fn heading_texts(document: &Html, selector: &Selector) -> Vec<String> {
    document.select(selector).map(collapsed_text).collect()
}

fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn count_links(document: &Html, base: &Url) -> (usize, usize) {
    let mut internal = HashSet::new();
    let mut external = HashSet::new();

    for anchor in document.select(&LINK_SELECTOR) {
        let Some(href) = anchor.value().attr("href").map(str::trim) else {
            continue;
        };
        if href.is_empty() || href.starts_with('#') {
            continue;
        }
        let Ok(mut resolved) = base.join(href) else {
            continue;
        };
        if !matches!(resolved.scheme(), "http" | "https") {
            continue;
        }
        resolved.set_fragment(None);

        if resolved.host_str() == base.host_str() {
            internal.insert(resolved);
        } else {
            external.insert(resolved);
        }
    }

    (internal.len(), external.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <title>Rust SEO Analysis Tool</title>
  <meta name="Keywords" content="seo, rust , , analysis">
  <meta name="description" content="Analyze any page.">
  <meta name="description" content="Second description is ignored.">
  <meta name="viewport" content="width=device-width">
  <meta name="robots" content="index, follow">
  <meta property="og:title" content="OG Title">
  <meta name="twitter:card" content="summary">
  <link rel="canonical" href="https://example.com/tool">
  <script type="application/ld+json">{"@type": "WebSite"}</script>
</head>
<body>
  <h1>  Main   heading </h1>
  <h2>First</h2><h2>Second</h2>
  <img src="a.png" alt="A chart"><img src="b.png" alt=" "><img src="c.png">
  <a href="/about">About</a>
  <a href="https://example.com/about#team">Team</a>
  <a href="https://other.org/">Other</a>
  <a href="mailto:hi@example.com">Mail</a>
  <a href="#top">Top</a>
</body>
</html>"##;

    #[test]
    fn extracts_title_keywords_and_description() {
        let metadata = extract_metadata(PAGE);
        assert_eq!(metadata.title.as_deref(), Some("Rust SEO Analysis Tool"));
        assert_eq!(metadata.keywords, vec!["seo", "rust", "analysis"]);
        assert_eq!(metadata.description.as_deref(), Some("Analyze any page."));
        assert_eq!(metadata.title_len(), 22);
    }

    #[test]
    fn title_is_returned_exactly() {
        let html = "<html><head><title>Hello, World! – Ünïcode</title></head><body></body></html>";
        assert_eq!(
            extract_metadata(html).title.as_deref(),
            Some("Hello, World! – Ünïcode")
        );
    }

    #[test]
    fn missing_tags_are_absent_not_errors() {
        let metadata = extract_metadata("<html><body><p>No head at all</p></body></html>");
        assert_eq!(metadata.title, None);
        assert!(metadata.keywords.is_empty());
        assert_eq!(metadata.description, None);
    }

    #[test]
    fn meta_without_content_does_not_shadow_later_tag() {
        let html = r#"<head>
            <meta name="description">
            <meta name="keywords">
            <meta name="description" content="Real description">
            <meta name="keywords" content="rust, seo">
        </head>"#;
        let metadata = extract_metadata(html);
        assert_eq!(metadata.description.as_deref(), Some("Real description"));
        assert_eq!(metadata.keywords, vec!["rust", "seo"]);
    }

    #[test]
    fn first_title_wins() {
        let html = "<title>First</title><title>Second</title>";
        assert_eq!(extract_metadata(html).title.as_deref(), Some("First"));
    }

    #[test]
    fn extracts_page_signals() {
        let document = Html::parse_document(PAGE);
        let base = Url::parse("https://example.com/tool").unwrap();
        let signals = extract_signals(&document, &base);

        assert_eq!(signals.headings.h1, vec!["Main heading"]);
        assert_eq!(signals.headings.h2.len(), 2);
        assert_eq!(signals.images_total, 3);
        assert_eq!(signals.images_with_alt, 1);
        assert_eq!(signals.images_without_alt(), 2);
        // "/about" and "/about#team" resolve to the same page.
        assert_eq!(signals.internal_links, 1);
        assert_eq!(signals.external_links, 1);
        assert_eq!(signals.canonical_url.as_deref(), Some("https://example.com/tool"));
        assert_eq!(signals.robots.as_deref(), Some("index, follow"));
        assert_eq!(signals.open_graph.get("og:title").map(String::as_str), Some("OG Title"));
        assert_eq!(signals.twitter.get("twitter:card").map(String::as_str), Some("summary"));
        assert_eq!(signals.language.as_deref(), Some("en"));
        assert!(signals.has_viewport);
        assert_eq!(signals.schema_blocks, 1);
    }

    #[test]
    fn alt_ratio_without_images_is_none() {
        let signals = PageSignals::default();
        assert_eq!(signals.alt_ratio(), None);
    }
}
