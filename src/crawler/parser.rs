//! HTML parsing and link extraction
//!
//! Parsing lives behind the [`LinkSource`] capability: anything that can list
//! the href-like references of its link-like elements can feed the
//! [`LinkExtractor`]. [`ParsedPage`] implements it with `scraper`.

use crate::config::CrawlConfig;
use crate::url::{is_fetchable_scheme, is_same_domain};
use scraper::{Html, Selector};
use url::Url;

/// Selectors for link-like elements, scanned in this order
const LINK_SELECTORS: &[&str] = &["a[href]", "link[href]"];

/// Capability to enumerate the references a document links to
pub trait LinkSource {
    /// Raw `href` values of anchor- and link-type elements, in document order
    fn link_references(&self) -> Vec<String>;
}

/// A parsed HTML document
pub struct ParsedPage {
    document: Html,
}

impl ParsedPage {
    /// Parses raw markup; malformed input is repaired rather than rejected
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// Serializes the parsed document back to markup
    pub fn to_html(&self) -> String {
        self.document.html()
    }
}

impl LinkSource for ParsedPage {
    fn link_references(&self) -> Vec<String> {
        let mut references = Vec::new();

        for raw in LINK_SELECTORS {
            let Ok(selector) = Selector::parse(raw) else {
                continue;
            };
            for element in self.document.select(&selector) {
                if let Some(href) = element.value().attr("href") {
                    references.push(href.to_string());
                }
            }
        }

        references
    }
}

/// Produces the same-domain, fetchable absolute URLs a page refers to
///
/// # Filtering Rules
///
/// **Include:** references that resolve against the current page to an
/// http(s) URL on the crawl's network location.
///
/// **Exclude:**
/// - any reference containing `#`, including same-page anchors
/// - references to another host or port
/// - non-http(s) schemes (`mailto:`, `javascript:`, ...)
/// - references that fail to resolve
///
/// Duplicates are kept; the visited set deduplicates.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    base_domain: String,
}

impl LinkExtractor {
    pub fn new(base_domain: impl Into<String>) -> Self {
        Self {
            base_domain: base_domain.into(),
        }
    }

    pub fn from_config(config: &CrawlConfig) -> Self {
        Self::new(config.base_domain())
    }

    /// Extracts followable links from `source`, in the source's order
    ///
    /// # Example
    ///
    /// ```
    /// use page_harvester::crawler::{LinkExtractor, ParsedPage};
    /// use url::Url;
    ///
    /// let page = ParsedPage::parse(r#"<a href="/a">A</a><a href="http://other.test/b">B</a>"#);
    /// let extractor = LinkExtractor::new("x.test");
    /// let links = extractor.extract(&page, &Url::parse("http://x.test/").unwrap());
    ///
    /// assert_eq!(links.len(), 1);
    /// assert_eq!(links[0].as_str(), "http://x.test/a");
    /// ```
    pub fn extract(&self, source: &impl LinkSource, current_url: &Url) -> Vec<Url> {
        source
            .link_references()
            .iter()
            .filter_map(|reference| self.resolve(reference, current_url))
            .collect()
    }

    fn resolve(&self, reference: &str, current_url: &Url) -> Option<Url> {
        if reference.contains('#') {
            tracing::trace!("Skipping fragment reference {}", reference);
            return None;
        }

        let absolute = match current_url.join(reference) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Failed to resolve {} against {}: {}", reference, current_url, e);
                return None;
            }
        };

        if !is_fetchable_scheme(&absolute) || !is_same_domain(&absolute, &self.base_domain) {
            return None;
        }

        Some(absolute)
    }
}
