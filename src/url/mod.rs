//! URL handling module for Page-Harvester
//!
//! This module provides the network-location and scheme checks shared by the
//! path mapper and the link extractor.

mod domain;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use domain::{is_same_domain, network_location};

/// Returns true if the URL uses a scheme the fetcher can retrieve
pub fn is_fetchable_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Parses an absolute http(s) URL that carries a host
///
/// # Examples
///
/// ```
/// use page_harvester::url::parse_absolute;
///
/// assert!(parse_absolute("http://quotes.toscrape.com/page/2/").is_ok());
/// assert!(parse_absolute("/relative/path").is_err());
/// assert!(parse_absolute("ftp://example.com/file").is_err());
/// ```
pub fn parse_absolute(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if !is_fetchable_scheme(&url) {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetchable_schemes() {
        assert!(is_fetchable_scheme(&Url::parse("http://example.com/").unwrap()));
        assert!(is_fetchable_scheme(&Url::parse("https://example.com/").unwrap()));
        assert!(!is_fetchable_scheme(&Url::parse("ftp://example.com/").unwrap()));
        assert!(!is_fetchable_scheme(
            &Url::parse("javascript:void(0)").unwrap()
        ));
    }

    #[test]
    fn test_parse_absolute_errors() {
        assert!(matches!(
            parse_absolute("no scheme here"),
            Err(UrlError::Parse(_))
        ));
        assert!(matches!(
            parse_absolute("ftp://example.com/"),
            Err(UrlError::InvalidScheme(_))
        ));
    }

    #[test]
    fn test_parse_absolute_ok() {
        let url = parse_absolute("https://example.com/a/b").unwrap();
        assert_eq!(url.path(), "/a/b");
    }
}
