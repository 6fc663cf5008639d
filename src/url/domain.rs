use url::Url;

/// Extracts the network location (`host[:port]`) from a URL
///
/// The host is lowercased by the URL parser. A port is only included when it
/// is written explicitly and differs from the scheme's default, so
/// `http://example.com:80/` and `http://example.com/` share a location.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use page_harvester::url::network_location;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(network_location(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(network_location(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn network_location(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host.to_string()),
    }
}

/// Returns true if `url` lives on the given network location
pub fn is_same_domain(url: &Url, base_domain: &str) -> bool {
    network_location(url).is_some_and(|location| location == base_domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_domain() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(network_location(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_subdomain_is_distinct() {
        let url = Url::parse("https://blog.example.com/post").unwrap();
        assert_eq!(network_location(&url), Some("blog.example.com".to_string()));
        assert!(!is_same_domain(&url, "example.com"));
    }

    #[test]
    fn test_explicit_port_kept() {
        let url = Url::parse("https://example.com:8443/").unwrap();
        assert_eq!(network_location(&url), Some("example.com:8443".to_string()));
        assert!(!is_same_domain(&url, "example.com"));
    }

    #[test]
    fn test_default_port_dropped() {
        let url = Url::parse("http://example.com:80/page").unwrap();
        assert_eq!(network_location(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_uppercase_converted_to_lowercase() {
        let url = Url::parse("https://Example.COM/").unwrap();
        assert!(is_same_domain(&url, "example.com"));
    }

    #[test]
    fn test_no_host() {
        let url = Url::parse("mailto:someone@example.com").unwrap();
        assert_eq!(network_location(&url), None);
        assert!(!is_same_domain(&url, "example.com"));
    }
}
