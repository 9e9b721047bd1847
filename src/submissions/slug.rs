//! Slug derivation and website URL normalization

use regex::Regex;

/// Derive a URL-safe slug from a project name: lower-cased, runs of
/// non-alphanumeric characters collapsed to single hyphens, leading
/// and trailing hyphens trimmed.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let collapsed = Regex::new(r"[^a-z0-9]+")
        .expect("static pattern parses")
        .replace_all(&lowered, "-");
    collapsed.trim_matches('-').to_string()
}

/// Canonical form of a website URL for duplicate detection: scheme
/// dropped, host lower-cased with a leading "www." stripped, a single
/// trailing "/" removed. Stored in its own indexed column so duplicate
/// checks are an equality lookup, not a scan.
pub fn normalize_website_url(url: &str) -> String {
    let trimmed = url.trim();
    let without_scheme = strip_scheme(trimmed);

    let (host, path) = match without_scheme.find('/') {
        Some(i) => without_scheme.split_at(i),
        None => (without_scheme, ""),
    };

    let mut host = host.to_lowercase();
    if let Some(stripped) = host.strip_prefix("www.") {
        host = stripped.to_string();
    }

    let path = path.strip_suffix('/').unwrap_or(path);
    format!("{}{}", host, path)
}

fn strip_scheme(url: &str) -> &str {
    for scheme in ["https://", "http://"] {
        if url.len() >= scheme.len() && url[..scheme.len()].eq_ignore_ascii_case(scheme) {
            return &url[scheme.len()..];
        }
    }
    url
}

/// Shape check for submitted URLs: http(s), a plausible host, no
/// whitespace
pub fn is_valid_http_url(url: &str) -> bool {
    Regex::new(r"^https?://[A-Za-z0-9][A-Za-z0-9.-]*\.[A-Za-z]{2,}(:[0-9]+)?(/[^\s]*)?$")
        .expect("static pattern parses")
        .is_match(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("My AI Project"), "my-ai-project");
        assert_eq!(slugify("  Hello, World!  "), "hello-world");
        assert_eq!(slugify("Already-Slugged"), "already-slugged");
        assert_eq!(slugify("C++ & Rust!!"), "c-rust");
        assert_eq!(slugify("$$$"), "");
    }

    #[test]
    fn test_normalize_website_url() {
        assert_eq!(normalize_website_url("https://www.Example.com/"), "example.com");
        assert_eq!(normalize_website_url("http://example.com"), "example.com");
        assert_eq!(
            normalize_website_url("HTTPS://WWW.Example.COM/Path/"),
            "example.com/Path"
        );
        assert_eq!(
            normalize_website_url("https://app.example.com/x?q=1"),
            "app.example.com/x?q=1"
        );
    }

    #[test]
    fn test_equivalent_urls_normalize_identically() {
        let variants = [
            "https://www.example.com/",
            "http://example.com",
            "https://EXAMPLE.com/",
        ];
        let normalized: Vec<String> =
            variants.iter().map(|u| normalize_website_url(u)).collect();
        assert!(normalized.iter().all(|n| n == "example.com"));
    }

    #[test]
    fn test_url_validation() {
        assert!(is_valid_http_url("https://example.com"));
        assert!(is_valid_http_url("http://sub.example.co/path?q=1"));
        assert!(is_valid_http_url("https://example.com:8080/x"));
        assert!(!is_valid_http_url("ftp://example.com"));
        assert!(!is_valid_http_url("example.com"));
        assert!(!is_valid_http_url("https://no spaces.com"));
        assert!(!is_valid_http_url("https://nohost"));
    }
}
