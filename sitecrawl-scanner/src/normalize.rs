//! Syntactic href resolution.
//!
//! Only three href shapes are recognised: absolute `http(s)` URLs,
//! root-relative paths and bare relative paths. Bare relative paths are
//! resolved against the site root, not against the directory of the page
//! they appear on. No percent-decoding, query normalization or fragment
//! stripping happens here.

use crate::error::{Result, ScanError};
use url::Url;

/// Resolve `href` against `base_url` into an absolute URL string.
pub fn normalize(base_url: &str, href: &str) -> Result<String> {
    if is_absolute(href) {
        return Ok(href.to_string());
    }

    let origin = origin_of(base_url)?;
    if href.starts_with('/') {
        Ok(format!("{}{}", origin, href))
    } else {
        Ok(format!("{}/{}", origin, href))
    }
}

fn is_absolute(href: &str) -> bool {
    href.starts_with("http://") || href.starts_with("https://")
}

/// `scheme://netloc` of a URL.
pub fn origin_of(base_url: &str) -> Result<String> {
    let parsed = Url::parse(base_url)
        .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", base_url, e)))?;
    let netloc = netloc(&parsed)
        .ok_or_else(|| ScanError::InvalidUrl(format!("{}: URL has no host", base_url)))?;

    Ok(format!("{}://{}", parsed.scheme(), netloc))
}

/// Host plus explicit port, e.g. `localhost:8000`.
///
/// This is the canonical authority used for scope checks, not the raw one:
/// userinfo is dropped, the host is lowercased and a port equal to the
/// scheme's default is omitted. `http://User@Example.com:80/` and
/// `http://example.com/` therefore share a scope.
pub fn netloc(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host.to_string()),
    }
}

/// Netloc of a URL string, or `None` if it does not parse or has no host.
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url).ok().as_ref().and_then(netloc)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://localhost:8000";

    #[test]
    fn test_absolute_href_is_unchanged() {
        let href = "http://localhost:8000/contact";
        assert_eq!(normalize(BASE, href).unwrap(), href);

        let other = "https://external.example.com/x?a=1#frag";
        assert_eq!(normalize(BASE, other).unwrap(), other);
    }

    #[test]
    fn test_root_relative_href() {
        assert_eq!(
            normalize(BASE, "/about").unwrap(),
            "http://localhost:8000/about"
        );
    }

    #[test]
    fn test_bare_relative_href_resolves_against_site_root() {
        assert_eq!(
            normalize("http://localhost:8000/docs/index.html", "other.html").unwrap(),
            "http://localhost:8000/other.html"
        );
    }

    #[test]
    fn test_empty_href() {
        assert_eq!(normalize(BASE, "").unwrap(), "http://localhost:8000/");
    }

    #[test]
    fn test_scheme_follows_base() {
        assert_eq!(
            normalize("https://example.com/a/b", "/c").unwrap(),
            "https://example.com/c"
        );
    }

    #[test]
    fn test_query_and_fragment_are_kept() {
        assert_eq!(
            normalize(BASE, "/search?q=rust#results").unwrap(),
            "http://localhost:8000/search?q=rust#results"
        );
        assert_eq!(
            normalize(BASE, "#top").unwrap(),
            "http://localhost:8000/#top"
        );
    }

    #[test]
    fn test_protocol_relative_href_is_treated_as_root_relative() {
        assert_eq!(
            normalize(BASE, "//cdn.example.com/lib.js").unwrap(),
            "http://localhost:8000//cdn.example.com/lib.js"
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for href in ["/about", "other.html", "", "http://localhost:8000/contact"] {
            let once = normalize(BASE, href).unwrap();
            let twice = normalize(BASE, &once).unwrap();
            assert_eq!(once, twice, "href {:?} is not idempotent", href);
        }
    }

    #[test]
    fn test_invalid_base_is_an_error() {
        assert!(matches!(
            normalize("not a url", "/about"),
            Err(ScanError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_invalid_base_is_fine_for_absolute_href() {
        assert_eq!(
            normalize("not a url", "https://example.com/").unwrap(),
            "https://example.com/"
        );
    }

    #[test]
    fn test_host_of_keeps_explicit_port() {
        assert_eq!(host_of(BASE).as_deref(), Some("localhost:8000"));
        assert_eq!(host_of("http://example.com/x").as_deref(), Some("example.com"));
        assert_eq!(host_of("http://example.com:80/x").as_deref(), Some("example.com"));
        assert_eq!(host_of("http://[::1]:3000/").as_deref(), Some("[::1]:3000"));
        assert_eq!(host_of("mailto:someone@example.com"), None);
        assert_eq!(host_of("garbage"), None);
    }

    #[test]
    fn test_host_of_is_canonical_authority() {
        let canonical = host_of("http://example.com/");
        assert_eq!(host_of("http://user:pw@example.com/"), canonical);
        assert_eq!(host_of("http://EXAMPLE.com/"), canonical);
        assert_eq!(host_of("http://Example.COM:80/a"), canonical);
        assert_eq!(host_of("https://example.com:443/"), canonical);
        assert_eq!(host_of("https://example.com:80/").as_deref(), Some("example.com:80"));
    }
}
