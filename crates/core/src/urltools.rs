use url::Url;

/// Resolve `link` against `base` and strip any fragment.
pub fn normalize(base: &Url, link: &str) -> Option<Url> {
    let mut joined = base.join(link).ok()?;
    joined.set_fragment(None);
    Some(joined)
}

/// Lowercase scheme/host, force non-http(s) schemes to http, default an
/// empty path to "/", keep the query, drop fragment and userinfo.
pub fn canonicalize(url: &Url) -> Url {
    let mut out = url.clone();
    let _ = out.set_scheme(if matches!(url.scheme(), "http" | "https") {
        url.scheme()
    } else {
        "http"
    });
    if let Some(host) = url.host_str() {
        let _ = out.set_host(Some(&host.to_lowercase()));
    }
    out.set_fragment(None);
    let _ = out.set_username("");
    let _ = out.set_password(None);
    if out.path().is_empty() {
        out.set_path("/");
    }
    out
}

/// Exact authority (host + optional port) equality against `base`.
pub fn same_host(url: &Url, base: &Url) -> bool {
    url.host_str() == base.host_str() && url.port_or_known_default() == base.port_or_known_default()
}

/// True for http, https, or an empty (already-resolved) scheme.
pub fn allowed_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https" | "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn normalize_relative_path() {
        let base = u("https://example.com/a/b");
        let n = normalize(&base, "../c").unwrap();
        assert_eq!(n.as_str(), "https://example.com/c");
    }

    #[test]
    fn normalize_strips_fragment() {
        let base = u("https://example.com/a");
        let n = normalize(&base, "/x#section").unwrap();
        assert_eq!(n.fragment(), None);
        assert_eq!(n.as_str(), "https://example.com/x");
    }

    #[test]
    fn normalize_protocol_relative() {
        let base = u("https://example.com/a");
        let n = normalize(&base, "//cdn.example.com/y").unwrap();
        assert_eq!(n.host_str(), Some("cdn.example.com"));
        assert_eq!(n.scheme(), "https");
    }

    #[test]
    fn normalize_fragment_only_resolves_to_base() {
        let base = u("https://example.com/a");
        let n = normalize(&base, "#top").unwrap();
        assert_eq!(n.as_str(), "https://example.com/a");
    }

    #[test]
    fn canonicalize_lowercases_host_and_defaults_path() {
        let url = u("HTTP://Example.COM");
        let c = canonicalize(&url);
        assert_eq!(c.host_str(), Some("example.com"));
        assert_eq!(c.path(), "/");
    }

    #[test]
    fn canonicalize_forces_unknown_scheme_to_http() {
        let url = u("ftp://example.com/file");
        let c = canonicalize(&url);
        assert_eq!(c.scheme(), "http");
    }

    #[test]
    fn same_host_requires_exact_authority() {
        let base = u("https://example.com/");
        assert!(same_host(&u("https://example.com/x"), &base));
        assert!(!same_host(&u("https://www.example.com/x"), &base));
        assert!(!same_host(&u("https://example.com:8080/x"), &base));
    }

    #[test]
    fn allowed_scheme_accepts_http_and_https() {
        assert!(allowed_scheme(&u("http://example.com")));
        assert!(allowed_scheme(&u("https://example.com")));
        assert!(!allowed_scheme(&u("mailto:a@example.com")));
    }
}
