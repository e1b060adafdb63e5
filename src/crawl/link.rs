// crawl/link.rs — hyperlink reference classification and canonicalization.

use url::Url;

/// Schemes (and the bare-fragment prefix) that never navigate to a page.
const BAD_PREFIXES: &[&str] = &[
    "mailto:", "tel:", "javascript:", "whatsapp:", "viber:", "tg:", "#", "sms:", "skype:",
];

/// Canonicalizes a raw `href` against the page it appeared on.
///
/// Returns `None` for empty, fragment-only, or non-navigable references.
/// Already-absolute references are passed through with only the fragment
/// removed — no trailing-slash or query canonicalization. Relative
/// references resolve against `base`; a reference the `url` crate cannot
/// join yields `None` rather than an error.
pub fn normalize_link(base: &Url, href: Option<&str>) -> Option<String> {
    let href = href?.trim();
    if href.is_empty() {
        return None;
    }

    if BAD_PREFIXES.iter().any(|p| href.starts_with(p)) {
        return None;
    }

    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(strip_fragment(href).to_string());
    }

    if href.starts_with("//") {
        return Some(format!("https:{}", strip_fragment(href)));
    }

    base.join(strip_fragment(href))
        .ok()
        .map(|u| u.to_string())
}

fn strip_fragment(href: &str) -> &str {
    match href.find('#') {
        Some(idx) => &href[..idx],
        None => href,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/docs/page").unwrap()
    }

    #[test]
    fn empty_and_whitespace_rejected() {
        assert_eq!(normalize_link(&base(), None), None);
        assert_eq!(normalize_link(&base(), Some("")), None);
        assert_eq!(normalize_link(&base(), Some("   ")), None);
    }

    #[test]
    fn non_navigable_schemes_rejected() {
        for href in [
            "mailto:a@b.com",
            "tel:+15551234",
            "javascript:void(0)",
            "whatsapp:send",
            "viber:chat",
            "tg:resolve",
            "#section",
            "sms:12345",
            "skype:someone",
        ] {
            assert_eq!(normalize_link(&base(), Some(href)), None, "href: {href}");
        }
    }

    #[test]
    fn absolute_passes_through_minus_fragment() {
        assert_eq!(
            normalize_link(&base(), Some("https://other.com/a/b?q=1#frag")),
            Some("https://other.com/a/b?q=1".to_string())
        );
        assert_eq!(
            normalize_link(&base(), Some("http://other.com/x")),
            Some("http://other.com/x".to_string())
        );
    }

    #[test]
    fn absolute_is_idempotent() {
        let once = normalize_link(&base(), Some("https://example.com/a%20b?x=2&y=1")).unwrap();
        let twice = normalize_link(&base(), Some(once.as_str())).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn protocol_relative_gets_https() {
        assert_eq!(
            normalize_link(&base(), Some("//cdn.example.com/lib.js#v2")),
            Some("https://cdn.example.com/lib.js".to_string())
        );
    }

    #[test]
    fn relative_resolves_against_base() {
        assert_eq!(
            normalize_link(&base(), Some("../about#team")),
            Some("https://example.com/about".to_string())
        );
        assert_eq!(
            normalize_link(&base(), Some("/pricing")),
            Some("https://example.com/pricing".to_string())
        );
        assert_eq!(
            normalize_link(&base(), Some("  child  ")),
            Some("https://example.com/docs/child".to_string())
        );
    }

    #[test]
    fn resolved_links_carry_no_fragment() {
        let out = normalize_link(&base(), Some("/a/b#frag")).unwrap();
        assert!(!out.contains('#'));
    }
}
