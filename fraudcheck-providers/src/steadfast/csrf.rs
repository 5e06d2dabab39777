//! CSRF token extraction from the login page.

use std::sync::LazyLock;

use regex::Regex;

/// Any `<input ...>` tag.
static INPUT_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<input\b[^>]*>").expect("Invalid regex"));

/// Any `<meta ...>` tag.
static META_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("Invalid regex"));

/// `name` attribute naming the form token.
static TOKEN_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bname\s*=\s*["']_token["']"#).expect("Invalid regex"));

/// `name` attribute of the CSRF meta tag.
static META_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bname\s*=\s*["']csrf-token["']"#).expect("Invalid regex")
});

/// `value` attribute, either quote style.
static VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bvalue\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("Invalid regex")
});

/// `content` attribute, either quote style.
static CONTENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bcontent\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("Invalid regex")
});

/// Extracts the CSRF token from a login page.
///
/// Looks for the hidden `_token` form input first, in any attribute order,
/// then for `<meta name="csrf-token" content="...">`. Blank values count as
/// absent.
pub fn extract_csrf_token(html: &str) -> Option<String> {
    let from_input = INPUT_TAG_RE
        .find_iter(html)
        .map(|m| m.as_str())
        .filter(|tag| TOKEN_NAME_RE.is_match(tag))
        .find_map(|tag| attribute(&VALUE_RE, tag));

    from_input.or_else(|| {
        META_TAG_RE
            .find_iter(html)
            .map(|m| m.as_str())
            .filter(|tag| META_NAME_RE.is_match(tag))
            .find_map(|tag| attribute(&CONTENT_RE, tag))
    })
}

fn attribute(re: &Regex, tag: &str) -> Option<String> {
    let caps = re.captures(tag)?;
    let value = caps.get(1).or_else(|| caps.get(2))?.as_str().trim();
    (!value.is_empty()).then(|| value.to_string())
}
