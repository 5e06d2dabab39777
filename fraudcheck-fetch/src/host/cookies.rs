//! Minimal cookie jar for web-session couriers.
//!
//! Only name/value pairs are tracked. Attributes such as `Path` or `Domain`
//! are ignored because every session cookie is sent back to the same host.

use std::collections::BTreeMap;

use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};

/// Name to value map of session cookies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CookieJar(BTreeMap<String, String>);

impl CookieJar {
    /// Creates an empty jar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a cookie, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Removes a cookie.
    pub fn remove(&mut self, name: &str) {
        self.0.remove(name);
    }

    /// Returns a cookie value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Number of cookies.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the jar holds no cookies.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merges `other` into this jar. Values from `other` win.
    pub fn merge(&mut self, other: &CookieJar) {
        for (name, value) in &other.0 {
            self.0.insert(name.clone(), value.clone());
        }
    }

    /// Renders the jar as a `Cookie` request header value.
    pub fn to_header(&self) -> String {
        self.0
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Applies one `Set-Cookie` header value.
    ///
    /// A cookie with `Max-Age=0` or a `deleted` value is removed.
    pub fn apply_set_cookie(&mut self, header: &str) {
        let mut parts = header.split(';');
        let Some((name, value)) = parts.next().and_then(|pair| pair.split_once('=')) else {
            return;
        };
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        let value = value.trim().trim_matches('"');

        let expired = parts.any(|attr| {
            attr.split_once('=').is_some_and(|(k, v)| {
                k.trim().eq_ignore_ascii_case("max-age") && v.trim().starts_with(['0', '-'])
            })
        });

        if expired || value == "deleted" {
            self.remove(name);
        } else {
            self.insert(name, value);
        }
    }

    /// Builds a jar from a sequence of `Set-Cookie` header values.
    pub fn from_set_cookie<'a>(headers: impl IntoIterator<Item = &'a HeaderValue>) -> Self {
        let mut jar = Self::new();
        for header in headers {
            if let Ok(raw) = header.to_str() {
                jar.apply_set_cookie(raw);
            }
        }
        jar
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CookieJar {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_cookie_parsing() {
        let mut jar = CookieJar::new();
        jar.apply_set_cookie("XSRF-TOKEN=abc%3D; expires=Thu, 01 Jan 2099 00:00:00 GMT; path=/");
        jar.apply_set_cookie("steadfast_session=s1; path=/; httponly; samesite=lax");
        assert_eq!(jar.get("XSRF-TOKEN"), Some("abc%3D"));
        assert_eq!(jar.get("steadfast_session"), Some("s1"));
    }

    #[test]
    fn test_later_values_win_on_merge() {
        let mut jar: CookieJar = [("session", "old"), ("xsrf", "x")].into_iter().collect();
        let newer: CookieJar = [("session", "new")].into_iter().collect();
        jar.merge(&newer);
        assert_eq!(jar.get("session"), Some("new"));
        assert_eq!(jar.get("xsrf"), Some("x"));
    }

    #[test]
    fn test_expired_cookie_is_removed() {
        let mut jar: CookieJar = [("session", "s1")].into_iter().collect();
        jar.apply_set_cookie("session=gone; Max-Age=0; path=/");
        assert!(jar.is_empty());
    }

    #[test]
    fn test_malformed_set_cookie_ignored() {
        let mut jar = CookieJar::new();
        jar.apply_set_cookie("no-equals-sign");
        jar.apply_set_cookie("=value");
        assert!(jar.is_empty());
    }

    #[test]
    fn test_header_rendering() {
        let jar: CookieJar = [("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(jar.to_header(), "a=1; b=2");
    }

    #[test]
    fn test_from_header_values() {
        let values = [
            HeaderValue::from_static("a=1; path=/"),
            HeaderValue::from_static("b=2"),
        ];
        let jar = CookieJar::from_set_cookie(values.iter());
        assert_eq!(jar.len(), 2);
    }
}
