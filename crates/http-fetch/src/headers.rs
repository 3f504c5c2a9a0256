//! Header collection helpers

use std::collections::{BTreeMap, HashMap};

use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;

use crate::error::Result;

/// Conversion into a [`HeaderMap`]
///
/// Plain key/value maps, lists of pairs and header collections are all
/// accepted wherever headers are configured, and treated the same way.
pub trait IntoHeaders {
    /// Build a header collection, rejecting invalid names or values
    fn into_headers(self) -> Result<HeaderMap>;
}

impl IntoHeaders for HeaderMap {
    fn into_headers(self) -> Result<HeaderMap> {
        Ok(self)
    }
}

impl IntoHeaders for &HeaderMap {
    fn into_headers(self) -> Result<HeaderMap> {
        Ok(self.clone())
    }
}

fn from_pairs<I, K, V>(pairs: I) -> Result<HeaderMap>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut headers = HeaderMap::new();
    for (key, value) in pairs {
        let name = HeaderName::from_bytes(key.as_ref().as_bytes())?;
        let value = HeaderValue::from_str(value.as_ref())?;
        headers.append(name, value);
    }
    Ok(headers)
}

impl<K: AsRef<str>, V: AsRef<str>, S> IntoHeaders for HashMap<K, V, S> {
    fn into_headers(self) -> Result<HeaderMap> {
        from_pairs(self)
    }
}

impl<K: AsRef<str>, V: AsRef<str>> IntoHeaders for BTreeMap<K, V> {
    fn into_headers(self) -> Result<HeaderMap> {
        from_pairs(self)
    }
}

impl<K: AsRef<str>, V: AsRef<str>> IntoHeaders for Vec<(K, V)> {
    fn into_headers(self) -> Result<HeaderMap> {
        from_pairs(self)
    }
}

impl<K: AsRef<str>, V: AsRef<str>, const N: usize> IntoHeaders for [(K, V); N] {
    fn into_headers(self) -> Result<HeaderMap> {
        from_pairs(self)
    }
}

/// Overlay `overlay` on top of `base` and return the result
///
/// A name present in `overlay` replaces every value `base` had for it.
/// Neither input is modified.
pub fn merge_headers(base: &HeaderMap, overlay: &HeaderMap) -> HeaderMap {
    let mut merged = base.clone();
    for name in overlay.keys() {
        merged.remove(name);
        for value in overlay.get_all(name) {
            merged.append(name.clone(), value.clone());
        }
    }
    merged
}

/// Media type essence of a `Content-Type` value: parameters dropped,
/// trimmed and lowercased
pub(crate) fn mime_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// `Content-Type` header value of a collection, if present and valid text
pub(crate) fn content_type(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(http::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
}

/// Check if the declared content type is JSON
///
/// Matches `application/json` and structured syntax suffixes such as
/// `application/problem+json`, case-insensitively and ignoring parameters.
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    content_type(headers)
        .map(mime_essence)
        .is_some_and(|essence| essence == crate::JSON_MIME_TYPE || essence.ends_with("+json"))
}
