//! HTTP response types

use std::fmt;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::HeaderMap;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Error, Result};
use crate::headers::{content_type, IntoHeaders};
use crate::request::Body;
use crate::status::HttpStatus;

/// Take-once body storage shared by every clone of a response
#[derive(Clone)]
struct BodyCell {
    inner: Arc<Mutex<BodyState>>,
}

enum BodyState {
    Empty,
    Unread(Bytes),
    Used,
}

impl BodyCell {
    fn new(body: Option<Bytes>) -> Self {
        let state = match body {
            Some(bytes) => BodyState::Unread(bytes),
            None => BodyState::Empty,
        };
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    fn take(&self) -> Result<Bytes> {
        let mut state = self.inner.lock().unwrap_or_else(|err| err.into_inner());
        match std::mem::replace(&mut *state, BodyState::Used) {
            BodyState::Unread(bytes) => Ok(bytes),
            // Reading a missing body yields nothing, and marks it used
            BodyState::Empty => Ok(Bytes::new()),
            BodyState::Used => Err(Error::BodyUsed),
        }
    }

    fn is_used(&self) -> bool {
        matches!(
            *self.inner.lock().unwrap_or_else(|err| err.into_inner()),
            BodyState::Used
        )
    }

    fn is_null(&self) -> bool {
        matches!(
            *self.inner.lock().unwrap_or_else(|err| err.into_inner()),
            BodyState::Empty
        )
    }
}

/// Status, reason phrase and headers used to build a [`Response`]
#[derive(Debug, Clone)]
pub struct ResponseInit {
    status: u16,
    status_text: String,
    headers: HeaderMap,
    url: Option<Url>,
    redirected: bool,
}

impl Default for ResponseInit {
    fn default() -> Self {
        Self::new(HttpStatus::Ok.as_u16())
    }
}

impl ResponseInit {
    /// Start from a status code with an empty reason phrase
    pub fn new(status: u16) -> Self {
        Self {
            status,
            status_text: String::new(),
            headers: HeaderMap::new(),
            url: None,
            redirected: false,
        }
    }

    /// Set the reason phrase
    pub fn status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = status_text.into();
        self
    }

    /// Replace the headers
    pub fn headers<H: IntoHeaders>(mut self, headers: H) -> Result<Self> {
        self.headers = headers.into_headers()?;
        Ok(self)
    }

    /// Add one header
    pub fn header(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = http::header::HeaderName::from_bytes(key.as_ref().as_bytes())?;
        self.headers
            .append(name, HeaderValue::from_str(value.as_ref())?);
        Ok(self)
    }

    /// Final URL of the response
    pub fn url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    /// Mark the response as the result of a followed redirect
    pub fn redirected(mut self, redirected: bool) -> Self {
        self.redirected = redirected;
        self
    }

    pub(crate) fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }
}

/// HTTP response
///
/// The body is fully buffered but can be read only once: the first body
/// accessor takes it, any further one fails with [`Error::BodyUsed`]. Clones
/// share the same body, so reading through a clone counts too.
#[derive(Clone)]
pub struct Response {
    status: u16,
    status_text: String,
    headers: HeaderMap,
    url: Option<Url>,
    redirected: bool,
    body: BodyCell,
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("status_text", &self.status_text)
            .field("headers", &self.headers)
            .field("url", &self.url)
            .field("body_used", &self.body_used())
            .finish_non_exhaustive()
    }
}

impl Response {
    /// Build a response from a body and init, the way a fetch `Response`
    /// constructor does
    ///
    /// The status must be in 200..=599, and statuses that never carry a body
    /// (204, 205, 304) reject a non-empty one. A text body gets
    /// `text/plain;charset=UTF-8` unless a content type is already set.
    pub fn new(body: impl Into<Body>, init: ResponseInit) -> Result<Self> {
        let body = body.into();
        let ResponseInit {
            status,
            status_text,
            mut headers,
            url,
            redirected,
        } = init;

        if !(200..=599).contains(&status) {
            return Err(Error::InvalidStatus(status));
        }

        if !body.is_empty() && HttpStatus::is_null_body(status) {
            return Err(Error::InvalidResponse(format!(
                "response with null body status {status} cannot have a body"
            )));
        }

        if let Some(implied) = body.implied_content_type() {
            if !headers.contains_key(CONTENT_TYPE) {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(implied));
            }
        }

        Ok(Self::from_parts(status, status_text, headers, url, redirected, body.into_bytes()))
    }

    /// Assemble a response received by an executor
    ///
    /// No validation is performed: whatever the server sent is kept as is.
    pub fn from_parts(
        status: u16,
        status_text: impl Into<String>,
        headers: HeaderMap,
        url: Option<Url>,
        redirected: bool,
        body: Option<Bytes>,
    ) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            headers,
            url,
            redirected,
            body: BodyCell::new(body),
        }
    }

    /// HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Reason phrase, empty when the protocol has none
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Catalog entry for the status, if known
    pub fn http_status(&self) -> Option<HttpStatus> {
        HttpStatus::from_u16(self.status)
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Final URL, if the response came from the network
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Whether the executor followed a redirect to get this response
    pub fn redirected(&self) -> bool {
        self.redirected
    }

    /// Check if the status is a success (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the status is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Check if the status is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Whether the body has been consumed
    pub fn body_used(&self) -> bool {
        self.body.is_used()
    }

    /// Whether an unread, non-null body is available
    pub fn has_body(&self) -> bool {
        !self.body.is_null() && !self.body.is_used()
    }

    /// Get the response body as text
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected.
    pub async fn text(&self) -> Result<String> {
        let bytes = self.body.take()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Get the response body as JSON
    ///
    /// The content type is not checked; an empty body is a decode error.
    pub async fn json<T: DeserializeOwned>(&self) -> Result<T> {
        let bytes = self.body.take()?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Get the response body as bytes
    pub async fn array_buffer(&self) -> Result<Bytes> {
        self.body.take()
    }

    /// Get the response body as a [`Blob`] typed with the content type
    pub async fn blob(&self) -> Result<Blob> {
        let bytes = self.body.take()?;
        let mime_type = content_type(&self.headers)
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        Ok(Blob { bytes, mime_type })
    }

    /// Get the response body as form data
    ///
    /// Only `application/x-www-form-urlencoded` bodies are understood.
    pub async fn form_data(&self) -> Result<FormData> {
        let essence = content_type(&self.headers)
            .map(crate::headers::mime_essence)
            .unwrap_or_default();
        let bytes = self.body.take()?;

        if essence != crate::FORM_URLENCODED_MIME_TYPE {
            return Err(Error::FormData(format!(
                "unsupported content type '{essence}'"
            )));
        }

        let entries: Vec<(String, String)> =
            serde_urlencoded::from_bytes(&bytes).map_err(|e| Error::FormData(e.to_string()))?;
        Ok(FormData { entries })
    }
}

/// Body bytes with their media type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    bytes: Bytes,
    mime_type: String,
}

impl Blob {
    /// Lowercased `Content-Type` of the response, empty if there was none
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Raw bytes
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Take the raw bytes
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

/// Ordered form entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, String)>,
}

impl FormData {
    /// First value for a name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Every value for a name, in order
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// All entries, in order
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}
