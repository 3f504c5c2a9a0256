//! HTTP request types

use bytes::Bytes;
use http::{HeaderMap, Method};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Request or response body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Body {
    /// No body at all
    #[default]
    Empty,
    /// UTF-8 text, gets `text/plain;charset=UTF-8` on synthesized responses
    Text(String),
    /// Raw bytes, no implied content type
    Binary(Bytes),
}

impl Body {
    /// Check if there is no body
    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }

    /// Default content type implied by the body kind
    pub(crate) fn implied_content_type(&self) -> Option<&'static str> {
        match self {
            Body::Text(_) => Some(crate::TEXT_PLAIN_MIME_TYPE),
            Body::Empty | Body::Binary(_) => None,
        }
    }

    /// Body bytes, `None` when there is no body
    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            Body::Empty => None,
            Body::Text(text) => Some(Bytes::from(text)),
            Body::Binary(bytes) => Some(bytes),
        }
    }
}

impl From<()> for Body {
    fn from((): ()) -> Self {
        Body::Empty
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Binary(Bytes::from(bytes))
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Body::Binary(bytes)
    }
}

impl<T: Into<Body>> From<Option<T>> for Body {
    fn from(body: Option<T>) -> Self {
        body.map_or(Body::Empty, Into::into)
    }
}

/// Whether the executor should send cookies and credentials
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Credentials {
    /// Never send credentials
    Omit,
    /// Send credentials to same-origin URLs only
    #[default]
    SameOrigin,
    /// Always send credentials
    Include,
}

/// Request mode, meaningful for executors enforcing an origin policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    /// Cross-origin requests allowed under CORS
    #[default]
    Cors,
    /// Cross-origin requests with an opaque response
    NoCors,
    /// Same-origin requests only
    SameOrigin,
    /// Navigation request
    Navigate,
}

/// Fully resolved request handed to a [`RequestExecutor`](crate::RequestExecutor)
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Target URL
    pub url: Url,
    /// Merged headers
    pub headers: HeaderMap,
    /// Request body, `None` when there is none
    pub body: Option<Bytes>,
    /// Credentials policy
    pub credentials: Credentials,
    /// Request mode
    pub mode: RequestMode,
    /// Cancellation signal supplied by the caller
    pub signal: Option<CancellationToken>,
}

impl Request {
    /// Body decoded as UTF-8, mostly useful when asserting in tests
    pub fn body_text(&self) -> Option<String> {
        self.body
            .as_ref()
            .map(|body| String::from_utf8_lossy(body).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_conversions() {
        assert_eq!(Body::from(()), Body::Empty);
        assert_eq!(Body::from("hi"), Body::Text("hi".to_string()));
        assert_eq!(
            Body::from(vec![1u8, 2, 3]),
            Body::Binary(Bytes::from_static(&[1, 2, 3]))
        );
        assert_eq!(Body::from(None::<String>), Body::Empty);
        assert_eq!(Body::from(Some("x")), Body::Text("x".to_string()));
    }

    #[test]
    fn test_body_implied_content_type() {
        assert_eq!(
            Body::from("hi").implied_content_type(),
            Some("text/plain;charset=UTF-8")
        );
        assert_eq!(Body::from(vec![0u8]).implied_content_type(), None);
        assert_eq!(Body::Empty.implied_content_type(), None);
    }

    #[test]
    fn test_body_into_bytes() {
        assert_eq!(Body::Empty.into_bytes(), None);
        assert_eq!(
            Body::from("hi").into_bytes(),
            Some(Bytes::from_static(b"hi"))
        );
    }

    #[test]
    fn test_credentials_serde() {
        let value: Credentials = serde_json::from_str("\"same-origin\"").expect("valid credentials");
        assert_eq!(value, Credentials::SameOrigin);
        assert_eq!(
            serde_json::to_string(&Credentials::Include).expect("serializable"),
            "\"include\""
        );
        assert_eq!(Credentials::default(), Credentials::SameOrigin);
    }

    #[test]
    fn test_mode_serde() {
        let value: RequestMode = serde_json::from_str("\"no-cors\"").expect("valid mode");
        assert_eq!(value, RequestMode::NoCors);
    }
}
