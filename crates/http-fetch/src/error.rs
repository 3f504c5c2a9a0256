//! HTTP error types

use std::sync::Arc;

use thiserror::Error;

use crate::parse::ParsedBody;
use crate::request::Request;
use crate::response::Response;

/// Result type used throughout the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur while issuing a request or reading its response
///
/// Cloning is cheap: a dispatch outcome is memoised once and handed to every
/// body accessor of the same pending response.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The server answered with a status outside 2xx
    #[error(transparent)]
    Http(Box<HttpError>),
    /// The request could not complete (DNS, refused connection, invalid URL...)
    ///
    /// The message comes from the executor and is not stable across backends.
    #[error("{0}")]
    Network(String),
    /// The request was cancelled through its signal
    #[error("The operation was aborted")]
    Abort,
    /// JSON encode or decode failure
    #[error("{0}")]
    Json(Arc<serde_json::Error>),
    /// A body accessor was invoked on an already consumed body
    #[error("Body has already been consumed")]
    BodyUsed,
    /// The body could not be read as form data
    #[error("Could not parse content as FormData: {0}")]
    FormData(String),
    /// A header name or value was rejected
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
    /// A response status outside 200..=599 was given to a constructor
    #[error("Invalid status: {0} is outside the range 200 to 599")]
    InvalidStatus(u16),
    /// A response could not be constructed from the given parts
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl Error {
    /// Classification name of the error
    ///
    /// Callers discriminate failures by name, not by message: network and
    /// abort messages depend on the executor.
    pub fn name(&self) -> &'static str {
        match self {
            Error::Http(_) => HttpError::NAME,
            Error::Abort => "AbortError",
            Error::Json(_) => "SyntaxError",
            Error::InvalidStatus(_) => "RangeError",
            Error::Network(_)
            | Error::BodyUsed
            | Error::FormData(_)
            | Error::InvalidHeader(_)
            | Error::InvalidResponse(_) => "TypeError",
        }
    }

    /// The wrapped [`HttpError`], if the server signaled a failure
    pub fn as_http_error(&self) -> Option<&HttpError> {
        match self {
            Error::Http(err) => Some(&**err),
            _ => None,
        }
    }

    /// Check if the error comes from a cancelled request
    pub fn is_abort(&self) -> bool {
        matches!(self, Error::Abort)
    }
}

impl From<HttpError> for Error {
    fn from(err: HttpError) -> Self {
        Error::Http(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(Arc::new(err))
    }
}

impl From<http::header::InvalidHeaderName> for Error {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Error::InvalidHeader(err.to_string())
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Error::InvalidHeader(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Network(format!("Invalid URL: {err}"))
    }
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Network(format!("Request timed out: {err}"))
        } else if err.is_builder() {
            Error::Network(format!("Invalid request: {err}"))
        } else {
            Error::Network(err.to_string())
        }
    }
}

/// Error carrying a response whose status is outside 2xx
///
/// The message is the reason phrase, or the decimal status when the reason
/// phrase is empty (HTTP/2 has none).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct HttpError {
    message: String,
    status: u16,
    request: Option<Request>,
    response: Response,
    body: Option<ParsedBody>,
}

impl HttpError {
    /// Name reported by [`Error::name`] for this error
    pub const NAME: &'static str = "HttpError";

    /// Wrap a response, leaving its body unread
    pub fn new(response: Response) -> Self {
        let status = response.status();
        let message = if response.status_text().is_empty() {
            status.to_string()
        } else {
            response.status_text().to_string()
        };

        Self {
            message,
            status,
            request: None,
            response,
            body: None,
        }
    }

    /// Wrap a response together with its already parsed body
    pub fn with_body(response: Response, body: ParsedBody) -> Self {
        Self {
            body: Some(body),
            ..Self::new(response)
        }
    }

    /// Attach the request that produced the response
    pub fn with_request(mut self, request: Request) -> Self {
        self.request = Some(request);
        self
    }

    /// Always `"HttpError"`
    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    /// Reason phrase or decimal status
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The request that was sent, `None` for errors built without one
    /// (test doubles, [`check_status`](crate::check_status))
    pub fn request(&self) -> Option<&Request> {
        self.request.as_ref()
    }

    /// The response that triggered the error
    ///
    /// Its body is unread unless the error was raised by
    /// [`check_status`](crate::check_status).
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Parsed response body, when the error was raised after parsing
    pub fn body(&self) -> Option<&ParsedBody> {
        self.body.as_ref()
    }

    /// Take the response out of the error
    pub fn into_response(self) -> Response {
        self.response
    }
}
