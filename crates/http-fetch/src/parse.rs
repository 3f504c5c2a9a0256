//! Response body parsing and status checking

use serde::Serialize;

use crate::error::{HttpError, Result};
use crate::headers::is_json_content_type;
use crate::response::Response;

/// Body decoded according to its declared content type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParsedBody {
    /// JSON document
    Json(serde_json::Value),
    /// Anything else, as text
    Text(String),
}

impl ParsedBody {
    /// JSON value, if the body was JSON
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ParsedBody::Json(value) => Some(value),
            ParsedBody::Text(_) => None,
        }
    }

    /// Text, if the body was not JSON
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParsedBody::Text(text) => Some(text),
            ParsedBody::Json(_) => None,
        }
    }
}

/// Decode a response body following its `Content-Type`
///
/// JSON content types are decoded as JSON (an empty body is a decode error),
/// everything else, including a missing content type, as text. The status is
/// not looked at: pair this with [`check_status`] or [`Response::ok`] before
/// trusting the result. This consumes the body.
pub async fn parse_response_body(response: &Response) -> Result<ParsedBody> {
    if is_json_content_type(response.headers()) {
        Ok(ParsedBody::Json(response.json().await?))
    } else {
        Ok(ParsedBody::Text(response.text().await?))
    }
}

/// Fail with an [`HttpError`] carrying the response and its parsed body
/// unless the status is 2xx
pub fn check_status(response: &Response, body: ParsedBody) -> Result<(), HttpError> {
    if response.ok() {
        return Ok(());
    }

    Err(HttpError::with_body(response.clone(), body))
}
