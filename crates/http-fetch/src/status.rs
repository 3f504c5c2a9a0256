//! HTTP status catalog

use std::fmt;

/// Well-known HTTP status codes
///
/// Codes missing from the catalog still work everywhere a raw `u16` is
/// expected, they just have no symbolic name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum HttpStatus {
    /// 100 Continue
    Continue = 100,
    /// 101 Switching Protocols
    SwitchingProtocols = 101,
    /// 103 Early Hints
    EarlyHints = 103,

    /// 200 OK
    Ok = 200,
    /// 201 Created
    Created = 201,
    /// 202 Accepted
    Accepted = 202,
    /// 204 No Content
    NoContent = 204,
    /// 205 Reset Content
    ResetContent = 205,
    /// 206 Partial Content
    PartialContent = 206,

    /// 300 Multiple Choices
    MultipleChoices = 300,
    /// 301 Moved Permanently
    MovedPermanently = 301,
    /// 302 Found
    Found = 302,
    /// 303 See Other
    SeeOther = 303,
    /// 304 Not Modified
    NotModified = 304,
    /// 307 Temporary Redirect
    TemporaryRedirect = 307,
    /// 308 Permanent Redirect
    PermanentRedirect = 308,

    /// 400 Bad Request
    BadRequest = 400,
    /// 401 Unauthorized
    Unauthorized = 401,
    /// 403 Forbidden
    Forbidden = 403,
    /// 404 Not Found
    NotFound = 404,
    /// 405 Method Not Allowed
    MethodNotAllowed = 405,
    /// 409 Conflict
    Conflict = 409,
    /// 410 Gone
    Gone = 410,
    /// 415 Unsupported Media Type
    UnsupportedMediaType = 415,
    /// 420 Method Failure, a deprecated Spring Framework status
    MethodFailure = 420,
    /// 422 Unprocessable Entity
    UnprocessableEntity = 422,
    /// 429 Too Many Requests
    TooManyRequests = 429,

    /// 500 Internal Server Error
    InternalServerError = 500,
    /// 501 Not Implemented
    NotImplemented = 501,
    /// 502 Bad Gateway
    BadGateway = 502,
    /// 503 Service Unavailable
    ServiceUnavailable = 503,
    /// 504 Gateway Timeout
    GatewayTimeout = 504,
}

impl HttpStatus {
    const ALL: [HttpStatus; 32] = [
        HttpStatus::Continue,
        HttpStatus::SwitchingProtocols,
        HttpStatus::EarlyHints,
        HttpStatus::Ok,
        HttpStatus::Created,
        HttpStatus::Accepted,
        HttpStatus::NoContent,
        HttpStatus::ResetContent,
        HttpStatus::PartialContent,
        HttpStatus::MultipleChoices,
        HttpStatus::MovedPermanently,
        HttpStatus::Found,
        HttpStatus::SeeOther,
        HttpStatus::NotModified,
        HttpStatus::TemporaryRedirect,
        HttpStatus::PermanentRedirect,
        HttpStatus::BadRequest,
        HttpStatus::Unauthorized,
        HttpStatus::Forbidden,
        HttpStatus::NotFound,
        HttpStatus::MethodNotAllowed,
        HttpStatus::Conflict,
        HttpStatus::Gone,
        HttpStatus::UnsupportedMediaType,
        HttpStatus::MethodFailure,
        HttpStatus::UnprocessableEntity,
        HttpStatus::TooManyRequests,
        HttpStatus::InternalServerError,
        HttpStatus::NotImplemented,
        HttpStatus::BadGateway,
        HttpStatus::ServiceUnavailable,
        HttpStatus::GatewayTimeout,
    ];

    /// Numeric status code
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Look up a numeric code in the catalog
    pub fn from_u16(code: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|status| status.as_u16() == code)
    }

    /// Canonical reason phrase
    pub fn reason_phrase(self) -> &'static str {
        match self {
            HttpStatus::Continue => "Continue",
            HttpStatus::SwitchingProtocols => "Switching Protocols",
            HttpStatus::EarlyHints => "Early Hints",
            HttpStatus::Ok => "OK",
            HttpStatus::Created => "Created",
            HttpStatus::Accepted => "Accepted",
            HttpStatus::NoContent => "No Content",
            HttpStatus::ResetContent => "Reset Content",
            HttpStatus::PartialContent => "Partial Content",
            HttpStatus::MultipleChoices => "Multiple Choices",
            HttpStatus::MovedPermanently => "Moved Permanently",
            HttpStatus::Found => "Found",
            HttpStatus::SeeOther => "See Other",
            HttpStatus::NotModified => "Not Modified",
            HttpStatus::TemporaryRedirect => "Temporary Redirect",
            HttpStatus::PermanentRedirect => "Permanent Redirect",
            HttpStatus::BadRequest => "Bad Request",
            HttpStatus::Unauthorized => "Unauthorized",
            HttpStatus::Forbidden => "Forbidden",
            HttpStatus::NotFound => "Not Found",
            HttpStatus::MethodNotAllowed => "Method Not Allowed",
            HttpStatus::Conflict => "Conflict",
            HttpStatus::Gone => "Gone",
            HttpStatus::UnsupportedMediaType => "Unsupported Media Type",
            HttpStatus::MethodFailure => "Method Failure",
            HttpStatus::UnprocessableEntity => "Unprocessable Entity",
            HttpStatus::TooManyRequests => "Too Many Requests",
            HttpStatus::InternalServerError => "Internal Server Error",
            HttpStatus::NotImplemented => "Not Implemented",
            HttpStatus::BadGateway => "Bad Gateway",
            HttpStatus::ServiceUnavailable => "Service Unavailable",
            HttpStatus::GatewayTimeout => "Gateway Timeout",
        }
    }

    /// Check if the status is a success (2xx)
    pub fn is_success(self) -> bool {
        (200..300).contains(&self.as_u16())
    }

    /// Check if the status is a client error (4xx)
    pub fn is_client_error(self) -> bool {
        (400..500).contains(&self.as_u16())
    }

    /// Check if the status is a server error (5xx)
    pub fn is_server_error(self) -> bool {
        (500..600).contains(&self.as_u16())
    }

    /// Statuses whose responses never carry a body
    pub fn is_null_body(code: u16) -> bool {
        matches!(code, 101 | 103 | 204 | 205 | 304)
    }
}

impl From<HttpStatus> for u16 {
    fn from(status: HttpStatus) -> Self {
        status.as_u16()
    }
}

impl TryFrom<u16> for HttpStatus {
    type Error = u16;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Self::from_u16(code).ok_or(code)
    }
}

impl PartialEq<u16> for HttpStatus {
    fn eq(&self, other: &u16) -> bool {
        self.as_u16() == *other
    }
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup() {
        assert_eq!(HttpStatus::from_u16(200), Some(HttpStatus::Ok));
        assert_eq!(HttpStatus::from_u16(404), Some(HttpStatus::NotFound));
        assert_eq!(
            HttpStatus::from_u16(500),
            Some(HttpStatus::InternalServerError)
        );
        assert_eq!(HttpStatus::from_u16(299), None);
    }

    #[test]
    fn test_catalog_round_trips_every_code() {
        for status in HttpStatus::ALL {
            assert_eq!(HttpStatus::from_u16(status.as_u16()), Some(status));
        }
    }

    #[test]
    fn test_reason_phrases() {
        assert_eq!(HttpStatus::Ok.reason_phrase(), "OK");
        assert_eq!(HttpStatus::NotFound.reason_phrase(), "Not Found");
        assert_eq!(
            HttpStatus::InternalServerError.reason_phrase(),
            "Internal Server Error"
        );
        assert_eq!(HttpStatus::MethodFailure.reason_phrase(), "Method Failure");
    }

    #[test]
    fn test_reason_phrases_agree_with_http_crate() {
        for status in HttpStatus::ALL {
            if status == HttpStatus::MethodFailure {
                continue;
            }
            let code = http::StatusCode::from_u16(status.as_u16()).expect("valid status code");
            assert_eq!(code.canonical_reason(), Some(status.reason_phrase()));
        }
    }

    #[test]
    fn test_classes() {
        assert!(HttpStatus::NoContent.is_success());
        assert!(!HttpStatus::MultipleChoices.is_success());
        assert!(HttpStatus::Conflict.is_client_error());
        assert!(HttpStatus::BadGateway.is_server_error());
    }

    #[test]
    fn test_null_body_statuses() {
        assert!(HttpStatus::is_null_body(204));
        assert!(HttpStatus::is_null_body(304));
        assert!(!HttpStatus::is_null_body(200));
        assert!(!HttpStatus::is_null_body(404));
    }

    #[test]
    fn test_display() {
        assert_eq!(HttpStatus::NotFound.to_string(), "404 Not Found");
        assert_eq!(HttpStatus::Created, 201);
    }
}
