//! Test doubles
//!
//! Build pending responses and errors without any network, for code that
//! receives a [`ResponsePromise`] or [`HttpError`] and needs to be tested
//! against specific statuses and bodies. The values go through the same
//! accessors and status checks as real ones.
//!
//! ```
//! use http_fetch::mock::create_response_promise;
//! use http_fetch::ResponseInit;
//!
//! # async fn example() -> http_fetch::Result<()> {
//! let promise = create_response_promise(
//!     "<!DOCTYPE html><title>404</title>",
//!     ResponseInit::new(404).status_text("Not Found"),
//! )?;
//! let error = promise.text().await.unwrap_err();
//! assert_eq!(error.to_string(), "Not Found");
//! # Ok(())
//! # }
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use http::header::{HeaderValue, CONTENT_TYPE};
use serde::Serialize;

use crate::error::{Error, HttpError, Result};
use crate::executor::RequestExecutor;
use crate::promise::ResponsePromise;
use crate::request::{Body, Request};
use crate::response::{Response, ResponseInit};

fn with_json_content_type(mut init: ResponseInit) -> ResponseInit {
    if !init.headers_mut().contains_key(CONTENT_TYPE) {
        init.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(crate::JSON_MIME_TYPE));
    }
    init
}

/// Pending response settled with the given body and init
///
/// A status outside 2xx makes every accessor fail with [`Error::Http`].
pub fn create_response_promise(
    body: impl Into<Body>,
    init: ResponseInit,
) -> Result<ResponsePromise> {
    Ok(ResponsePromise::settled(Response::new(body, init)?))
}

/// Pending response settled with `body` serialized as JSON
///
/// `Content-Type: application/json` is added unless `init` sets one.
pub fn create_json_response_promise<T: Serialize + ?Sized>(
    body: &T,
    init: ResponseInit,
) -> Result<ResponsePromise> {
    let body = serde_json::to_string(body)?;
    create_response_promise(body, with_json_content_type(init))
}

/// [`HttpError`] wrapping a response built from the given parts
pub fn create_http_error(
    body: impl Into<Body>,
    status: u16,
    status_text: impl Into<String>,
) -> Result<HttpError> {
    let init = ResponseInit::new(status).status_text(status_text);
    Ok(HttpError::new(Response::new(body, init)?))
}

/// [`HttpError`] wrapping a JSON response built from the given parts
///
/// Statuses that cannot carry a body, such as 204, are rejected with
/// [`Error::InvalidResponse`].
pub fn create_json_http_error<T: Serialize + ?Sized>(
    body: &T,
    status: u16,
    status_text: impl Into<String>,
) -> Result<HttpError> {
    let body = serde_json::to_string(body)?;
    let init = with_json_content_type(ResponseInit::new(status).status_text(status_text));
    Ok(HttpError::new(Response::new(body, init)?))
}

/// [`RequestExecutor`] replaying queued responses and recording requests
///
/// Without anything queued it answers `200 OK` with no body. Clones share
/// the queue and the record.
#[derive(Debug, Clone, Default)]
pub struct MockExecutor {
    state: Arc<Mutex<MockState>>,
}

#[derive(Debug, Default)]
struct MockState {
    requests: Vec<Request>,
    replies: VecDeque<Result<Response>>,
    hang: bool,
}

impl MockExecutor {
    /// Executor with nothing queued
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }

    /// Queue a response
    pub fn push_response(&self, response: Response) {
        self.state().replies.push_back(Ok(response));
    }

    /// Queue a transport failure
    pub fn push_error(&self, error: Error) {
        self.state().replies.push_back(Err(error));
    }

    /// Never answer, so requests only end through their signal
    pub fn hang(&self) {
        self.state().hang = true;
    }

    /// Every request received so far, in order
    pub fn requests(&self) -> Vec<Request> {
        self.state().requests.clone()
    }

    /// Most recent request
    pub fn last_request(&self) -> Option<Request> {
        self.state().requests.last().cloned()
    }
}

#[async_trait]
impl RequestExecutor for MockExecutor {
    async fn execute(&self, request: Request) -> Result<Response> {
        let (reply, hang) = {
            let mut state = self.state();
            state.requests.push(request);
            (state.replies.pop_front(), state.hang)
        };

        if hang {
            return std::future::pending().await;
        }

        reply.unwrap_or_else(|| Ok(Response::from_parts(200, "OK", Default::default(), None, false, None)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_response_promise_ok() {
        let promise = create_response_promise("body", ResponseInit::default()).expect("promise");
        let response = promise.response().await.expect("response");
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).expect("content type"),
            "text/plain;charset=UTF-8"
        );
        assert_eq!(promise.text().await.expect("text"), "body");
    }

    #[tokio::test]
    async fn test_create_response_promise_without_body() {
        let promise = create_response_promise((), ResponseInit::default()).expect("promise");
        let response = promise.await.expect("response");
        assert!(response.headers().is_empty());
        assert_eq!(response.text().await.expect("text"), "");
    }

    #[tokio::test]
    async fn test_create_response_promise_error_status() {
        let promise = create_response_promise(
            "<!DOCTYPE html><title>404</title>",
            ResponseInit::new(404).status_text("Not Found"),
        )
        .expect("promise");

        let error = promise.text().await.expect_err("404 should fail");
        let http = error.as_http_error().expect("HttpError");
        assert_eq!(http.name(), "HttpError");
        assert!(http.request().is_none());
        assert_eq!(http.message(), "Not Found");
        assert_eq!(http.status(), 404);
        assert_eq!(
            http.response().text().await.expect("error body"),
            "<!DOCTYPE html><title>404</title>"
        );

        let error = promise.await.expect_err("404 should fail");
        assert_eq!(error.name(), "HttpError");
    }

    #[tokio::test]
    async fn test_create_json_response_promise() {
        let promise =
            create_json_response_promise(&serde_json::json!({ "id": 1 }), ResponseInit::default())
                .expect("promise");
        let value: serde_json::Value = promise.json().await.expect("JSON body");
        assert_eq!(value, serde_json::json!({ "id": 1 }));
        assert!(matches!(promise.text().await, Err(Error::BodyUsed)));
    }

    #[tokio::test]
    async fn test_create_json_response_promise_keeps_content_type() {
        let init = ResponseInit::default()
            .header("content-type", "application/hal+json")
            .expect("valid header");
        let promise = create_json_response_promise(&[1, 2, 3], init).expect("promise");
        let response = promise.response().await.expect("response");
        assert_eq!(
            response.headers().get(CONTENT_TYPE).expect("content type"),
            "application/hal+json"
        );
        let value: Vec<u32> = promise.json().await.expect("JSON body");
        assert_eq!(value, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_create_http_error() {
        let error = create_http_error("body", 200, "OK").expect("error");
        assert_eq!(error.name(), "HttpError");
        assert!(error.request().is_none());
        assert_eq!(error.message(), "OK");
        assert!(error.response().ok());
        assert_eq!(
            error.response().headers().get(CONTENT_TYPE).expect("content type"),
            "text/plain;charset=UTF-8"
        );
        assert_eq!(error.response().text().await.expect("text"), "body");
        assert!(error.response().body_used());
    }

    #[tokio::test]
    async fn test_create_http_error_no_content() {
        let error = create_http_error((), 204, "No Content").expect("error");
        assert_eq!(error.message(), "No Content");
        assert!(error.response().headers().is_empty());
        assert_eq!(error.response().text().await.expect("text"), "");
    }

    #[test]
    fn test_create_http_error_without_status_text() {
        let error = create_http_error("body", 404, "").expect("error");
        assert_eq!(error.message(), "404");
    }

    #[tokio::test]
    async fn test_create_json_http_error() {
        let error = create_json_http_error(&serde_json::json!({ "body": true }), 200, "OK")
            .expect("error");
        assert_eq!(error.message(), "OK");
        assert_eq!(
            error.response().headers().get(CONTENT_TYPE).expect("content type"),
            "application/json"
        );
        assert_eq!(error.response().headers().len(), 1);
        let body: serde_json::Value = error.response().json().await.expect("JSON body");
        assert_eq!(body, serde_json::json!({ "body": true }));
    }

    #[test]
    fn test_create_json_http_error_null_body_status_fails() {
        let result = create_json_http_error(&serde_json::json!({}), 204, "No Content");
        assert!(matches!(result, Err(Error::InvalidResponse(_))));
    }

    #[test]
    fn test_create_http_error_invalid_status() {
        assert!(matches!(
            create_http_error((), 0, ""),
            Err(Error::InvalidStatus(0))
        ));
    }

    #[tokio::test]
    async fn test_mock_executor_replays_in_order() {
        let executor = MockExecutor::new();
        executor.push_response(
            Response::new("first", ResponseInit::default()).expect("valid response"),
        );
        executor.push_error(Error::Network("down".into()));

        let request = Request {
            method: http::Method::GET,
            url: url::Url::parse("http://localhost/").expect("valid URL"),
            headers: Default::default(),
            body: None,
            credentials: Default::default(),
            mode: Default::default(),
            signal: None,
        };

        let first = executor.execute(request.clone()).await.expect("first reply");
        assert_eq!(first.text().await.expect("text"), "first");
        assert!(matches!(
            executor.execute(request.clone()).await,
            Err(Error::Network(_))
        ));
        let fallback = executor.execute(request).await.expect("default reply");
        assert_eq!(fallback.status(), 200);
        assert_eq!(executor.requests().len(), 3);
    }
}
