//! Pending responses
//!
//! A [`ResponsePromise`] is the value returned by every request method. It
//! holds the request until it is first awaited, so the body accessor picked
//! by the caller can still set `Accept` before anything leaves. The outcome
//! is memoised: every accessor observes the same response, and the same
//! [`HttpError`] when the status is not 2xx.

use std::fmt;
use std::future::IntoFuture;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use futures::future::BoxFuture;
use http::header::{HeaderValue, ACCEPT};
use http::HeaderMap;
use serde::de::{DeserializeOwned, IntoDeserializer};
use tokio::sync::OnceCell;
use tracing::instrument;

use crate::error::{Error, HttpError, Result};
use crate::executor::RequestExecutor;
use crate::headers::is_json_content_type;
use crate::request::Request;
use crate::response::{Blob, FormData, Response};

/// `Accept` value negotiated by [`ResponsePromise::text`]
pub const TEXT_ACCEPT: &str = "text/*";
/// `Accept` value negotiated by [`ResponsePromise::json`]
pub const JSON_ACCEPT: &str = crate::JSON_MIME_TYPE;
/// `Accept` value negotiated by [`ResponsePromise::array_buffer`]
pub const ARRAY_BUFFER_ACCEPT: &str = "*/*";
/// `Accept` value negotiated by [`ResponsePromise::blob`]
pub const BLOB_ACCEPT: &str = "*/*";
/// `Accept` value negotiated by [`ResponsePromise::form_data`]
pub const FORM_DATA_ACCEPT: &str = "multipart/form-data";

struct Dispatch {
    executor: Arc<dyn RequestExecutor>,
    request: Result<Request>,
    sent: bool,
}

struct Inner {
    dispatch: Mutex<Option<Dispatch>>,
    outcome: OnceCell<Result<Response>>,
}

/// In-flight HTTP exchange
///
/// Await it directly to get the [`Response`], or call one of the body
/// accessors. Whichever comes first sends the request; a non-2xx status
/// makes all of them fail with [`Error::Http`]. The body can be read only
/// once across the promise and the responses it hands out.
pub struct ResponsePromise {
    inner: Inner,
}

impl fmt::Debug for ResponsePromise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponsePromise")
            .field("settled", &self.inner.outcome.initialized())
            .finish_non_exhaustive()
    }
}

impl ResponsePromise {
    pub(crate) fn new(executor: Arc<dyn RequestExecutor>, request: Result<Request>) -> Self {
        Self {
            inner: Inner {
                dispatch: Mutex::new(Some(Dispatch {
                    executor,
                    request,
                    sent: false,
                })),
                outcome: OnceCell::new(),
            },
        }
    }

    /// Promise already settled with `response`, status checked
    pub(crate) fn settled(response: Response) -> Self {
        Self {
            inner: Inner {
                dispatch: Mutex::new(None),
                outcome: OnceCell::new_with(Some(check_ok(response, None))),
            },
        }
    }

    /// Set `Accept` to `accept` unless the request already has one
    ///
    /// No-op once the request has been sent, or for settled promises.
    pub(crate) fn negotiate(&self, accept: &'static str) {
        let mut dispatch = self
            .inner
            .dispatch
            .lock()
            .unwrap_or_else(|err| err.into_inner());

        let Some(Dispatch {
            request: Ok(request),
            sent: false,
            ..
        }) = dispatch.as_mut()
        else {
            return;
        };

        if request.headers.contains_key(ACCEPT) {
            tracing::trace!(accept, "Keeping explicit Accept header");
        } else {
            tracing::trace!(accept, "Negotiating Accept header");
            request
                .headers
                .insert(ACCEPT, HeaderValue::from_static(accept));
        }
    }

    /// Headers the request will be sent with, `None` for settled promises
    /// and requests that failed to build
    pub fn request_headers(&self) -> Option<HeaderMap> {
        let dispatch = self
            .inner
            .dispatch
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        match dispatch.as_ref() {
            Some(Dispatch {
                request: Ok(request),
                ..
            }) => Some(request.headers.clone()),
            _ => None,
        }
    }

    /// Send the request if needed and return the response
    ///
    /// Calling this several times yields clones sharing a single body.
    pub async fn response(&self) -> Result<Response> {
        self.inner
            .outcome
            .get_or_init(|| self.dispatch())
            .await
            .clone()
    }

    async fn dispatch(&self) -> Result<Response> {
        let (executor, request) = {
            let mut dispatch = self
                .inner
                .dispatch
                .lock()
                .unwrap_or_else(|err| err.into_inner());
            match dispatch.as_mut() {
                Some(dispatch) => {
                    dispatch.sent = true;
                    (dispatch.executor.clone(), dispatch.request.clone())
                }
                None => return Err(Error::Network("No request to send".to_string())),
            }
        };

        send(executor, request?).await
    }

    /// Get the response body as text, negotiating `Accept: text/*`
    pub async fn text(&self) -> Result<String> {
        self.negotiate(TEXT_ACCEPT);
        self.response().await?.text().await
    }

    /// Get the response body as JSON, negotiating `Accept: application/json`
    ///
    /// A response not declared as JSON is read as text and handed to `T` as a
    /// JSON string, so `String` or [`serde_json::Value`] still get the body
    /// of a mislabeled response.
    pub async fn json<T: DeserializeOwned>(&self) -> Result<T> {
        self.negotiate(JSON_ACCEPT);
        let response = self.response().await?;

        if is_json_content_type(response.headers()) {
            return response.json().await;
        }

        let text = response.text().await?;
        let deserializer: serde::de::value::StringDeserializer<serde_json::Error> =
            text.into_deserializer();
        Ok(T::deserialize(deserializer)?)
    }

    /// Get the response body as bytes, negotiating `Accept: */*`
    pub async fn array_buffer(&self) -> Result<Bytes> {
        self.negotiate(ARRAY_BUFFER_ACCEPT);
        self.response().await?.array_buffer().await
    }

    /// Get the response body as a [`Blob`], negotiating `Accept: */*`
    pub async fn blob(&self) -> Result<Blob> {
        self.negotiate(BLOB_ACCEPT);
        self.response().await?.blob().await
    }

    /// Get the response body as [`FormData`], negotiating
    /// `Accept: multipart/form-data`
    pub async fn form_data(&self) -> Result<FormData> {
        self.negotiate(FORM_DATA_ACCEPT);
        self.response().await?.form_data().await
    }
}

impl IntoFuture for ResponsePromise {
    type Output = Result<Response>;
    type IntoFuture = BoxFuture<'static, Result<Response>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { self.response().await })
    }
}

fn check_ok(response: Response, request: Option<Request>) -> Result<Response> {
    if response.ok() {
        return Ok(response);
    }

    let error = HttpError::new(response);
    Err(match request {
        Some(request) => error.with_request(request),
        None => error,
    }
    .into())
}

#[instrument(skip_all, fields(method = %request.method, url = %request.url))]
async fn send(executor: Arc<dyn RequestExecutor>, request: Request) -> Result<Response> {
    let signal = request.signal.clone();
    let sent = request.clone();

    let response = match signal {
        Some(signal) if signal.is_cancelled() => {
            tracing::debug!("Request cancelled before sending");
            return Err(Error::Abort);
        }
        Some(signal) => {
            tracing::debug!("Sending request");
            tokio::select! {
                biased;
                _ = signal.cancelled() => {
                    tracing::debug!("Request cancelled in flight");
                    return Err(Error::Abort);
                }
                result = executor.execute(request) => result?,
            }
        }
        None => {
            tracing::debug!("Sending request");
            executor.execute(request).await?
        }
    };

    tracing::debug!(status = response.status(), "Received response");
    check_ok(response, Some(sent))
}
