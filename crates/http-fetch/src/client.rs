//! HTTP client wrapper

use std::fmt;
use std::sync::Arc;
#[cfg(feature = "reqwest")]
use std::sync::LazyLock;

use http::header::{HeaderValue, CONTENT_TYPE};
use http::Method;
use serde::Serialize;
use url::Url;

use crate::defaults::{Defaults, RequestOptions};
use crate::error::Result;
use crate::executor::RequestExecutor;
use crate::promise::{ResponsePromise, JSON_ACCEPT};
use crate::request::{Body, Request};

/// HTTP client wrapper
///
/// Every call reads the current [`Defaults`], merges the per-call
/// [`RequestOptions`] on top and returns a [`ResponsePromise`]. Nothing is
/// sent until the promise is awaited or one of its body accessors is called.
#[derive(Clone)]
pub struct Fetch {
    executor: Arc<dyn RequestExecutor>,
    defaults: Defaults,
}

impl fmt::Debug for Fetch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fetch")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "reqwest")]
impl Default for Fetch {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

impl Fetch {
    /// Client using the process-wide defaults
    pub fn new<E: RequestExecutor + 'static>(executor: E) -> Self {
        Self::with_defaults(executor, Defaults::global())
    }

    /// Client using its own defaults cell
    pub fn with_defaults<E: RequestExecutor + 'static>(executor: E, defaults: Defaults) -> Self {
        Self {
            executor: Arc::new(executor),
            defaults,
        }
    }

    /// Create a Fetch client from a reqwest::Client
    #[cfg(feature = "reqwest")]
    pub fn from_reqwest(client: reqwest::Client) -> Self {
        Self::new(client)
    }

    /// Defaults read by every call
    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    fn build(
        &self,
        method: Method,
        url: &str,
        body: Result<Body>,
        options: &RequestOptions,
        json: bool,
    ) -> Result<Request> {
        let url = Url::parse(url)?;
        let body = body?;
        let init = self.defaults.get().merge(options);

        let mut headers = init.headers;
        if json && !body.is_empty() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(crate::JSON_MIME_TYPE));
        }

        Ok(Request {
            method,
            url,
            headers,
            body: body.into_bytes(),
            credentials: init.credentials,
            mode: init.mode.unwrap_or_default(),
            signal: init.signal,
        })
    }

    fn dispatch(
        &self,
        method: Method,
        url: &str,
        body: Result<Body>,
        options: RequestOptions,
        json: bool,
    ) -> ResponsePromise {
        let request = self.build(method, url, body, &options, json);
        let promise = ResponsePromise::new(self.executor.clone(), request);
        if json {
            promise.negotiate(JSON_ACCEPT);
        }
        promise
    }

    // === Generic request ===

    /// Request with any method and a raw body
    ///
    /// No content type is forced; set one in `options` if the server needs it.
    pub fn fetch(
        &self,
        method: Method,
        url: &str,
        body: impl Into<Body>,
        options: RequestOptions,
    ) -> ResponsePromise {
        self.dispatch(method, url, Ok(body.into()), options, false)
    }

    // === Raw body methods ===

    /// GET request
    pub fn get(&self, url: &str, options: RequestOptions) -> ResponsePromise {
        self.fetch(Method::GET, url, Body::Empty, options)
    }

    /// POST request with a raw body
    pub fn post(&self, url: &str, body: impl Into<Body>, options: RequestOptions) -> ResponsePromise {
        self.fetch(Method::POST, url, body, options)
    }

    /// PUT request with a raw body
    pub fn put(&self, url: &str, body: impl Into<Body>, options: RequestOptions) -> ResponsePromise {
        self.fetch(Method::PUT, url, body, options)
    }

    /// PATCH request with a raw body
    pub fn patch(&self, url: &str, body: impl Into<Body>, options: RequestOptions) -> ResponsePromise {
        self.fetch(Method::PATCH, url, body, options)
    }

    /// DELETE request
    pub fn delete(&self, url: &str, options: RequestOptions) -> ResponsePromise {
        self.fetch(Method::DELETE, url, Body::Empty, options)
    }

    // === JSON methods ===

    /// GET request accepting JSON
    pub fn get_json(&self, url: &str, options: RequestOptions) -> ResponsePromise {
        self.dispatch(Method::GET, url, Ok(Body::Empty), options, true)
    }

    /// POST with JSON body
    ///
    /// `Content-Type: application/json` overrides any caller value.
    pub fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        options: RequestOptions,
    ) -> ResponsePromise {
        self.dispatch(Method::POST, url, json_body(body), options, true)
    }

    /// PUT with JSON body
    pub fn put_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        options: RequestOptions,
    ) -> ResponsePromise {
        self.dispatch(Method::PUT, url, json_body(body), options, true)
    }

    /// PATCH with JSON body
    pub fn patch_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        options: RequestOptions,
    ) -> ResponsePromise {
        self.dispatch(Method::PATCH, url, json_body(body), options, true)
    }

    /// DELETE request accepting JSON
    pub fn delete_json(&self, url: &str, options: RequestOptions) -> ResponsePromise {
        self.dispatch(Method::DELETE, url, Ok(Body::Empty), options, true)
    }
}

fn json_body<B: Serialize + ?Sized>(body: &B) -> Result<Body> {
    Ok(Body::Text(serde_json::to_string(body)?))
}

#[cfg(feature = "reqwest")]
static CLIENT: LazyLock<Fetch> = LazyLock::new(Fetch::default);

/// GET request on the shared client
#[cfg(feature = "reqwest")]
pub fn get(url: &str, options: RequestOptions) -> ResponsePromise {
    CLIENT.get(url, options)
}

/// POST request on the shared client
#[cfg(feature = "reqwest")]
pub fn post(url: &str, body: impl Into<Body>, options: RequestOptions) -> ResponsePromise {
    CLIENT.post(url, body, options)
}

/// PUT request on the shared client
#[cfg(feature = "reqwest")]
pub fn put(url: &str, body: impl Into<Body>, options: RequestOptions) -> ResponsePromise {
    CLIENT.put(url, body, options)
}

/// PATCH request on the shared client
#[cfg(feature = "reqwest")]
pub fn patch(url: &str, body: impl Into<Body>, options: RequestOptions) -> ResponsePromise {
    CLIENT.patch(url, body, options)
}

/// DELETE request on the shared client
#[cfg(feature = "reqwest")]
pub fn delete(url: &str, options: RequestOptions) -> ResponsePromise {
    CLIENT.delete(url, options)
}

/// GET request accepting JSON on the shared client
#[cfg(feature = "reqwest")]
pub fn get_json(url: &str, options: RequestOptions) -> ResponsePromise {
    CLIENT.get_json(url, options)
}

/// POST with JSON body on the shared client
#[cfg(feature = "reqwest")]
pub fn post_json<B: Serialize + ?Sized>(
    url: &str,
    body: &B,
    options: RequestOptions,
) -> ResponsePromise {
    CLIENT.post_json(url, body, options)
}

/// PUT with JSON body on the shared client
#[cfg(feature = "reqwest")]
pub fn put_json<B: Serialize + ?Sized>(
    url: &str,
    body: &B,
    options: RequestOptions,
) -> ResponsePromise {
    CLIENT.put_json(url, body, options)
}

/// PATCH with JSON body on the shared client
#[cfg(feature = "reqwest")]
pub fn patch_json<B: Serialize + ?Sized>(
    url: &str,
    body: &B,
    options: RequestOptions,
) -> ResponsePromise {
    CLIENT.patch_json(url, body, options)
}

/// DELETE request accepting JSON on the shared client
#[cfg(feature = "reqwest")]
pub fn delete_json(url: &str, options: RequestOptions) -> ResponsePromise {
    CLIENT.delete_json(url, options)
}
