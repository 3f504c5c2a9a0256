//! Thin convenience layer over HTTP fetching
//!
//! Requests are issued through a [`Fetch`] client (or the free functions
//! backed by a shared reqwest client) and come back as a [`ResponsePromise`].
//! Any status outside 2xx is turned into an [`HttpError`] carrying the
//! response, so callers never have to check `ok` by hand. Process-wide
//! request defaults live in [`defaults`], and [`mock`] builds pending
//! responses and errors for tests without touching the network.
//!
//! # Example
//!
//! ```no_run
//! use http_fetch::{Fetch, RequestOptions};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Todo {
//!     id: u64,
//!     title: String,
//! }
//!
//! async fn example() -> http_fetch::Result<Todo> {
//!     let client = Fetch::default();
//!     client
//!         .post_json(
//!             "https://api.example.com/todos",
//!             &serde_json::json!({ "title": "write docs" }),
//!             RequestOptions::new(),
//!         )
//!         .json()
//!         .await
//! }
//! ```

mod backends;
mod client;
pub mod defaults;
mod error;
mod executor;
mod headers;
pub mod mock;
mod parse;
mod promise;
mod request;
mod response;
mod status;

#[cfg(feature = "reqwest")]
pub use client::{delete, delete_json, get, get_json, patch, patch_json, post, post_json, put, put_json};
pub use client::Fetch;
pub use defaults::{Defaults, DefaultsConfig, RequestInit, RequestOptions};
pub use error::{Error, HttpError, Result};
pub use executor::RequestExecutor;
pub use headers::{is_json_content_type, merge_headers, IntoHeaders};
pub use parse::{check_status, parse_response_body, ParsedBody};
pub use promise::{
    ResponsePromise, ARRAY_BUFFER_ACCEPT, BLOB_ACCEPT, FORM_DATA_ACCEPT, JSON_ACCEPT, TEXT_ACCEPT,
};
pub use request::{Body, Credentials, Request, RequestMode};
pub use response::{Blob, FormData, Response, ResponseInit};
pub use status::HttpStatus;

/// Media type of JSON bodies
pub const JSON_MIME_TYPE: &str = "application/json";

/// Content type given to text bodies without one
pub const TEXT_PLAIN_MIME_TYPE: &str = "text/plain;charset=UTF-8";

/// Media type accepted by [`Response::form_data`]
pub const FORM_URLENCODED_MIME_TYPE: &str = "application/x-www-form-urlencoded";
