//! Request executor abstraction
//!
//! The crate never performs I/O itself. A [`RequestExecutor`] takes a fully
//! resolved [`Request`] and returns the buffered [`Response`]; the reqwest
//! backend is provided behind the `reqwest` feature, tests plug in their own.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::request::Request;
use crate::response::Response;

/// Performs the network exchange for a request
///
/// Implementations report transport failures as
/// [`Error::Network`](crate::Error::Network) and return non-2xx responses as
/// regular responses: status checking happens in the dispatcher. They may
/// observe `request.signal`, but the dispatcher also races the call against
/// it, so ignoring it is fine.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Send the request and buffer the response
    async fn execute(&self, request: Request) -> Result<Response>;
}

#[async_trait]
impl<T: RequestExecutor + ?Sized> RequestExecutor for Arc<T> {
    async fn execute(&self, request: Request) -> Result<Response> {
        (**self).execute(request).await
    }
}
