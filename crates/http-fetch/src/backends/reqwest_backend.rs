//! reqwest-based RequestExecutor implementation

use async_trait::async_trait;
use http::Version;
use hyper::ext::ReasonPhrase;

use crate::error::Result;
use crate::executor::RequestExecutor;
use crate::request::Request;
use crate::response::Response;

/// Sends requests with a [`reqwest::Client`] and buffers the whole body
///
/// Credentials and mode are browser policies with no reqwest counterpart,
/// they are carried on the request but not enforced here.
#[async_trait]
impl RequestExecutor for reqwest::Client {
    async fn execute(&self, request: Request) -> Result<Response> {
        let url = request.url.clone();
        let mut builder = self
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;

        let status = response.status();
        let status_text = reason_phrase(&response);
        let headers = response.headers().clone();
        let final_url = response.url().clone();
        let redirected = final_url != url;

        let body = response.bytes().await?;
        let body = (!body.is_empty()).then_some(body);

        Ok(Response::from_parts(
            status.as_u16(),
            status_text,
            headers,
            Some(final_url),
            redirected,
            body,
        ))
    }
}

/// Reason phrase the server sent
///
/// hyper only keeps the phrase when it differs from the canonical one
/// (an empty phrase included). HTTP/2 and later carry none.
fn reason_phrase(response: &reqwest::Response) -> String {
    if response.version() >= Version::HTTP_2 {
        return String::new();
    }

    match response.extensions().get::<ReasonPhrase>() {
        Some(reason) => String::from_utf8_lossy(reason.as_bytes()).into_owned(),
        None => response
            .status()
            .canonical_reason()
            .unwrap_or_default()
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let request = Request {
            method: http::Method::GET,
            url: url::Url::parse("http://127.0.0.1:1/").expect("valid URL"),
            headers: Default::default(),
            body: None,
            credentials: Default::default(),
            mode: Default::default(),
            signal: None,
        };

        let client = reqwest::Client::new();
        let error = RequestExecutor::execute(&client, request)
            .await
            .expect_err("nothing listens on port 1");
        assert_eq!(error.name(), "TypeError");
    }
}
