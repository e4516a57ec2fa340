//! Terminal pipeline stage: performs the actual upstream HTTP call.
//!
//! Request bodies are buffered (up to `max_body_bytes`); response bodies are streamed
//! back as they arrive, so status and headers are available before the body is read.
//! The upstream timeout is owned here; the bearer layer never imposes one.
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderMap, Request, Response, header};
use thiserror::Error;
use tower::Service;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to read request body: {0}")]
    Body(String),
    #[error("upstream request failed: {0}")]
    Request(#[from] reqwest::Error),
}

#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    max_body_bytes: usize,
}

impl HttpTransport {
    pub fn new(timeout: Duration, max_body_bytes: usize) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            max_body_bytes,
        })
    }
}

impl Service<Request<Body>> for HttpTransport {
    type Response = Response<Body>;
    type Error = TransportError;
    type Future = Pin<Box<dyn Future<Output = Result<Response<Body>, TransportError>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // reqwest::Client pools connections internally.
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let client = self.client.clone();
        let limit = self.max_body_bytes;
        Box::pin(send(client, req, limit))
    }
}

async fn send(
    client: reqwest::Client,
    req: Request<Body>,
    limit: usize,
) -> Result<Response<Body>, TransportError> {
    let (parts, body) = req.into_parts();
    let body = axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| TransportError::Body(e.to_string()))?;

    let upstream = client
        .request(parts.method, parts.uri.to_string())
        .headers(parts.headers)
        .body(body)
        .send()
        .await?;

    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    strip_hop_by_hop(&mut headers);

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

/// Removes headers that describe a single connection rather than the message.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in [
        header::CONNECTION,
        header::TRANSFER_ENCODING,
        header::UPGRADE,
        header::TE,
        header::TRAILER,
    ] {
        headers.remove(name);
    }
    headers.remove("keep-alive");
}
