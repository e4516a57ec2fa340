//! HTTP-level middleware for the gateway's inbound side.
//!
//! Responsibility:
//! - Request-Id generation + propagation (X-Request-Id)
//! - Access logging / request tracing (TraceLayer)
//! - Body size limits
//! - Global timeout (slightly above the upstream timeout so upstream errors surface as 502)

use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::http::{StatusCode, header::HeaderName};
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Apply inbound HTTP middleware to the given Router.
///
/// Defaults come from `Config`:
/// - Request-Id header: `x-request-id`
/// - Body limit: `MAX_BODY_BYTES`
/// - Timeout: `UPSTREAM_TIMEOUT_SECONDS` + 5 seconds
pub fn apply(router: Router, config: &Config) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);
    let timeout = config.upstream_timeout + Duration::from_secs(5);

    let layers = ServiceBuilder::new()
        // Make the service error `Infallible` by converting errors into responses.
        .layer(HandleErrorLayer::new(|err: BoxError| async move {
            if err.is::<tower::timeout::error::Elapsed>() {
                StatusCode::REQUEST_TIMEOUT
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }))
        // Generate a request id if the caller sent none, then echo it on the response.
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        // Cap inbound bodies at MAX_BODY_BYTES; the transport buffers them before forwarding.
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        // Bound total request time; a hung upstream hits its own timeout first (502).
        .layer(TimeoutLayer::new(timeout))
        // Access log / tracing for every inbound request, proxied or local.
        .layer(TraceLayer::new_for_http());

    router.layer(layers)
}
