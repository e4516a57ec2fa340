/*
 * Responsibility
 * - ANY /alfresco/{*path} -> ECM_HOST/alfresco/{*path}?{query}
 * - Forward through the bearer-decorated upstream pipeline
 * - Upstream failures -> 502 (logged here; the pipeline itself relays errors silently)
 */
use axum::{
    extract::{Request, State},
    http::{Uri, header},
    response::Response,
};
use tower::ServiceExt;
use url::Url;

use crate::error::AppError;
use crate::services::transport::strip_hop_by_hop;
use crate::state::AppState;

pub async fn forward(State(state): State<AppState>, req: Request) -> Result<Response, AppError> {
    let target = upstream_uri(&state.ecm_host, req.uri())?;

    let (mut parts, body) = req.into_parts();
    parts.uri = target;
    strip_hop_by_hop(&mut parts.headers);
    // reqwest derives these from the target URL and the buffered body.
    parts.headers.remove(header::HOST);
    parts.headers.remove(header::CONTENT_LENGTH);
    let req = Request::from_parts(parts, body);

    let method = req.method().clone();
    let uri = req.uri().clone();

    match state.upstream.clone().oneshot(req).await {
        Ok(response) => {
            tracing::debug!(%method, %uri, status = %response.status(), "proxied");
            Ok(response)
        }
        Err(err) => {
            tracing::error!(%method, %uri, error = %err, "upstream request failed");
            Err(AppError::BadGateway)
        }
    }
}

/// Joins the ECM host with the incoming path and query.
fn upstream_uri(ecm_host: &Url, incoming: &Uri) -> Result<Uri, AppError> {
    let path_and_query = incoming
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    format!("{}{}", ecm_host.as_str().trim_end_matches('/'), path_and_query)
        .parse::<Uri>()
        .map_err(|_| AppError::bad_request("INVALID_URI", "request uri cannot be forwarded"))
}
