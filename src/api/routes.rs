/*
 * Responsibility
 * - Gateway URL layout
 * - /health is served locally; everything under /alfresco is proxied to the ECM host
 */
use axum::{
    Router,
    routing::{any, get},
};

use crate::api::handlers::{health::health, proxy::forward};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/alfresco", any(forward))
        .route("/alfresco/{*path}", any(forward))
}
