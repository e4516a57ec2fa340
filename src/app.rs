/*
 * Responsibility
 * - Logging init -> Config -> auth registry -> upstream pipeline -> Router
 * - Middleware (HTTP layers / CORS)
 * - axum::serve()
 */
use anyhow::Result;
use axum::Router;
use tower::Layer;
use tracing_subscriber::EnvFilter;

use crate::{
    api,
    config::Config,
    middleware::{self, bearer::BearerLayer},
    services::{HttpTransport, auth::build_auth_registry},
    state::AppState,
};

pub async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!(ecm_host = %config.ecm_host, "configuration loaded");

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "gateway listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Builds the bearer-decorated upstream pipeline.
pub fn build_state(config: &Config) -> Result<AppState> {
    let registry = build_auth_registry(config);
    let transport = HttpTransport::new(config.upstream_timeout, config.max_body_bytes)?;
    let upstream = BearerLayer::new(registry.resolver()).layer(transport);

    Ok(AppState::new(config.ecm_host.clone(), upstream))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new().merge(api::routes()).with_state(state);
    let router = middleware::http::apply(router, config);
    middleware::cors::apply(router, config)
}
