//! Factory: build the `AuthRegistry` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{AuthRegistry, StaticTokenProvider};

pub fn build_auth_registry(config: &Config) -> AuthRegistry {
    let registry = AuthRegistry::new();

    match config.auth_token.as_deref() {
        Some(token) => {
            let provider =
                StaticTokenProvider::new(token, config.bearer_excluded_urls.clone());
            registry.register(Arc::new(provider));
            tracing::info!("static token provider registered");
        }
        None => {
            tracing::warn!("AUTH_TOKEN not set; requests are forwarded without a bearer token");
        }
    }

    registry
}
