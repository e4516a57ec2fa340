use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION};

use crate::services::auth::provider::{AuthError, AuthProvider};

/// Provider backed by a fixed token (from `AUTH_TOKEN`).
#[derive(Clone, Debug)]
pub struct StaticTokenProvider {
    token: String,
    excluded_urls: Option<Vec<String>>,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>, excluded_urls: Option<Vec<String>>) -> Self {
        Self {
            token: token.into(),
            excluded_urls,
        }
    }
}

#[async_trait]
impl AuthProvider for StaticTokenProvider {
    fn bearer_excluded_urls(&self) -> Option<Vec<String>> {
        self.excluded_urls.clone()
    }

    fn has_excluded_urls(&self) -> bool {
        self.excluded_urls.is_some()
    }

    async fn add_token_to_header(&self, mut headers: HeaderMap) -> Result<HeaderMap, AuthError> {
        if self.token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let value = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|e| AuthError::InvalidHeader(e.to_string()))?;

        // Replaces any Authorization the caller already set.
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }
}
