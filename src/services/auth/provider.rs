//! Authentication provider contract consumed by the bearer interceptor.
use async_trait::async_trait;
use axum::http::HeaderMap;
use thiserror::Error;

/// Errors raised while producing token-bearing headers.
///
/// The interceptor relays these unchanged (boxed), so callers can
/// `downcast_ref::<AuthError>()` on the pipeline error.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no bearer token available")]
    MissingToken,
    #[error("invalid authorization header: {0}")]
    InvalidHeader(String),
    #[error("auth provider error: {0}")]
    Provider(String),
}

/// A source of bearer tokens plus the list of URLs that must never carry one.
///
/// Implementations are shared behind `Arc<dyn AuthProvider>` and must be cheap to call
/// on every request. Token refresh (if any) is the implementation's business.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// URL patterns excluded from token injection.
    ///
    /// - `None`: the provider has no exclusion policy at all; requests pass untouched
    /// - `Some(vec![])`: nothing is excluded
    fn bearer_excluded_urls(&self) -> Option<Vec<String>>;

    /// Whether an exclusion policy exists, checked on every request.
    ///
    /// Override when the list is expensive to build.
    fn has_excluded_urls(&self) -> bool {
        self.bearer_excluded_urls().is_some()
    }

    /// Returns `headers` with a bearer token merged in.
    async fn add_token_to_header(&self, headers: HeaderMap) -> Result<HeaderMap, AuthError>;
}
