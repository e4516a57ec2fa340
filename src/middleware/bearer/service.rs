use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::http::Request;
use tower::{BoxError, Service};

use crate::middleware::bearer::exclusions::ExclusionSet;
use crate::services::auth::ProviderResolver;

/// Outgoing-request decorator: attaches a bearer token unless the URL is excluded.
///
/// Errors from the provider or from `inner` are boxed, never wrapped, so
/// `err.downcast_ref::<E>()` yields the original value.
#[derive(Clone, Debug)]
pub struct BearerService<S> {
    inner: S,
    resolver: ProviderResolver,
    exclusions: Arc<ExclusionSet>,
}

impl<S> BearerService<S> {
    pub(crate) fn new(inner: S, resolver: ProviderResolver, exclusions: Arc<ExclusionSet>) -> Self {
        Self {
            inner,
            resolver,
            exclusions,
        }
    }

    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }
}

impl<S, B> Service<Request<B>> for BearerService<S>
where
    S: Service<Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Response: 'static,
    S::Error: Into<BoxError>,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<S::Response, BoxError>> + Send + 'static>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        // Take the service that was polled ready; leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let resolver = self.resolver.clone();
        let exclusions = Arc::clone(&self.exclusions);

        Box::pin(async move {
            let req = decorate(req, &resolver, &exclusions).await?;
            inner.call(req).await.map_err(Into::into)
        })
    }
}

/// Applies the token policy and returns the request to forward.
async fn decorate<B>(
    req: Request<B>,
    resolver: &ProviderResolver,
    exclusions: &ExclusionSet,
) -> Result<Request<B>, BoxError> {
    let Some(provider) = resolver.resolve() else {
        tracing::trace!(uri = %req.uri(), "no auth provider registered; passing through");
        return Ok(req);
    };

    if !provider.has_excluded_urls() {
        tracing::trace!(uri = %req.uri(), "auth provider has no exclusion list; passing through");
        return Ok(req);
    }

    exclusions.compile_once(|| provider.bearer_excluded_urls());

    let url = req.uri().to_string();
    if exclusions.is_excluded(&url) {
        tracing::trace!(uri = %url, "excluded url; passing through");
        return Ok(req);
    }

    let headers = provider.add_token_to_header(req.headers().clone()).await?;

    let (mut parts, body) = req.into_parts();
    parts.headers = headers;
    Ok(Request::from_parts(parts, body))
}
