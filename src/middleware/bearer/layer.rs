use std::sync::Arc;

use tower::Layer;

use crate::middleware::bearer::{exclusions::ExclusionSet, service::BearerService};
use crate::services::auth::ProviderResolver;

/// Builds [`BearerService`]s.
///
/// Every service produced by one layer shares the same exclusion cache, so the
/// patterns are compiled once per layer. Build a new layer to start uncompiled.
#[derive(Clone, Debug)]
pub struct BearerLayer {
    resolver: ProviderResolver,
    exclusions: Arc<ExclusionSet>,
}

impl BearerLayer {
    pub fn new(resolver: ProviderResolver) -> Self {
        Self {
            resolver,
            exclusions: Arc::new(ExclusionSet::new()),
        }
    }
}

impl<S> Layer<S> for BearerLayer {
    type Service = BearerService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BearerService::new(inner, self.resolver.clone(), Arc::clone(&self.exclusions))
    }
}
