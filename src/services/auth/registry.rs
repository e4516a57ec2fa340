//! Late-bound provider lookup.
//!
//! The interceptor is built before the provider may exist, so it holds a resolver
//! closure and asks it for the current provider on every call.
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::services::auth::provider::AuthProvider;

pub type ProviderHandle = Arc<dyn AuthProvider>;

/// Accessor closure returning the provider currently in effect (if any).
#[derive(Clone)]
pub struct ProviderResolver(Arc<dyn Fn() -> Option<ProviderHandle> + Send + Sync>);

impl ProviderResolver {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Option<ProviderHandle> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Always resolves to `provider`.
    pub fn fixed(provider: ProviderHandle) -> Self {
        Self::new(move || Some(Arc::clone(&provider)))
    }

    /// Never resolves; every request passes untouched.
    pub fn none() -> Self {
        Self::new(|| None)
    }

    pub fn resolve(&self) -> Option<ProviderHandle> {
        (self.0)()
    }
}

impl fmt::Debug for ProviderResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderResolver").finish_non_exhaustive()
    }
}

/// Process-wide slot a provider can be registered into after start-up.
///
/// Cheap to clone; all clones share the same slot.
#[derive(Clone, Default)]
pub struct AuthRegistry {
    slot: Arc<RwLock<Option<ProviderHandle>>>,
}

impl AuthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, provider: ProviderHandle) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(provider);
    }

    pub fn clear(&self) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }

    pub fn current(&self) -> Option<ProviderHandle> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_registered(&self) -> bool {
        self.current().is_some()
    }

    pub fn resolver(&self) -> ProviderResolver {
        let registry = self.clone();
        ProviderResolver::new(move || registry.current())
    }
}

impl fmt::Debug for AuthRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthRegistry")
            .field("registered", &self.is_registered())
            .finish()
    }
}
