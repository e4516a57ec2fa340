pub mod factory;
pub mod provider;
pub mod registry;
pub mod static_token;

pub use factory::build_auth_registry;
pub use provider::{AuthError, AuthProvider};
pub use registry::{AuthRegistry, ProviderHandle, ProviderResolver};
pub use static_token::StaticTokenProvider;
