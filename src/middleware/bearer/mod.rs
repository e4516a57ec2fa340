//! Bearer token injection for outgoing requests.
//!
//! Per request:
//! 1. resolve the current auth provider (every call, never cached)
//! 2. no provider, or no exclusion list: forward unmodified
//! 3. compile the exclusion patterns (first request only)
//! 4. excluded URL: forward unmodified
//! 5. otherwise forward a copy carrying the provider's token headers
//!
//! ```ignore
//! let client = ServiceBuilder::new()
//!     .layer(BearerLayer::new(registry.resolver()))
//!     .service(HttpTransport::new(timeout, limit)?);
//! ```
mod exclusions;
mod layer;
mod service;

pub use exclusions::{ExclusionSet, compile_pattern};
pub use layer::BearerLayer;
pub use service::BearerService;
