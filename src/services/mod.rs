pub mod auth;
pub mod sites;
pub mod transport;

pub use transport::{HttpTransport, TransportError};
