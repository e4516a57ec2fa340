//! Content gateway: proxies browser calls to a content repository and attaches
//! bearer tokens to outgoing requests, skipping configured public URLs.
//!
//! The token policy lives in [`middleware::bearer`] and wraps any
//! `tower::Service<http::Request<B>>`, not only the gateway's own transport.
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
