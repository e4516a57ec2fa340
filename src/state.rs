/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 *   - upstream ECM host + the bearer-decorated client pipeline
 * - Cheap to clone (the pipeline shares its exclusion cache through an Arc)
 */
use url::Url;

use crate::middleware::bearer::BearerService;
use crate::services::HttpTransport;

/// Client pipeline used for every proxied call.
pub type Upstream = BearerService<HttpTransport>;

#[derive(Clone, Debug)]
pub struct AppState {
    pub ecm_host: Url,
    pub upstream: Upstream,
}

impl AppState {
    pub fn new(ecm_host: Url, upstream: Upstream) -> Self {
        Self { ecm_host, upstream }
    }
}
