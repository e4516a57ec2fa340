//! Bearer interceptor behaviour against stub pipelines.
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderValue, Request, header::AUTHORIZATION};
use tower::{BoxError, Layer, ServiceExt, service_fn};

use content_gateway::middleware::bearer::BearerLayer;
use content_gateway::services::auth::{
    AuthError, AuthProvider, AuthRegistry, ProviderResolver, StaticTokenProvider,
};

// ============================================================================
// Stubs
// ============================================================================

struct TestProvider {
    excluded: RwLock<Option<Vec<String>>>,
    fail_with: Option<&'static str>,
    list_calls: AtomicUsize,
    token_calls: AtomicUsize,
}

impl TestProvider {
    fn new(excluded: Option<&[&str]>) -> Arc<Self> {
        Arc::new(Self {
            excluded: RwLock::new(excluded.map(to_strings)),
            fail_with: None,
            list_calls: AtomicUsize::new(0),
            token_calls: AtomicUsize::new(0),
        })
    }

    fn failing(message: &'static str) -> Arc<Self> {
        Arc::new(Self {
            excluded: RwLock::new(Some(vec![])),
            fail_with: Some(message),
            list_calls: AtomicUsize::new(0),
            token_calls: AtomicUsize::new(0),
        })
    }

    fn set_excluded(&self, excluded: &[&str]) {
        *self.excluded.write().unwrap() = Some(to_strings(excluded));
    }

    fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthProvider for TestProvider {
    fn bearer_excluded_urls(&self) -> Option<Vec<String>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.excluded.read().unwrap().clone()
    }

    fn has_excluded_urls(&self) -> bool {
        self.excluded.read().unwrap().is_some()
    }

    async fn add_token_to_header(&self, mut headers: HeaderMap) -> Result<HeaderMap, AuthError> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.fail_with {
            return Err(AuthError::Provider(message.to_string()));
        }
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer secret"));
        Ok(headers)
    }
}

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("connection reset by peer ({code})")]
struct NetworkError {
    code: i32,
}

fn to_strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Downstream that hands back the request it received.
async fn echo(req: Request<String>) -> Result<Request<String>, Infallible> {
    Ok(req)
}

fn request(uri: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header("x-custom", "kept")
        .body("payload".to_string())
        .unwrap()
}

async fn send(resolver: ProviderResolver, uri: &str) -> Request<String> {
    BearerLayer::new(resolver)
        .layer(service_fn(echo))
        .oneshot(request(uri))
        .await
        .unwrap()
}

// ============================================================================
// Exclusion policy
// ============================================================================

#[tokio::test]
async fn excluded_url_reaches_downstream_unmodified() {
    let provider = TestProvider::new(Some(&["^/public/.*"]));

    let seen = send(ProviderResolver::fixed(provider.clone()), "/public/health").await;

    assert!(seen.headers().get(AUTHORIZATION).is_none());
    assert_eq!(seen.headers().get("x-custom").unwrap(), "kept");
    assert_eq!(seen.uri(), "/public/health");
    assert_eq!(seen.body(), "payload");
    assert_eq!(provider.token_calls(), 0);
}

#[tokio::test]
async fn other_urls_carry_the_token_and_original_headers() {
    let provider = TestProvider::new(Some(&["^/public/.*"]));

    let seen = send(ProviderResolver::fixed(provider.clone()), "/api/data").await;

    assert_eq!(seen.headers().get(AUTHORIZATION).unwrap(), "Bearer secret");
    assert_eq!(seen.headers().get("x-custom").unwrap(), "kept");
    assert_eq!(seen.uri(), "/api/data");
    assert_eq!(seen.body(), "payload");
    assert_eq!(provider.token_calls(), 1);
}

#[tokio::test]
async fn exclusion_is_case_insensitive() {
    let provider = TestProvider::new(Some(&["^/public/.*"]));

    let seen = send(ProviderResolver::fixed(provider.clone()), "/PUBLIC/Health").await;

    assert!(seen.headers().get(AUTHORIZATION).is_none());
    assert_eq!(provider.token_calls(), 0);
}

#[tokio::test]
async fn patterns_match_anywhere_in_absolute_urls() {
    let provider = TestProvider::new(Some(&["auth/realms", "assets/"]));
    let resolver = ProviderResolver::fixed(provider.clone());

    let token = send(
        resolver.clone(),
        "https://sso.example.com/auth/realms/alfresco/protocol/openid-connect/token",
    )
    .await;
    let asset = send(resolver.clone(), "http://localhost:4200/assets/app.config.json").await;
    let api = send(resolver, "http://localhost:4200/alfresco/api/-default-/public/alfresco/versions/1/sites").await;

    assert!(token.headers().get(AUTHORIZATION).is_none());
    assert!(asset.headers().get(AUTHORIZATION).is_none());
    assert_eq!(api.headers().get(AUTHORIZATION).unwrap(), "Bearer secret");
}

#[tokio::test]
async fn lookahead_exclusion_keeps_third_party_urls_token_free() {
    let provider = Arc::new(StaticTokenProvider::new(
        "secret",
        Some(vec!["^(?!.*/alfresco/)".to_string()]),
    ));
    let resolver = ProviderResolver::fixed(provider);

    let cdn = send(resolver.clone(), "https://third-party.example.com/cdn/x").await;
    let ecm = send(resolver, "https://ecm.example.com/alfresco/api/-default-/public/alfresco/versions/1/sites").await;

    assert!(cdn.headers().get(AUTHORIZATION).is_none());
    assert_eq!(ecm.headers().get(AUTHORIZATION).unwrap(), "Bearer secret");
}

#[tokio::test]
async fn invalid_pattern_withholds_the_token_everywhere() {
    let provider = TestProvider::new(Some(&["([unclosed", "^/public"]));

    let seen = send(ProviderResolver::fixed(provider.clone()), "/api/data").await;

    assert!(seen.headers().get(AUTHORIZATION).is_none());
    assert_eq!(seen.body(), "payload");
    assert_eq!(provider.token_calls(), 0);
}

#[tokio::test]
async fn empty_exclusion_list_excludes_nothing() {
    let provider = TestProvider::new(Some(&[]));

    let seen = send(ProviderResolver::fixed(provider.clone()), "/public/health").await;

    assert_eq!(seen.headers().get(AUTHORIZATION).unwrap(), "Bearer secret");
    assert_eq!(provider.token_calls(), 1);
}

#[tokio::test]
async fn provider_without_exclusion_list_passes_everything() {
    let provider = TestProvider::new(None);
    let resolver = ProviderResolver::fixed(provider.clone());

    for uri in ["/api/data", "/public/health", "https://ecm.example.com/alfresco/api"] {
        let seen = send(resolver.clone(), uri).await;
        assert!(seen.headers().get(AUTHORIZATION).is_none(), "{uri}");
    }
    assert_eq!(provider.token_calls(), 0);
}

// ============================================================================
// Provider resolution
// ============================================================================

#[tokio::test]
async fn unregistered_provider_passes_through() {
    let registry = AuthRegistry::new();

    let seen = send(registry.resolver(), "/api/data").await;

    assert!(seen.headers().get(AUTHORIZATION).is_none());
}

#[tokio::test]
async fn provider_registered_after_build_is_used() {
    let registry = AuthRegistry::new();
    let service = BearerLayer::new(registry.resolver()).layer(service_fn(echo));

    let before = service.clone().oneshot(request("/api/data")).await.unwrap();
    assert!(before.headers().get(AUTHORIZATION).is_none());

    registry.register(TestProvider::new(Some(&[])));

    let after = service.oneshot(request("/api/data")).await.unwrap();
    assert_eq!(after.headers().get(AUTHORIZATION).unwrap(), "Bearer secret");
}

// ============================================================================
// Compilation lifecycle
// ============================================================================

#[tokio::test]
async fn patterns_are_memoized_after_first_request() {
    let provider = TestProvider::new(Some(&["^/public"]));
    let service = BearerLayer::new(ProviderResolver::fixed(provider.clone())).layer(service_fn(echo));
    assert!(!service.exclusions().is_compiled());

    service.clone().oneshot(request("/public/a")).await.unwrap();
    assert!(service.exclusions().is_compiled());

    provider.set_excluded(&["^/api"]);

    let public = service.clone().oneshot(request("/public/b")).await.unwrap();
    let api = service.oneshot(request("/api/data")).await.unwrap();

    assert!(public.headers().get(AUTHORIZATION).is_none());
    assert_eq!(api.headers().get(AUTHORIZATION).unwrap(), "Bearer secret");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_requests_compile_once() {
    const REQUESTS: usize = 32;

    let provider = TestProvider::new(Some(&["^/public"]));
    let service = BearerLayer::new(ProviderResolver::fixed(provider.clone())).layer(service_fn(echo));

    let handles: Vec<_> = (0..REQUESTS)
        .map(|i| {
            let service = service.clone();
            let uri = if i % 2 == 0 { "/public/x" } else { "/api/x" };
            tokio::spawn(async move { service.oneshot(request(uri)).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // The list is read once, for compilation.
    assert_eq!(provider.list_calls.load(Ordering::SeqCst), 1);
    assert_eq!(provider.token_calls(), REQUESTS / 2);
}

#[tokio::test]
async fn new_layer_starts_uncompiled() {
    let provider = TestProvider::new(Some(&["^/public"]));
    let first = BearerLayer::new(ProviderResolver::fixed(provider.clone())).layer(service_fn(echo));
    first.clone().oneshot(request("/public/a")).await.unwrap();

    provider.set_excluded(&["^/api"]);
    let second = BearerLayer::new(ProviderResolver::fixed(provider.clone())).layer(service_fn(echo));
    let seen = second.oneshot(request("/api/data")).await.unwrap();

    assert!(first.exclusions().is_compiled());
    assert!(seen.headers().get(AUTHORIZATION).is_none());
}

// ============================================================================
// Error relay
// ============================================================================

#[tokio::test]
async fn downstream_error_is_relayed_unchanged() {
    let provider = TestProvider::new(Some(&["^/public"]));
    let failing = service_fn(|_req: Request<String>| async {
        Err::<Request<String>, _>(NetworkError { code: 104 })
    });
    let layer = BearerLayer::new(ProviderResolver::fixed(provider));

    for uri in ["/api/data", "/public/health"] {
        let err: BoxError = layer.layer(failing.clone()).oneshot(request(uri)).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<NetworkError>(),
            Some(&NetworkError { code: 104 }),
            "{uri}"
        );
    }
}

#[tokio::test]
async fn provider_error_is_relayed_and_downstream_not_called() {
    let provider = TestProvider::failing("token endpoint unavailable");
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = {
        let calls = Arc::clone(&calls);
        service_fn(move |req: Request<String>| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<_, Infallible>(req) }
        })
    };

    let err = BearerLayer::new(ProviderResolver::fixed(provider.clone()))
        .layer(counted)
        .oneshot(request("/api/data"))
        .await
        .unwrap_err();

    match err.downcast_ref::<AuthError>() {
        Some(AuthError::Provider(message)) => assert_eq!(message, "token endpoint unavailable"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(provider.token_calls(), 1);
}
