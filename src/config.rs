/*
 * Responsibility
 * - Read environment variables (.env supported): ECM host, bearer token, exclusions, CORS
 * - Validate values (fail start-up when something required is missing or malformed)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::middleware::bearer::compile_pattern;

pub const DEFAULT_BEARER_EXCLUDED_URLS: &str = "auth/realms,resources/,assets/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub ecm_host: Url,
    pub upstream_timeout: Duration,
    pub max_body_bytes: usize,

    pub auth_token: Option<String>,
    /// `None` disables the exclusion policy entirely (`BEARER_EXCLUDED_URLS=none`).
    pub bearer_excluded_urls: Option<Vec<String>>,

    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let ecm_host = std::env::var("ECM_HOST").map_err(|_| ConfigError::Missing("ECM_HOST"))?;
        let ecm_host = parse_ecm_host(&ecm_host)?;

        let upstream_timeout = std::env::var("UPSTREAM_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        let max_body_bytes = std::env::var("MAX_BODY_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1024 * 1024);

        let auth_token = std::env::var("AUTH_TOKEN")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let bearer_excluded_urls = parse_excluded_urls(
            &std::env::var("BEARER_EXCLUDED_URLS")
                .unwrap_or_else(|_| DEFAULT_BEARER_EXCLUDED_URLS.to_string()),
        );
        validate_excluded_urls(bearer_excluded_urls.as_deref())?;

        let cors_allowed_origins = split_list(&std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        Ok(Self {
            addr,
            app_env,
            ecm_host,
            upstream_timeout,
            max_body_bytes,
            auth_token,
            bearer_excluded_urls,
            cors_allowed_origins,
        })
    }
}

fn parse_ecm_host(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|_| ConfigError::Invalid("ECM_HOST"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::Invalid("ECM_HOST")),
    }
}

fn parse_excluded_urls(raw: &str) -> Option<Vec<String>> {
    if raw.trim().eq_ignore_ascii_case("none") {
        return None;
    }
    Some(split_list(raw))
}

/// Every exclusion pattern must compile.
fn validate_excluded_urls(patterns: Option<&[String]>) -> Result<(), ConfigError> {
    for pattern in patterns.unwrap_or_default() {
        compile_pattern(pattern).map_err(|_| ConfigError::Invalid("BEARER_EXCLUDED_URLS"))?;
    }
    Ok(())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
