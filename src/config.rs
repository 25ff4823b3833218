//! Startup configuration assembled from environment variables.
//!
//! Only the access token is mandatory. Refresh credentials are optional as a
//! group; when a refresh token is present the client gains a token refresher,
//! and missing app credentials surface at refresh time.

use crate::constants::{env, network, rate_limit};
use crate::errors::GatewayError;
use std::fmt;
use std::time::Duration;
use url::Url;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: rate_limit::MAX_REQUESTS,
            window: Duration::from_millis(rate_limit::WINDOW_MS),
        }
    }
}

#[derive(Clone)]
pub struct GatewayConfig {
    pub access_token: String,
    pub advertiser_id: Option<String>,
    pub app_id: Option<String>,
    pub app_secret: Option<String>,
    pub refresh_token: Option<String>,
    pub base_url: Url,
    pub rate_limit: RateLimitConfig,
    pub request_timeout: Duration,
    pub throttle_cooldown: Duration,
}

impl GatewayConfig {
    /// Minimal config with defaults for everything but the access token.
    pub fn new(access_token: impl Into<String>) -> Result<Self, GatewayError> {
        Ok(Self {
            access_token: access_token.into(),
            advertiser_id: None,
            app_id: None,
            app_secret: None,
            refresh_token: None,
            base_url: parse_base_url(network::DEFAULT_API_BASE_URL)?,
            rate_limit: RateLimitConfig::default(),
            request_timeout: Duration::from_millis(network::TIMEOUT_API_REQUEST_MS),
            throttle_cooldown: Duration::from_millis(network::THROTTLE_COOLDOWN_MS),
        })
    }

    pub fn from_env() -> Result<Self, GatewayError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, GatewayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let access_token = read(env::ACCESS_TOKEN).ok_or_else(|| {
            GatewayError::config(format!(
                "{} is required (TikTok Business API access token)",
                env::ACCESS_TOKEN
            ))
        })?;

        let mut config = Self::new(access_token)?;
        config.advertiser_id = read(env::ADVERTISER_ID);
        config.app_id = read(env::APP_ID);
        config.app_secret = read(env::APP_SECRET);
        config.refresh_token = read(env::REFRESH_TOKEN);

        if let Some(raw) = read(env::API_BASE_URL) {
            config.base_url = parse_base_url(&raw)?;
        }

        if let Some(raw) = read(env::RATE_LIMIT) {
            let max_requests = raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    GatewayError::config(format!(
                        "{} must be a positive integer (got '{}')",
                        env::RATE_LIMIT,
                        raw
                    ))
                })?;
            config.rate_limit.max_requests = max_requests;
        }

        Ok(config)
    }

    pub fn refresh_enabled(&self) -> bool {
        self.refresh_token.is_some()
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("GatewayConfig")
            .field("access_token", &"[REDACTED]")
            .field("advertiser_id", &self.advertiser_id)
            .field("app_id", &self.app_id)
            .field("app_secret", &mask(&self.app_secret))
            .field("refresh_token", &mask(&self.refresh_token))
            .field("base_url", &self.base_url.as_str())
            .field("rate_limit", &self.rate_limit)
            .field("request_timeout", &self.request_timeout)
            .field("throttle_cooldown", &self.throttle_cooldown)
            .finish()
    }
}

fn parse_base_url(raw: &str) -> Result<Url, GatewayError> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    let url = Url::parse(&normalized)
        .map_err(|err| GatewayError::config(format!("invalid API base URL '{}': {}", raw, err)))?;
    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(GatewayError::config(format!(
            "API base URL must use http or https (got '{}')",
            url.scheme()
        )));
    }
    Ok(url)
}
