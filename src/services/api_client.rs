use crate::config::GatewayConfig;
use crate::constants::network::{ACCESS_TOKEN_HEADER, CONTENT_TYPE_JSON};
use crate::errors::GatewayError;
use crate::services::envelope::{unwrap_success, upstream_failure};
use crate::services::logger::Logger;
use crate::services::rate_limiter::RateLimiter;
use crate::services::session::Session;
use crate::services::token_refresher::TokenRefresher;
use crate::services::transport::{endpoint_url, OutboundRequest, Transport};
use reqwest::Method;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const HTTP_UNAUTHORIZED: u16 = 401;
const HTTP_TOO_MANY_REQUESTS: u16 = 429;

/// Authenticated, rate-limited access to the TikTok Business API.
///
/// Every attempt waits for limiter admission. A 429 is retried once after a
/// fixed cooldown; a 401 triggers at most one token refresh and retry.
pub struct ApiClient {
    logger: Logger,
    transport: Arc<dyn Transport>,
    limiter: Arc<RateLimiter>,
    session: Arc<Session>,
    refresher: Option<Arc<TokenRefresher>>,
    base_url: Url,
    timeout: Duration,
    throttle_cooldown: Duration,
}

impl ApiClient {
    pub fn new(
        logger: Logger,
        config: &GatewayConfig,
        transport: Arc<dyn Transport>,
        limiter: Arc<RateLimiter>,
        session: Arc<Session>,
        refresher: Option<Arc<TokenRefresher>>,
    ) -> Self {
        Self {
            logger: logger.child("client"),
            transport,
            limiter,
            session,
            refresher,
            base_url: config.base_url.clone(),
            timeout: config.request_timeout,
            throttle_cooldown: config.throttle_cooldown,
        }
    }

    pub async fn call(
        &self,
        method: Method,
        endpoint: &str,
        payload: &Map<String, Value>,
    ) -> Result<Value, GatewayError> {
        let mut throttled = false;
        let mut refreshed = false;

        loop {
            self.limiter.acquire().await;
            let token = self.session.access_token().await;
            let request = self.build_request(&method, endpoint, payload, &token)?;
            self.logger.debug(
                "sending request",
                Some(&serde_json::json!({"method": method.as_str(), "endpoint": endpoint})),
            );
            let response = self.transport.send(request).await?;

            match response.status {
                HTTP_TOO_MANY_REQUESTS if !throttled => {
                    throttled = true;
                    self.logger.warn(
                        "upstream throttled request, retrying after cooldown",
                        Some(&serde_json::json!({
                            "endpoint": endpoint,
                            "cooldown_ms": self.throttle_cooldown.as_millis() as u64,
                        })),
                    );
                    tokio::time::sleep(self.throttle_cooldown).await;
                }
                HTTP_TOO_MANY_REQUESTS => {
                    return Err(GatewayError::RateLimited {
                        endpoint: endpoint.to_string(),
                    });
                }
                HTTP_UNAUTHORIZED => {
                    let refresher = match (&self.refresher, refreshed) {
                        (Some(refresher), false) => refresher,
                        (None, _) => {
                            return Err(GatewayError::auth(
                                endpoint,
                                "access token rejected (HTTP 401) and no refresh token is configured",
                            ));
                        }
                        (Some(_), true) => {
                            return Err(GatewayError::auth(
                                endpoint,
                                "access token rejected (HTTP 401) again after refreshing it",
                            ));
                        }
                    };
                    refreshed = true;
                    self.logger.warn(
                        "access token rejected, refreshing once",
                        Some(&serde_json::json!({"endpoint": endpoint})),
                    );
                    refresher.refresh_stale(&token).await?;
                }
                status if !response.is_success() => {
                    let secrets = self.session.known_secrets().await;
                    let err = upstream_failure(endpoint, &response, &secrets);
                    self.logger.warn(
                        "upstream returned an error status",
                        Some(&serde_json::json!({"endpoint": endpoint, "http_status": status})),
                    );
                    return Err(err);
                }
                _ => {
                    let secrets = self.session.known_secrets().await;
                    return unwrap_success(endpoint, &response, &secrets);
                }
            }
        }
    }

    fn build_request(
        &self,
        method: &Method,
        endpoint: &str,
        payload: &Map<String, Value>,
        token: &str,
    ) -> Result<OutboundRequest, GatewayError> {
        let (query, body) = if *method == Method::GET {
            (to_query_pairs(payload), None)
        } else {
            (Vec::new(), Some(Value::Object(payload.clone())))
        };
        Ok(OutboundRequest {
            method: method.clone(),
            url: endpoint_url(&self.base_url, endpoint)?,
            endpoint: endpoint.to_string(),
            headers: vec![
                (ACCESS_TOKEN_HEADER.to_string(), token.to_string()),
                ("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string()),
            ],
            query,
            body,
            timeout: self.timeout,
        })
    }
}

/// GET parameters: scalars as text, arrays and objects JSON-encoded.
pub fn to_query_pairs(payload: &Map<String, Value>) -> Vec<(String, String)> {
    payload
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(text) => text.clone(),
                Value::Number(_) | Value::Bool(_) => value.to_string(),
                _ => serde_json::to_string(value).unwrap_or_default(),
            };
            (key.clone(), rendered)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_encode_structured_values_as_json() {
        let payload = serde_json::json!({
            "advertiser_id": "123",
            "page": 2,
            "filtering": {"campaign_ids": ["c1", "c2"]},
            "fields": ["campaign_id", "budget"],
            "skip": null,
        });
        let pairs = to_query_pairs(payload.as_object().expect("object"));
        let lookup = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(lookup("advertiser_id"), Some("123"));
        assert_eq!(lookup("page"), Some("2"));
        assert_eq!(
            lookup("filtering"),
            Some(r#"{"campaign_ids":["c1","c2"]}"#)
        );
        assert_eq!(lookup("fields"), Some(r#"["campaign_id","budget"]"#));
        assert_eq!(lookup("skip"), None);
    }
}
