use crate::constants::{env, network};
use crate::errors::GatewayError;
use crate::services::envelope::{unwrap_success, upstream_failure};
use crate::services::logger::Logger;
use crate::services::session::Session;
use crate::services::transport::{endpoint_url, OutboundRequest, Transport};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use url::Url;

/// Exchanges the refresh token for a new access token.
///
/// Refreshes are serialised: callers that observed the same expired token
/// share one exchange instead of racing each other.
pub struct TokenRefresher {
    logger: Logger,
    session: Arc<Session>,
    transport: Arc<dyn Transport>,
    base_url: Url,
    timeout: Duration,
    inflight: Mutex<()>,
}

impl TokenRefresher {
    pub fn new(
        logger: Logger,
        session: Arc<Session>,
        transport: Arc<dyn Transport>,
        base_url: Url,
        timeout: Duration,
    ) -> Self {
        Self {
            logger: logger.child("refresh"),
            session,
            transport,
            base_url,
            timeout,
            inflight: Mutex::new(()),
        }
    }

    /// Unconditional refresh.
    pub async fn refresh(&self) -> Result<String, GatewayError> {
        let _guard = self.inflight.lock().await;
        self.exchange().await
    }

    /// Refreshes only if the session still holds `stale`; otherwise returns
    /// the token another caller already obtained.
    pub async fn refresh_stale(&self, stale: &str) -> Result<String, GatewayError> {
        let _guard = self.inflight.lock().await;
        let current = self.session.access_token().await;
        if current != stale {
            self.logger
                .debug("access token already refreshed by a concurrent call", None);
            return Ok(current);
        }
        self.exchange().await
    }

    async fn exchange(&self) -> Result<String, GatewayError> {
        let app_id = self.session.app_id().ok_or_else(|| missing(env::APP_ID))?;
        let secret = self
            .session
            .app_secret()
            .ok_or_else(|| missing(env::APP_SECRET))?;
        let refresh_token = self
            .session
            .refresh_token()
            .await
            .ok_or_else(|| missing(env::REFRESH_TOKEN))?;

        let endpoint = network::REFRESH_TOKEN_ENDPOINT;
        let request = OutboundRequest {
            method: Method::POST,
            url: endpoint_url(&self.base_url, endpoint)?,
            endpoint: endpoint.to_string(),
            headers: vec![(
                "Content-Type".to_string(),
                network::CONTENT_TYPE_JSON.to_string(),
            )],
            query: Vec::new(),
            body: Some(serde_json::json!({
                "app_id": app_id,
                "secret": secret,
                "refresh_token": refresh_token,
                "grant_type": "refresh_token",
            })),
            timeout: self.timeout,
        };

        self.logger.info("refreshing access token", None);
        let response = self.transport.send(request).await?;
        let secrets = self.session.known_secrets().await;
        if !response.is_success() {
            let err = upstream_failure(endpoint, &response, &secrets);
            self.logger.error(
                "token refresh rejected",
                Some(&serde_json::json!({"http_status": response.status})),
            );
            return Err(err);
        }
        let data = unwrap_success(endpoint, &response, &secrets)?;

        let access_token = non_empty(&data, "access_token").ok_or_else(|| {
            GatewayError::Upstream {
                endpoint: endpoint.to_string(),
                http_status: response.status,
                code: None,
                message: "refresh response did not include an access_token".to_string(),
                request_id: None,
            }
        })?;
        let rotated = non_empty(&data, "refresh_token");

        self.session
            .replace_tokens(access_token.clone(), rotated)
            .await;
        self.logger.info("access token refreshed", None);
        Ok(access_token)
    }
}

fn missing(var: &str) -> GatewayError {
    GatewayError::config(format!("{} is required to refresh the access token", var))
}

fn non_empty(data: &Value, key: &str) -> Option<String> {
    data.get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
