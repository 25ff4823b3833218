#![allow(dead_code)]

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tiktok_ads_mcp::app::App;
use tiktok_ads_mcp::config::GatewayConfig;
use tiktok_ads_mcp::constants::network::REFRESH_TOKEN_ENDPOINT;
use tiktok_ads_mcp::errors::GatewayError;
use tiktok_ads_mcp::services::logger::{LogLevel, Logger};
use tiktok_ads_mcp::services::transport::{OutboundRequest, Transport, TransportResponse};
use tokio::sync::Mutex;
use url::Url;

pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub const STALE_TOKEN: &str = "stale-token";
pub const FRESH_TOKEN: &str = "fresh-token";
pub const BASE_URL: &str = "https://business-api.test/open_api/v1.3/";

type Responder = dyn Fn(&OutboundRequest) -> TransportResponse + Send + Sync;

/// Records every request and answers from a closure, optionally after a
/// simulated network delay (auto-advanced under paused time).
pub struct StubTransport {
    responder: Box<Responder>,
    requests: StdMutex<Vec<OutboundRequest>>,
    delay: Option<Duration>,
}

impl StubTransport {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&OutboundRequest) -> TransportResponse + Send + Sync + 'static,
    {
        Arc::new(Self {
            responder: Box::new(responder),
            requests: StdMutex::new(Vec::new()),
            delay: None,
        })
    }

    pub fn with_delay<F>(delay: Duration, responder: F) -> Arc<Self>
    where
        F: Fn(&OutboundRequest) -> TransportResponse + Send + Sync + 'static,
    {
        Arc::new(Self {
            responder: Box::new(responder),
            requests: StdMutex::new(Vec::new()),
            delay: Some(delay),
        })
    }

    /// Answers API calls in order; the last response repeats once the
    /// script runs out.
    pub fn scripted(responses: Vec<TransportResponse>) -> Arc<Self> {
        let script = StdMutex::new(VecDeque::from(responses));
        Self::new(move |_| {
            let mut script = script.lock().expect("script lock");
            if script.len() > 1 {
                script.pop_front().expect("non-empty script")
            } else {
                script.front().cloned().expect("script needs one response")
            }
        })
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn api_requests(&self) -> Vec<OutboundRequest> {
        self.requests()
            .into_iter()
            .filter(|req| req.endpoint != REFRESH_TOKEN_ENDPOINT)
            .collect()
    }

    pub fn refresh_calls(&self) -> usize {
        self.requests()
            .iter()
            .filter(|req| req.endpoint == REFRESH_TOKEN_ENDPOINT)
            .count()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse, GatewayError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok((self.responder)(&request))
    }
}

pub fn envelope(code: i64, message: &str, data: Value) -> String {
    serde_json::json!({
        "code": code,
        "message": message,
        "data": data,
        "request_id": "r1",
    })
    .to_string()
}

pub fn ok(data: Value) -> TransportResponse {
    TransportResponse::new(200, envelope(0, "OK", data))
}

pub fn status(code: u16) -> TransportResponse {
    TransportResponse::new(code, envelope(40001, "rejected", Value::Null))
}

pub fn refresh_ok(access_token: &str) -> TransportResponse {
    ok(serde_json::json!({
        "access_token": access_token,
        "refresh_token": "rotated-refresh",
        "expires_in": 86400,
    }))
}

/// Access token `stale-token`, default advertiser `123`, no refresh.
pub fn config() -> GatewayConfig {
    let mut config = GatewayConfig::new(STALE_TOKEN).expect("config");
    config.advertiser_id = Some("123".to_string());
    config.base_url = Url::parse(BASE_URL).expect("base url");
    config
}

pub fn refresh_config() -> GatewayConfig {
    let mut config = config();
    config.app_id = Some("app-1".to_string());
    config.app_secret = Some("app-secret-value".to_string());
    config.refresh_token = Some("refresh-1".to_string());
    config
}

pub fn quiet_logger() -> Logger {
    Logger::with_level("test", LogLevel::Error)
}

pub fn build_app(config: GatewayConfig, transport: Arc<StubTransport>) -> App {
    App::with_logger(config, transport, quiet_logger()).expect("app wiring")
}
