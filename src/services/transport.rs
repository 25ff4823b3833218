use crate::constants::network::ACCESS_TOKEN_HEADER;
use crate::errors::GatewayError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use url::Url;

/// One HTTP attempt, built fresh for every try.
#[derive(Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    /// Endpoint path relative to the API base, used in error context.
    pub endpoint: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: Duration,
}

impl OutboundRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Debug for OutboundRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(key, value)| {
                if key.eq_ignore_ascii_case(ACCESS_TOKEN_HEADER) {
                    (key.as_str(), "[REDACTED]")
                } else {
                    (key.as_str(), value.as_str())
                }
            })
            .collect();
        f.debug_struct("OutboundRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &headers)
            .field("query", &self.query)
            .field("body", &self.body)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Moves one request over the wire. Network failures and timeouts become
/// `GatewayError::Transport`; any HTTP status is returned as a response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse, GatewayError>;
}

#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, GatewayError> {
        let client = Client::builder()
            .user_agent(concat!("tiktok-ads-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| GatewayError::config(format!("failed to build HTTP client: {}", err)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse, GatewayError> {
        let endpoint = request.endpoint.clone();
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(to_header_map(&request.headers, &endpoint)?)
            .timeout(request.timeout);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = request.body.as_ref() {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| map_reqwest_error(&endpoint, request.timeout, err))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| map_reqwest_error(&endpoint, request.timeout, err))?;
        Ok(TransportResponse { status, body })
    }
}

fn to_header_map(headers: &[(String, String)], endpoint: &str) -> Result<HeaderMap, GatewayError> {
    let mut map = HeaderMap::new();
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
            GatewayError::transport(endpoint, format!("invalid header name '{}'", key))
        })?;
        let value = HeaderValue::from_str(value).map_err(|_| {
            GatewayError::transport(endpoint, format!("invalid value for header '{}'", key))
        })?;
        map.insert(name, value);
    }
    Ok(map)
}

fn map_reqwest_error(endpoint: &str, timeout: Duration, err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        return GatewayError::timeout(
            endpoint,
            format!("request timed out after {}ms", timeout.as_millis()),
        );
    }
    // reqwest errors embed the URL; strip it so query strings never leak.
    GatewayError::transport(endpoint, err.without_url().to_string())
}

/// Resolves an endpoint path (`campaign/get/`) against the API base URL.
pub fn endpoint_url(base: &Url, endpoint: &str) -> Result<Url, GatewayError> {
    base.join(endpoint.trim_start_matches('/')).map_err(|err| {
        GatewayError::config(format!("invalid endpoint path '{}': {}", endpoint, err))
    })
}
