use crate::constants::limits::ERROR_BODY_PREVIEW_BYTES;
use crate::errors::GatewayError;
use crate::services::transport::TransportResponse;
use crate::utils::redact::redact_text;
use serde::Deserialize;
use serde_json::Value;

/// Response wrapper used by every TikTok Business API endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub request_id: Option<String>,
}

impl ApiEnvelope {
    pub fn parse(endpoint: &str, body: &str, secrets: &[String]) -> Result<Self, GatewayError> {
        serde_json::from_str(body).map_err(|err| {
            GatewayError::transport(
                endpoint,
                format!(
                    "malformed response body ({}): {}",
                    err,
                    redact_text(body, ERROR_BODY_PREVIEW_BYTES, secrets)
                ),
            )
        })
    }

    /// Logical status check: `code != 0` fails even under HTTP 200.
    pub fn into_data(
        self,
        endpoint: &str,
        http_status: u16,
        secrets: &[String],
    ) -> Result<Value, GatewayError> {
        if self.code != 0 {
            return Err(GatewayError::Upstream {
                endpoint: endpoint.to_string(),
                http_status,
                code: Some(self.code),
                message: redact_text(&self.message, ERROR_BODY_PREVIEW_BYTES, secrets),
                request_id: self.request_id,
            });
        }
        Ok(self.data)
    }
}

/// Classifies a non-2xx response that is neither 401 nor 429. `secrets` are
/// masked wherever the upstream echoes them back.
pub fn upstream_failure(
    endpoint: &str,
    response: &TransportResponse,
    secrets: &[String],
) -> GatewayError {
    match serde_json::from_str::<ApiEnvelope>(&response.body) {
        Ok(envelope) => GatewayError::Upstream {
            endpoint: endpoint.to_string(),
            http_status: response.status,
            code: Some(envelope.code),
            message: redact_text(&envelope.message, ERROR_BODY_PREVIEW_BYTES, secrets),
            request_id: envelope.request_id,
        },
        Err(_) => GatewayError::Upstream {
            endpoint: endpoint.to_string(),
            http_status: response.status,
            code: None,
            message: if response.body.trim().is_empty() {
                "empty response body".to_string()
            } else {
                redact_text(response.body.trim(), ERROR_BODY_PREVIEW_BYTES, secrets)
            },
            request_id: None,
        },
    }
}

/// Extracts the payload from a 2xx response.
pub fn unwrap_success(
    endpoint: &str,
    response: &TransportResponse,
    secrets: &[String],
) -> Result<Value, GatewayError> {
    ApiEnvelope::parse(endpoint, &response.body, secrets)?.into_data(
        endpoint,
        response.status,
        secrets,
    )
}
