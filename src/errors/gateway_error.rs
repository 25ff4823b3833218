use serde::Serialize;
use thiserror::Error;

/// One rejected argument: the field path (`budget`, `creatives/0`) and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{}", render_violations(.tool, .violations))]
    Validation {
        tool: String,
        violations: Vec<FieldViolation>,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("authentication failed on {endpoint}: {message}")]
    Auth { endpoint: String, message: String },

    #[error("upstream kept throttling {endpoint} (HTTP 429) after one retry")]
    RateLimited { endpoint: String },

    #[error("{}", render_upstream(.endpoint, .http_status, .code, .message, .request_id))]
    Upstream {
        endpoint: String,
        http_status: u16,
        code: Option<i64>,
        message: String,
        request_id: Option<String>,
    },

    #[error("transport failure on {endpoint}: {message}")]
    Transport {
        endpoint: String,
        message: String,
        timed_out: bool,
    },

    #[error("Unknown tool: {name}")]
    UnknownTool {
        name: String,
        suggestions: Vec<String>,
    },
}

impl GatewayError {
    pub fn validation(tool: impl Into<String>, violations: Vec<FieldViolation>) -> Self {
        Self::Validation {
            tool: tool.into(),
            violations,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn auth(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Auth {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn transport(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn timeout(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            message: message.into(),
            timed_out: true,
        }
    }

    /// Stable snake_case label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::Config(_) => "config",
            Self::Auth { .. } => "auth",
            Self::RateLimited { .. } => "rate_limited",
            Self::Upstream { .. } => "upstream",
            Self::Transport { .. } => "transport",
            Self::UnknownTool { .. } => "unknown_tool",
        }
    }

    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::Validation { violations, .. } => violations,
            _ => &[],
        }
    }
}

fn render_violations(tool: &str, violations: &[FieldViolation]) -> String {
    let mut lines = vec![format!("Invalid arguments for {}", tool)];
    lines.extend(
        violations
            .iter()
            .map(|v| format!("- {}: {}", v.field, v.message)),
    );
    lines.join("\n")
}

fn render_upstream(
    endpoint: &str,
    http_status: &u16,
    code: &Option<i64>,
    message: &str,
    request_id: &Option<String>,
) -> String {
    let mut out = format!("upstream error on {} (HTTP {}", endpoint, http_status);
    if let Some(code) = code {
        out.push_str(&format!(", code {}", code));
    }
    out.push_str(&format!("): {}", message));
    if let Some(request_id) = request_id {
        out.push_str(&format!(" [request_id {}]", request_id));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_lists_every_field() {
        let err = GatewayError::validation(
            "campaign_create",
            vec![
                FieldViolation::new("budget", "must be greater than 0"),
                FieldViolation::new("objective_type", "expected one of REACH, TRAFFIC"),
            ],
        );
        let text = err.to_string();
        assert!(text.starts_with("Invalid arguments for campaign_create"));
        assert!(text.contains("- budget: must be greater than 0"));
        assert!(text.contains("- objective_type: expected one of REACH, TRAFFIC"));
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn upstream_message_carries_code_and_request_id() {
        let err = GatewayError::Upstream {
            endpoint: "campaign/create/".to_string(),
            http_status: 200,
            code: Some(40100),
            message: "invalid advertiser".to_string(),
            request_id: Some("r-9".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "upstream error on campaign/create/ (HTTP 200, code 40100): invalid advertiser [request_id r-9]"
        );
        assert_eq!(err.kind(), "upstream");
    }
}
