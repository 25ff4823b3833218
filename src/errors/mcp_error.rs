use super::GatewayError;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum ErrorCode {
    RequestTimeout = -32001,
    ParseError = -32700,
    InvalidRequest = -32600,
    MethodNotFound = -32601,
    InvalidParams = -32602,
    InternalError = -32603,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct McpError {
    pub code: ErrorCode,
    pub message: String,
}

impl McpError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<&GatewayError> for McpError {
    fn from(err: &GatewayError) -> Self {
        let code = match err {
            GatewayError::UnknownTool { .. } => ErrorCode::MethodNotFound,
            GatewayError::Validation { .. } => ErrorCode::InvalidParams,
            GatewayError::Auth { .. } => ErrorCode::InvalidRequest,
            GatewayError::Transport {
                timed_out: true, ..
            } => ErrorCode::RequestTimeout,
            GatewayError::Config(_)
            | GatewayError::RateLimited { .. }
            | GatewayError::Upstream { .. }
            | GatewayError::Transport { .. } => ErrorCode::InternalError,
        };
        let mut message = err.to_string();
        if let GatewayError::UnknownTool { suggestions, .. } = err {
            if !suggestions.is_empty() {
                message.push_str(&format!("\nDid you mean: {}", suggestions.join(", ")));
            }
        }
        Self::new(code, message)
    }
}

impl fmt::Display for McpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for McpError {}
