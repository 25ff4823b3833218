mod gateway_error;
mod mcp_error;

pub use gateway_error::{FieldViolation, GatewayError};
pub use mcp_error::{ErrorCode, McpError};
