use crate::app::App;
use crate::constants::server::{PROTOCOL_VERSION, SERVER_NAME, SERVER_VERSION};
use crate::errors::{ErrorCode, McpError};
use crate::mcp::catalog::list_tools;
use crate::mcp::protocol::{
    text_content, JsonRpcRequest, JsonRpcResponse, ToolCallParams, JSONRPC_VERSION,
};
use crate::services::logger::Logger;
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

/// Newline-delimited JSON-RPC front end. Requests are handled in arrival
/// order; stdout carries protocol frames only.
pub struct McpServer {
    app: Arc<App>,
    logger: Logger,
}

impl McpServer {
    pub fn new(app: Arc<App>) -> Self {
        let logger = app.logger.child("mcp");
        Self { app, logger }
    }

    pub async fn run_stdio(&self) -> std::io::Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serves until `reader` reaches EOF.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> std::io::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut reader = BufReader::new(reader);
        let mut writer = BufWriter::new(writer);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            let response = match std::str::from_utf8(&buf) {
                Ok(line) => self.handle_line(line).await,
                Err(_) => {
                    self.logger.warn("discarding line that is not valid UTF-8", None);
                    Some(parse_error())
                }
            };
            let Some(response) = response else {
                continue;
            };
            let payload = match serde_json::to_string(&response) {
                Ok(payload) => payload,
                Err(err) => {
                    self.logger.error(
                        "failed to serialize response",
                        Some(&serde_json::json!({"error": err.to_string()})),
                    );
                    continue;
                }
            };
            writer.write_all(payload.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        self.logger.info("input closed", None);
        Ok(())
    }

    /// One inbound line to at most one response. Notifications and blank
    /// lines produce none.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let parsed: Value = match serde_json::from_str(trimmed) {
            Ok(value) => value,
            Err(_) => return Some(parse_error()),
        };
        let fallback_id = parsed.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(parsed) {
            Ok(request) => request,
            Err(_) => {
                return Some(JsonRpcResponse::failure(
                    fallback_id,
                    McpError::new(ErrorCode::InvalidRequest, "Invalid request"),
                ))
            }
        };
        if request.jsonrpc != JSONRPC_VERSION {
            return request.id.map(|id| {
                JsonRpcResponse::failure(
                    id,
                    McpError::new(ErrorCode::InvalidRequest, "Invalid request: jsonrpc must be \"2.0\""),
                )
            });
        }

        if request.is_notification() {
            self.logger.debug(
                "notification",
                Some(&serde_json::json!({"method": request.method})),
            );
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, self.handle_initialize()),
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/list" => JsonRpcResponse::success(id, list_tools()),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            other => JsonRpcResponse::failure(
                id,
                McpError::new(ErrorCode::MethodNotFound, format!("Method not found: {}", other)),
            ),
        };
        Some(response)
    }

    fn handle_initialize(&self) -> Value {
        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {"tools": {}},
            "serverInfo": {"name": SERVER_NAME, "version": SERVER_VERSION},
        })
    }

    async fn handle_tools_call(&self, id: Value, params: Value) -> JsonRpcResponse {
        let params: ToolCallParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(_) => {
                return JsonRpcResponse::failure(
                    id,
                    McpError::new(
                        ErrorCode::InvalidParams,
                        "tools/call expects {\"name\": string, \"arguments\": object}",
                    ),
                )
            }
        };

        match self
            .app
            .dispatcher
            .dispatch(&params.name, params.arguments)
            .await
        {
            Ok(data) => JsonRpcResponse::success(id, text_content(&data)),
            Err(err) => JsonRpcResponse::from_gateway_error(id, &err),
        }
    }
}

fn parse_error() -> JsonRpcResponse {
    JsonRpcResponse::failure(
        Value::Null,
        McpError::new(ErrorCode::ParseError, "Parse error"),
    )
}
