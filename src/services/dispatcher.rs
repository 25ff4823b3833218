use crate::constants::limits::MAX_TOOL_SUGGESTIONS;
use crate::errors::GatewayError;
use crate::managers::{index_descriptors, Params, ToolDescriptor};
use crate::services::api_client::ApiClient;
use crate::services::logger::Logger;
use crate::services::validation::ParameterValidator;
use crate::utils::redact::redact_args;
use crate::utils::suggest::suggest;
use reqwest::Method;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// A validated call, shaped for the wire but not yet sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedCall {
    pub tool: &'static str,
    pub method: Method,
    pub endpoint: &'static str,
    pub payload: Params,
}

/// Runs every tool through the same validate, transform, call, unwrap pipeline.
pub struct ToolDispatcher {
    logger: Logger,
    validator: ParameterValidator,
    client: Arc<ApiClient>,
    descriptors: HashMap<&'static str, ToolDescriptor>,
}

impl ToolDispatcher {
    pub fn new(
        logger: Logger,
        validator: ParameterValidator,
        client: Arc<ApiClient>,
        descriptors: Vec<ToolDescriptor>,
    ) -> Result<Self, GatewayError> {
        let descriptors = index_descriptors(descriptors)?;
        if let Some(name) = descriptors.keys().find(|name| !validator.knows(name)) {
            return Err(GatewayError::config(format!(
                "tool '{}' has no schema in the catalog",
                name
            )));
        }
        Ok(Self {
            logger: logger.child("dispatch"),
            validator,
            client,
            descriptors,
        })
    }

    pub fn tool_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.descriptors.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Validation and transform only; never touches the network.
    pub fn prepare(&self, tool: &str, raw_args: &Value) -> Result<PreparedCall, GatewayError> {
        let descriptor = self.descriptors.get(tool).ok_or_else(|| self.unknown(tool))?;
        let params = self
            .validator
            .validate(descriptor.name, descriptor.identifier, raw_args)?;
        Ok(PreparedCall {
            tool: descriptor.name,
            method: descriptor.method.clone(),
            endpoint: descriptor.endpoint,
            payload: descriptor.build_payload(params),
        })
    }

    pub async fn dispatch(&self, tool: &str, raw_args: Value) -> Result<Value, GatewayError> {
        let trace_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();
        self.logger.debug(
            "tool call",
            Some(&serde_json::json!({
                "trace_id": trace_id,
                "tool": tool,
                "args": redact_args(&raw_args),
            })),
        );

        let outcome = match self.prepare(tool, &raw_args) {
            Ok(call) => {
                self.client
                    .call(call.method, call.endpoint, &call.payload)
                    .await
            }
            Err(err) => Err(err),
        };

        let duration_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(_) => self.logger.info(
                "tool call completed",
                Some(&serde_json::json!({
                    "trace_id": trace_id,
                    "tool": tool,
                    "duration_ms": duration_ms,
                })),
            ),
            Err(err) => self.logger.warn(
                "tool call failed",
                Some(&serde_json::json!({
                    "trace_id": trace_id,
                    "tool": tool,
                    "duration_ms": duration_ms,
                    "kind": err.kind(),
                    "error": err.to_string(),
                })),
            ),
        }
        outcome
    }

    fn unknown(&self, tool: &str) -> GatewayError {
        let names = self.tool_names();
        GatewayError::UnknownTool {
            name: tool.to_string(),
            suggestions: suggest(tool, &names, MAX_TOOL_SUGGESTIONS)
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}
