use crate::constants::env;
use crate::errors::{FieldViolation, GatewayError};
use crate::mcp::catalog::ToolDef;
use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::{JSONSchema, ValidationError};
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";
pub const DATETIME_PATTERN: &str = r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$";

/// How a tool's identifier field falls back to ambient configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierPolicy {
    None,
    /// Absent `advertiser_id` takes the configured default.
    AdvertiserId,
    /// Absent `advertiser_ids` becomes `[default]`.
    AdvertiserIds,
}

impl IdentifierPolicy {
    fn field(self) -> Option<&'static str> {
        match self {
            IdentifierPolicy::None => None,
            IdentifierPolicy::AdvertiserId => Some("advertiser_id"),
            IdentifierPolicy::AdvertiserIds => Some("advertiser_ids"),
        }
    }
}

struct ToolSchema {
    raw: Value,
    compiled: JSONSchema,
}

/// Checks raw tool arguments against the catalog schemas and produces the
/// normalized parameter map (defaults applied, ambient identifiers filled).
pub struct ParameterValidator {
    schemas: HashMap<String, ToolSchema>,
    default_advertiser_id: Option<String>,
}

impl ParameterValidator {
    pub fn from_catalog(
        catalog: &[ToolDef],
        default_advertiser_id: Option<String>,
    ) -> Result<Self, GatewayError> {
        let mut schemas = HashMap::new();
        for tool in catalog {
            let compiled = JSONSchema::compile(&tool.input_schema).map_err(|err| {
                GatewayError::config(format!("schema for tool '{}' does not compile: {}", tool.name, err))
            })?;
            schemas.insert(
                tool.name.clone(),
                ToolSchema {
                    raw: tool.input_schema.clone(),
                    compiled,
                },
            );
        }
        Ok(Self {
            schemas,
            default_advertiser_id,
        })
    }

    pub fn knows(&self, tool: &str) -> bool {
        self.schemas.contains_key(tool)
    }

    pub fn validate(
        &self,
        tool: &str,
        identifier: IdentifierPolicy,
        raw_args: &Value,
    ) -> Result<Map<String, Value>, GatewayError> {
        let schema = self.schemas.get(tool).ok_or_else(|| GatewayError::UnknownTool {
            name: tool.to_string(),
            suggestions: Vec::new(),
        })?;

        let mut args = match raw_args {
            Value::Null => Map::new(),
            Value::Object(map) => map
                .iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            _ => {
                return Err(GatewayError::validation(
                    tool,
                    vec![FieldViolation::new("(root)", "arguments must be an object")],
                ))
            }
        };

        apply_defaults(&schema.raw, &mut args);

        let mut violations = Vec::new();
        if let Some(field) = identifier.field() {
            if !args.contains_key(field) {
                match self.default_advertiser_id.as_ref() {
                    Some(id) if identifier == IdentifierPolicy::AdvertiserIds => {
                        args.insert(field.to_string(), Value::Array(vec![Value::String(id.clone())]));
                    }
                    Some(id) => {
                        args.insert(field.to_string(), Value::String(id.clone()));
                    }
                    None => violations.push(FieldViolation::new(
                        field,
                        format!(
                            "is required: pass it explicitly or set {} as the default advertiser",
                            env::ADVERTISER_ID
                        ),
                    )),
                }
            }
        }

        let instance = Value::Object(args.clone());
        if let Err(errors) = schema.compiled.validate(&instance) {
            for err in errors {
                for violation in describe(&err) {
                    let already_reported = violations.iter().any(|v| v.field == violation.field);
                    if !already_reported || !matches!(err.kind, ValidationErrorKind::Required { .. }) {
                        if !violations.contains(&violation) {
                            violations.push(violation);
                        }
                    }
                }
            }
        }

        if !violations.is_empty() {
            return Err(GatewayError::validation(tool, violations));
        }
        Ok(args)
    }
}

fn apply_defaults(schema: &Value, args: &mut Map<String, Value>) {
    let Some(props) = schema.get("properties").and_then(|v| v.as_object()) else {
        return;
    };
    for (key, prop) in props {
        if args.contains_key(key) {
            continue;
        }
        if let Some(default) = prop.get("default") {
            args.insert(key.clone(), default.clone());
        }
    }
}

fn field_path(pointer: &str, leaf: Option<&str>) -> String {
    let base = pointer.trim_start_matches('/');
    match (base.is_empty(), leaf) {
        (true, Some(leaf)) => leaf.to_string(),
        (false, Some(leaf)) => format!("{}/{}", base, leaf),
        (true, None) => "(root)".to_string(),
        (false, None) => base.to_string(),
    }
}

fn describe(err: &ValidationError<'_>) -> Vec<FieldViolation> {
    let pointer = err.instance_path.to_string();
    match &err.kind {
        ValidationErrorKind::Required { property } => {
            let name = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            vec![FieldViolation::new(field_path(&pointer, Some(&name)), "is required")]
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => unexpected
            .iter()
            .map(|name| {
                FieldViolation::new(field_path(&pointer, Some(name)), "is not a recognized parameter")
            })
            .collect(),
        ValidationErrorKind::Enum { options } => {
            let allowed: Vec<String> = options
                .as_array()
                .map(|arr| {
                    arr.iter()
                        .map(|v| v.as_str().map(|s| s.to_string()).unwrap_or_else(|| v.to_string()))
                        .collect()
                })
                .unwrap_or_default();
            vec![FieldViolation::new(
                field_path(&pointer, None),
                format!("expected one of {}", allowed.join(", ")),
            )]
        }
        ValidationErrorKind::Type { kind } => vec![FieldViolation::new(
            field_path(&pointer, None),
            format!("expected {}", format_type_kind(kind)),
        )],
        ValidationErrorKind::Pattern { pattern } => {
            let message = match pattern.as_str() {
                DATE_PATTERN => "must be a date in YYYY-MM-DD format".to_string(),
                DATETIME_PATTERN => "must be a datetime in YYYY-MM-DD HH:MM:SS format".to_string(),
                other => format!("must match pattern {}", other),
            };
            vec![FieldViolation::new(field_path(&pointer, None), message)]
        }
        _ => vec![FieldViolation::new(field_path(&pointer, None), err.to_string())],
    }
}

fn format_type_kind(kind: &TypeKind) -> String {
    match kind {
        TypeKind::Single(primitive) => primitive.to_string(),
        TypeKind::Multiple(types) => {
            let list: Vec<String> = (*types).into_iter().map(|t| t.to_string()).collect();
            if list.is_empty() {
                "unknown".to_string()
            } else {
                list.join(" | ")
            }
        }
    }
}
