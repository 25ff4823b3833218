use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

static TOOL_CATALOG: Lazy<Vec<ToolDef>> = Lazy::new(|| {
    let raw = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tool_catalog.json"));
    serde_json::from_str(raw).expect("tool_catalog.json must be valid JSON")
});

pub fn tool_catalog() -> &'static [ToolDef] {
    &TOOL_CATALOG
}

/// `tools/list` payload.
pub fn list_tools() -> Value {
    serde_json::json!({ "tools": tool_catalog() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_names_are_unique() {
        let names: HashSet<&str> = tool_catalog().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names.len(), tool_catalog().len());
    }

    #[test]
    fn every_schema_is_a_closed_object() {
        for tool in tool_catalog() {
            let schema = &tool.input_schema;
            assert_eq!(schema["type"], "object", "{} must take an object", tool.name);
            assert_eq!(
                schema["additionalProperties"],
                Value::Bool(false),
                "{} must reject unknown fields",
                tool.name
            );
            assert!(!tool.description.trim().is_empty(), "{} needs a description", tool.name);
        }
    }
}
