use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

const REDACTED: &str = "[REDACTED]";

static INLINE_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"\b(Bearer)\s+([A-Za-z0-9._~+/-]{10,})").expect("inline redaction regex"),
            "$1 [REDACTED]",
        ),
        (
            Regex::new(r#"(?i)\b(access[_-]?token|refresh[_-]?token|secret|app_secret)\b(["']?\s*[:=]\s*["']?)([^\s"'&,}]+)"#)
                .expect("inline redaction regex"),
            "$1$2[REDACTED]",
        ),
        (
            Regex::new(r"\beyJ[a-zA-Z0-9_-]{10,}\.[a-zA-Z0-9_-]{10,}\.[a-zA-Z0-9_-]{10,}\b")
                .expect("inline redaction regex"),
            REDACTED,
        ),
    ]
});

pub fn is_sensitive_key(key: &str) -> bool {
    let normalized = key.trim().to_lowercase();
    normalized.contains("token") || normalized.contains("secret") || normalized == "authorization"
}

/// Masks credential-looking fragments and known secret values, then caps the
/// result at `max_bytes` on a char boundary.
pub fn redact_text(value: &str, max_bytes: usize, secrets: &[String]) -> String {
    let mut out = value.to_string();
    for (re, replacement) in INLINE_PATTERNS.iter() {
        if re.is_match(&out) {
            out = re.replace_all(&out, *replacement).into_owned();
        }
    }
    for secret in secrets {
        let needle = secret.trim();
        if needle.len() >= 6 {
            out = out.replace(needle, REDACTED);
        }
    }
    truncate(&out, max_bytes)
}

/// Copy of tool arguments safe to log.
pub fn redact_args(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, entry)| {
                    if is_sensitive_key(key) {
                        (key.clone(), Value::String(REDACTED.to_string()))
                    } else {
                        (key.clone(), redact_args(entry))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_args).collect()),
        _ => value.clone(),
    }
}

fn truncate(value: &str, max_bytes: usize) -> String {
    if value.len() <= max_bytes {
        return value.to_string();
    }
    let mut end = max_bytes;
    while end > 0 && !value.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &value[..end])
}
