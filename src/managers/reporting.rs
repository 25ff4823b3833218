use super::{retain_if, Params, ToolDescriptor};
use serde_json::Value;

pub fn descriptors() -> Vec<ToolDescriptor> {
    vec![ToolDescriptor::get("report_get", "report/integrated/get/").transform(report_payload)]
}

/// Lifetime reports reject an explicit date range.
fn report_payload(mut params: Params) -> Params {
    let lifetime = params.get("query_lifetime") == Some(&Value::Bool(true));
    retain_if(&mut params, "start_date", !lifetime);
    retain_if(&mut params, "end_date", !lifetime);
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lifetime_query_drops_dates() {
        let params: Params = serde_json::from_value(json!({
            "query_lifetime": true,
            "start_date": "2024-01-01",
            "end_date": "2024-01-31",
            "dimensions": ["campaign_id"]
        }))
        .expect("object");
        let out = report_payload(params);
        assert!(!out.contains_key("start_date"));
        assert!(!out.contains_key("end_date"));
        assert_eq!(out["query_lifetime"], true);
    }

    #[test]
    fn ranged_query_keeps_dates() {
        let params: Params = serde_json::from_value(json!({
            "query_lifetime": false,
            "start_date": "2024-01-01",
            "end_date": "2024-01-31"
        }))
        .expect("object");
        let out = report_payload(params);
        assert_eq!(out["start_date"], "2024-01-01");
        assert_eq!(out["end_date"], "2024-01-31");
    }
}
