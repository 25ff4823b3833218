use super::{take_fields, Params, ToolDescriptor};
use serde_json::Value;

pub fn descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::get("audience_list", "dmp/custom_audience/list/"),
        ToolDescriptor::get("audience_get", "dmp/custom_audience/get/"),
        ToolDescriptor::post(
            "lookalike_audience_create",
            "dmp/custom_audience/lookalike/create/",
        )
        .transform(lookalike_payload),
    ]
}

fn lookalike_payload(mut params: Params) -> Params {
    let lookalike = take_fields(
        &mut params,
        &["location_ids", "audience_size", "mobile_os", "placements"],
    );
    params.insert("lookalike_spec".to_string(), Value::Object(lookalike));
    params
}
