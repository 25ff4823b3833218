use super::{take_fields, Params, ToolDescriptor};
use serde_json::Value;

/// Flat tool arguments that the ad endpoints expect inside `creatives[0]`.
const CREATIVE_FIELDS: &[&str] = &[
    "ad_name",
    "ad_format",
    "ad_text",
    "video_id",
    "image_ids",
    "identity_id",
    "identity_type",
    "call_to_action",
    "landing_page_url",
];

pub fn descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::get("ad_get", "ad/get/"),
        ToolDescriptor::post("ad_create", "ad/create/").transform(nest_creative),
        ToolDescriptor::post("ad_update", "ad/update/").transform(nest_update),
        ToolDescriptor::post("ad_status_update", "ad/status/update/"),
    ]
}

fn nest_creative(mut params: Params) -> Params {
    let creative = take_fields(&mut params, CREATIVE_FIELDS);
    params.insert(
        "creatives".to_string(),
        Value::Array(vec![Value::Object(creative)]),
    );
    params
}

/// Updates address the creative by `ad_id`, which moves inside it.
fn nest_update(mut params: Params) -> Params {
    let mut creative = take_fields(&mut params, &["ad_id"]);
    creative.extend(take_fields(&mut params, CREATIVE_FIELDS));
    params.insert(
        "creatives".to_string(),
        Value::Array(vec![Value::Object(creative)]),
    );
    params
}
