use super::{is, retain_if, Params, ToolDescriptor};

pub fn descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::get("campaign_get", "campaign/get/"),
        ToolDescriptor::post("campaign_create", "campaign/create/").transform(create_payload),
        ToolDescriptor::post("campaign_update", "campaign/update/"),
        ToolDescriptor::post("campaign_status_update", "campaign/status/update/"),
    ]
}

/// An unlimited campaign carries no budget figure.
fn create_payload(mut params: Params) -> Params {
    let limited = !is(&params, "budget_mode", "BUDGET_MODE_INFINITE");
    retain_if(&mut params, "budget", limited);
    params
}
