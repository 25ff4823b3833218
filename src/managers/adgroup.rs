use super::{is, retain_if, Params, ToolDescriptor};

pub fn descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::get("adgroup_get", "adgroup/get/"),
        ToolDescriptor::post("adgroup_create", "adgroup/create/").transform(create_payload),
        ToolDescriptor::post("adgroup_update", "adgroup/update/"),
        ToolDescriptor::post("adgroup_status_update", "adgroup/status/update/"),
    ]
}

/// Mode-dependent fields are only sent alongside the mode that uses them.
fn create_payload(mut params: Params) -> Params {
    let manual_placement = is(&params, "placement_type", "PLACEMENT_TYPE_NORMAL");
    let bounded_schedule = is(&params, "schedule_type", "SCHEDULE_START_END");
    let custom_bid = is(&params, "bid_type", "BID_TYPE_CUSTOM");
    retain_if(&mut params, "placements", manual_placement);
    retain_if(&mut params, "schedule_end_time", bounded_schedule);
    retain_if(&mut params, "bid_price", custom_bid);
    params
}
