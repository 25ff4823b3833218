use super::ToolDescriptor;
use crate::services::validation::IdentifierPolicy;

pub fn descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::get("advertiser_info", "advertiser/info/")
            .identifier(IdentifierPolicy::AdvertiserIds),
        ToolDescriptor::get("identity_get", "identity/get/"),
        ToolDescriptor::get("pixel_list", "pixel/list/"),
    ]
}
