use super::ToolDescriptor;

pub fn descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::get("interest_category_get", "tool/interest_category/"),
        ToolDescriptor::get("region_get", "tool/region/"),
    ]
}
