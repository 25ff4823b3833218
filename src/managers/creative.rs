use super::{is, retain_if, Params, ToolDescriptor};

pub fn descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::post("video_upload", "file/video/ad/upload/").transform(video_source),
        ToolDescriptor::get("video_info", "file/video/ad/info/"),
        ToolDescriptor::get("video_search", "file/video/ad/search/"),
        ToolDescriptor::post("image_upload", "file/image/ad/upload/").transform(image_source),
        ToolDescriptor::get("image_info", "file/image/ad/info/"),
    ]
}

/// Sends only the source field matching `upload_type`.
fn video_source(mut params: Params) -> Params {
    let by_url = is(&params, "upload_type", "UPLOAD_BY_URL");
    let by_id = is(&params, "upload_type", "UPLOAD_BY_VIDEO_ID");
    retain_if(&mut params, "video_url", by_url);
    retain_if(&mut params, "video_id", by_id);
    params
}

fn image_source(mut params: Params) -> Params {
    let by_url = is(&params, "upload_type", "UPLOAD_BY_URL");
    let by_file = is(&params, "upload_type", "UPLOAD_BY_FILE_ID");
    retain_if(&mut params, "image_url", by_url);
    retain_if(&mut params, "file_id", by_file);
    params
}
