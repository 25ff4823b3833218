pub mod network {
    pub const DEFAULT_API_BASE_URL: &str = "https://business-api.tiktok.com/open_api/v1.3/";
    pub const TIMEOUT_API_REQUEST_MS: u64 = 30_000;
    pub const THROTTLE_COOLDOWN_MS: u64 = 5_000;
    pub const ACCESS_TOKEN_HEADER: &str = "Access-Token";
    pub const CONTENT_TYPE_JSON: &str = "application/json";
    pub const REFRESH_TOKEN_ENDPOINT: &str = "oauth2/refresh_token/";
}

pub mod rate_limit {
    pub const WINDOW_MS: u64 = 60_000;
    pub const MAX_REQUESTS: usize = 100;
    pub const MAX_POLL_INTERVAL_MS: u64 = 1_000;
}

pub mod limits {
    pub const ERROR_BODY_PREVIEW_BYTES: usize = 512;
    pub const MAX_TOOL_SUGGESTIONS: usize = 3;
}

pub mod env {
    pub const ACCESS_TOKEN: &str = "TIKTOK_ACCESS_TOKEN";
    pub const ADVERTISER_ID: &str = "TIKTOK_ADVERTISER_ID";
    pub const APP_ID: &str = "TIKTOK_APP_ID";
    pub const APP_SECRET: &str = "TIKTOK_APP_SECRET";
    pub const REFRESH_TOKEN: &str = "TIKTOK_REFRESH_TOKEN";
    pub const API_BASE_URL: &str = "TIKTOK_API_BASE_URL";
    pub const RATE_LIMIT: &str = "TIKTOK_RATE_LIMIT";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
}

pub mod server {
    pub const PROTOCOL_VERSION: &str = "2025-06-18";
    pub const SERVER_NAME: &str = "tiktok-ads-mcp";
    pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
}
