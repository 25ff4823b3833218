pub mod api_client;
pub mod dispatcher;
pub mod envelope;
pub mod logger;
pub mod rate_limiter;
pub mod session;
pub mod token_refresher;
pub mod transport;
pub mod validation;
