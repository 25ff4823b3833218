use crate::config::GatewayConfig;
use crate::constants::server::SERVER_NAME;
use crate::errors::GatewayError;
use crate::managers::{self, ToolDescriptor};
use crate::mcp::catalog::{tool_catalog, ToolDef};
use crate::services::api_client::ApiClient;
use crate::services::dispatcher::ToolDispatcher;
use crate::services::logger::Logger;
use crate::services::rate_limiter::RateLimiter;
use crate::services::session::Session;
use crate::services::token_refresher::TokenRefresher;
use crate::services::transport::{ReqwestTransport, Transport};
use crate::services::validation::ParameterValidator;
use std::sync::Arc;

pub struct App {
    pub logger: Logger,
    pub session: Arc<Session>,
    pub limiter: Arc<RateLimiter>,
    pub dispatcher: Arc<ToolDispatcher>,
}

impl App {
    /// Production wiring over the reqwest transport.
    pub fn initialize(config: GatewayConfig) -> Result<Self, GatewayError> {
        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new()?);
        Self::with_transport(config, transport)
    }

    pub fn with_transport(
        config: GatewayConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, GatewayError> {
        Self::with_logger(config, transport, Logger::new(SERVER_NAME))
    }

    pub fn with_logger(
        config: GatewayConfig,
        transport: Arc<dyn Transport>,
        logger: Logger,
    ) -> Result<Self, GatewayError> {
        let descriptors = managers::all_descriptors();
        Self::validate_tool_wiring(&descriptors, tool_catalog())?;

        let session = Arc::new(Session::from_config(&config));
        let limiter = Arc::new(RateLimiter::new(config.rate_limit));
        let refresher = config.refresh_enabled().then(|| {
            Arc::new(TokenRefresher::new(
                logger.clone(),
                session.clone(),
                transport.clone(),
                config.base_url.clone(),
                config.request_timeout,
            ))
        });
        let client = Arc::new(ApiClient::new(
            logger.clone(),
            &config,
            transport,
            limiter.clone(),
            session.clone(),
            refresher,
        ));

        let validator = ParameterValidator::from_catalog(
            tool_catalog(),
            session.default_advertiser_id().map(str::to_string),
        )?;
        let dispatcher = Arc::new(ToolDispatcher::new(
            logger.clone(),
            validator,
            client,
            descriptors,
        )?);

        logger.info(
            "gateway ready",
            Some(&serde_json::json!({
                "base_url": config.base_url.as_str(),
                "tools": dispatcher.tool_names().len(),
                "rate_limit": config.rate_limit.max_requests,
                "refresh_enabled": config.refresh_enabled(),
                "default_advertiser": config.advertiser_id.is_some(),
            })),
        );

        Ok(Self {
            logger,
            session,
            limiter,
            dispatcher,
        })
    }

    /// Every catalog entry needs a descriptor and vice versa.
    fn validate_tool_wiring(
        descriptors: &[ToolDescriptor],
        catalog: &[ToolDef],
    ) -> Result<(), GatewayError> {
        let mut missing: Vec<&str> = catalog
            .iter()
            .map(|tool| tool.name.as_str())
            .filter(|name| !descriptors.iter().any(|d| d.name == *name))
            .collect();
        let mut orphaned: Vec<&str> = descriptors
            .iter()
            .map(|d| d.name)
            .filter(|name| !catalog.iter().any(|tool| tool.name == *name))
            .collect();
        if missing.is_empty() && orphaned.is_empty() {
            return Ok(());
        }
        missing.sort_unstable();
        orphaned.sort_unstable();
        Err(GatewayError::config(format!(
            "tool wiring is incomplete (no descriptor: [{}]; no schema: [{}])",
            missing.join(", "),
            orphaned.join(", ")
        )))
    }
}
