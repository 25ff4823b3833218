use std::sync::Arc;
use tiktok_ads_mcp::app::App;
use tiktok_ads_mcp::config::GatewayConfig;
use tiktok_ads_mcp::constants::server::SERVER_NAME;
use tiktok_ads_mcp::mcp::server::McpServer;

#[tokio::main]
async fn main() {
    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}: {}", SERVER_NAME, err);
            std::process::exit(1);
        }
    };
    let app = match App::initialize(config) {
        Ok(app) => Arc::new(app),
        Err(err) => {
            eprintln!("{}: {}", SERVER_NAME, err);
            std::process::exit(1);
        }
    };

    let logger = app.logger.clone();
    let server = McpServer::new(app);
    tokio::select! {
        result = server.run_stdio() => {
            if let Err(err) = result {
                logger.error(
                    "stdio server stopped",
                    Some(&serde_json::json!({"error": err.to_string()})),
                );
                std::process::exit(1);
            }
        }
        signal = shutdown_signal() => {
            logger.info("shutting down", Some(&serde_json::json!({"signal": signal})));
        }
    }
}

#[cfg(unix)]
async fn shutdown_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};
    match signal(SignalKind::terminate()) {
        Ok(mut term) => tokio::select! {
            _ = tokio::signal::ctrl_c() => "SIGINT",
            _ = term.recv() => "SIGTERM",
        },
        Err(_) => {
            let _ = tokio::signal::ctrl_c().await;
            "SIGINT"
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> &'static str {
    let _ = tokio::signal::ctrl_c().await;
    "ctrl-c"
}
