//! API Gateway Library
//!
//! HTTP adapter in front of the account service: decodes JSON payloads,
//! calls the service, and maps outcomes to status codes.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;

use tower_http::trace::TraceLayer;
use tracing::info;

use account_service_lib::build_account_service;

use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Run the HTTP server, loading the rest of the configuration from the environment.
pub async fn run_server(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = GatewayConfig::from_env()?;
    config.host = host.to_string();
    config.port = port;

    run_server_with_config(config).await
}

/// Run the HTTP server with the given configuration.
async fn run_server_with_config(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    let accounts = build_account_service(&config.account).await?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let state = AppState::new(accounts, config);

    // Build router
    let app = create_router(state).layer(TraceLayer::new_for_http());

    info!("Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
