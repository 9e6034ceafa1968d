use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

mod api;
mod config;
mod error;
mod foundry;
mod i18n;
mod reroll;
mod service;
mod websocket;

use crate::service::RerollService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    init_logging();

    info!(
        "Starting GWF reroll service v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Static configuration (server binding, house rule, locale)
    let static_config = crate::config::load_static_config()?;

    info!(
        host = %static_config.server.host,
        port = static_config.server.port,
        "Static configuration loaded"
    );

    let addr = format!(
        "{}:{}",
        static_config.server.host, static_config.server.port
    );

    // Initialize the service
    let service = Arc::new(RerollService::new(static_config)?);

    // Build the router
    let app = api::router(service);

    // Start the server
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let format = fmt::format()
        .with_target(true)
        .with_thread_ids(true)
        .compact();

    // Use RUST_LOG if set, otherwise default to info level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gwf_reroll_service=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().event_format(format))
        .with(filter)
        .init();
}
