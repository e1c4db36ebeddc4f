//! Registration service - Entry point.

use registration_service::{
    api::{create_router, AppState},
    config::Config,
    mailer::SmtpMailer,
};
use secrecy::ExposeSecret;
use std::sync::Arc;
use table_store_client::TableStoreClient;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting registration service");

    // Store client
    if config.store.url.is_empty() {
        warn!("STORE__URL is not set; inserts will fail");
    }
    let store = match TableStoreClient::new(
        config.store.url.as_str(),
        config.store.access_key.expose_secret().as_str(),
    ) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create store client: {}", e);
            std::process::exit(1);
        }
    };

    info!(base_url = %store.base_url(), "Store client ready");

    // SMTP transport; an unreachable relay is logged, not fatal
    let mailer = SmtpMailer::connect(&config.smtp).await;
    if !mailer.is_configured() {
        warn!("No SMTP transport; every registration will end with an SMTP error");
    }

    // Create application state
    let state = AppState::new(Arc::new(store), Arc::new(mailer));

    let app = create_router(state);

    // Bind to address
    let addr = match config.server.socket_addr() {
        Ok(a) => a,
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    };

    info!("Listening on {}", addr);

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
