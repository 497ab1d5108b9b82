//! Contact Relay web server.
//!
//! Loads configuration from the environment, wires the SendGrid mailer and
//! serves the contact API until SIGINT/SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use contact_relay::{router, ApiDocs, AppState, Config, SendGridClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        allowed_origins = ?config.allowed_origins,
        allowed_ips = ?config.allowed_ips,
        trust_proxy = config.trust_proxy,
        from_email = ?config.from_email,
        "config_loaded"
    );

    if config.sendgrid_api_key.is_none() {
        error!("Missing SENDGRID_API_KEY in environment");
    }
    if config.to_email.is_none() {
        error!("Missing TO_EMAIL in environment");
    }

    let mailer = SendGridClient::new(config.sendgrid_api_key.clone(), &config.sendgrid_api_url)
        .context("Failed to create SendGrid client")?;
    info!(endpoint = %mailer.endpoint(), "sendgrid_client_created");

    let docs = ApiDocs::resolve(config.docs_path.as_deref());

    let port = config.port;
    let state = AppState::new(config, Arc::new(mailer));
    let app = router(state, docs);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Peer addresses feed the IP gate
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "ctrl_c_handler_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
