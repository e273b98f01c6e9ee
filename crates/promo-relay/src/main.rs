//! Credential relay for the promotion broadcast dispatcher.
//!
//! Holds the real bot tokens so dispatching clients only ever carry a
//! credential alias and the relay's static bearer token.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use promo_relay::{router, RelayConfig, RelayState};

/// Promotion relay CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/promo-relay.toml")]
    config: String,

    /// Bind address (overrides config file)
    #[arg(long, env = "RELAY_BIND_ADDRESS")]
    bind_address: Option<String>,

    /// Client bearer token (overrides config file)
    #[arg(long, env = "RELAY_AUTH_TOKEN")]
    auth_token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "promo_relay=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = if std::path::Path::new(&args.config).exists() {
        info!("Loading config from file: {}", args.config);
        RelayConfig::from_file(&args.config)?
    } else {
        info!("Config file not found, using environment variables");
        RelayConfig::from_env()
    };

    if let Some(bind_address) = args.bind_address {
        config.bind_address = bind_address;
    }
    if let Some(auth_token) = args.auth_token {
        config.auth_token = auth_token;
    }

    if config.auth_token.trim().is_empty() {
        anyhow::bail!("auth_token is not configured; refusing to run an open relay");
    }
    if config.credentials.is_empty() {
        anyhow::bail!("no credentials configured; nothing to relay");
    }

    info!(
        bind_address = %config.bind_address,
        credentials = config.credentials.len(),
        "Starting promotion relay"
    );

    let state = RelayState::new(&config);
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves when the process receives SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let sigterm = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };
    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c  => {}
        _ = sigterm => {}
    }
}
