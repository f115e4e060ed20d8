use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lyceum_onboarding_api::auth::Authenticator;
use lyceum_onboarding_api::config::AppConfig;
use lyceum_onboarding_api::database::{self, PgProfileStore};
use lyceum_onboarding_api::server::{app, AppState, ONBOARDING_PATH};

#[derive(Parser)]
#[command(name = "lyceum-onboarding-api")]
#[command(about = "Onboarding profile endpoint for Lyceum")]
#[command(version)]
struct Cli {
    #[arg(long, help = "Bind host (overrides API_HOST)")]
    host: Option<String>,

    #[arg(long, help = "Bind port (overrides ONBOARDING_API_PORT / PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Validate configuration and database connectivity, then exit")]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    tracing::info!(
        environment = ?config.environment,
        auth_enabled = config.security.auth_enabled,
        list_encoding = %config.database.list_encoding,
        "Starting onboarding API"
    );

    let pool = database::manager::connect(&config.database).context("failed to create database pool")?;

    if cli.check {
        let result = database::manager::health_check(&pool).await;
        database::manager::close(&pool).await;
        result.context("database is not reachable")?;
        println!("configuration ok, database reachable at {}", config.database.redacted_url());
        return Ok(());
    }

    let auth = Authenticator::from_config(&config.security).context("invalid authentication settings")?;
    let store = Arc::new(PgProfileStore::new(pool.clone(), config.database.list_encoding));
    let state = AppState::new(store, auth, &config.server);

    let bind_addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Onboarding API listening on http://{}{}", bind_addr, ONBOARDING_PATH);

    let served = axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    database::manager::close(&pool).await;
    served.context("server error")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
