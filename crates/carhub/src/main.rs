//! CarHub - record-management HTTP service with administrator authentication

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use carhub_api::{AppState, MetricsHandle, create_router};
use carhub_auth::{AuthService, TokenIssuer, hasher};
use carhub_db::{Database, NewCar};
use config::{Config, DEFAULT_SESSION_SECRET};

/// CarHub - cars API with token-authenticated administration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "CARHUB_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "CARHUB_PORT")]
    port: Option<u16>,

    /// Session token secret
    #[arg(long, env = "CARHUB_SESSION_SECRET")]
    session_secret: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.config)?;

    init_logging(&config.logging.level);

    info!("Starting CarHub v{}", env!("CARGO_PKG_VERSION"));

    // Secret resolution: CLI/env, then config file, then the fixed fallback
    let session_secret = args
        .session_secret
        .unwrap_or_else(|| config.auth.session_secret.clone());
    if session_secret == DEFAULT_SESSION_SECRET {
        warn!(
            "Session secret is the built-in fallback; tokens are guessable. \
             Set CARHUB_SESSION_SECRET in production."
        );
    }

    // Initialize database
    if let Some(parent) = std::path::Path::new(&config.database.path).parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    let db_url = format!("sqlite:{}?mode=rwc", config.database.path);
    let db = Database::new(&db_url).await?;

    seed_fixtures(&db).await?;

    // Initialize auth service
    let auth = Arc::new(AuthService::new(
        db.clone(),
        TokenIssuer::new(session_secret),
        config.auth.session_ttl_hours,
    ));

    // Install the Prometheus recorder
    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .map(|h| Arc::new(MetricsHandle::new(h)))
        .ok();
    if metrics_handle.is_none() {
        warn!("Failed to install metrics recorder; /metrics disabled");
    }

    // Create router
    let state = AppState::new(db, auth);
    let app = create_router(state, metrics_handle).layer(TraceLayer::new_for_http());

    // Determine bind address
    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port).parse()?;

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Seed the bootstrap administrators and sample cars.
///
/// Administrator fixtures carry precomputed salts so their digests stay
/// stable across runs; seeding is idempotent and safe on every startup.
async fn seed_fixtures(db: &Database) -> Result<()> {
    if !db.has_administrators().await? {
        let admin_hash = hasher::digest("admin123", "salt123");
        let super_hash = hasher::digest("super123", "salt456");
        db.seed_administrators(&[
            ("admin", "salt123", admin_hash.as_str()),
            ("superadmin", "salt456", super_hash.as_str()),
        ])
        .await?;
    }

    db.seed_cars(vec![
        NewCar {
            brand: "Toyota".to_string(),
            model: "Camry".to_string(),
            year: Some(2022),
            color: Some("Silver".to_string()),
        },
        NewCar {
            brand: "Honda".to_string(),
            model: "Civic".to_string(),
            year: Some(2023),
            color: Some("Blue".to_string()),
        },
        NewCar {
            brand: "Ford".to_string(),
            model: "Mustang".to_string(),
            year: Some(2023),
            color: Some("Red".to_string()),
        },
    ])
    .await?;

    Ok(())
}

/// Initialize logging
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    info!("Shutdown signal received");
}
