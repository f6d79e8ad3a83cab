//! Petrol Service - HTTP API and offline asset server.
//!
//! Run with: `cargo run -p petrol-service`

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use petrol_service::{AppState, Config, api};

/// Petrol Service - HTTP API and offline asset server.
#[derive(Parser, Debug)]
#[command(name = "petrol-service")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address (overrides config).
    #[arg(short, long)]
    bind: Option<String>,

    /// Database path (overrides config).
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Asset origin (overrides config).
    #[arg(long)]
    origin: Option<String>,

    /// Do not install the offline asset cache at startup.
    #[arg(long)]
    no_cache: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("petrol_service=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default().unwrap_or_else(|e| {
            warn!("Ignoring default config: {}", e);
            Config::default()
        }),
    };

    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(db_path) = args.database {
        config.storage.path = db_path;
    }
    if let Some(origin) = args.origin {
        config.assets.origin = origin;
    }

    config.validate()?;

    let addr: SocketAddr = config.server.bind.parse()?;
    let state = AppState::from_config(config)?;

    // Open the database in the background; requests wait on the ledger's gate.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if state.ledger.ready().await.is_ok() {
                info!("Ledger ready");
            }
        });
    }

    if args.no_cache {
        info!("Offline asset cache disabled");
    } else {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = state.cache.install().await {
                error!("Assets will be served from the network only: {}", e);
            }
        });
    }

    let app = Router::new()
        .merge(api::router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
