use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use intake::clock::SystemClock;
use intake::config::{Config, StoreKind};
use intake::db::create_pool;
use intake::repository::{
    ApplicationRepository, InMemoryApplicationRepository, PgApplicationRepository,
};
use intake::routes::{build_router, cors_layer};
use intake::state::AppState;
use intake::uploads::UploadStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{crate_name}={level},tower_http={level}",
                crate_name = env!("CARGO_CRATE_NAME"),
                level = &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting intake API v{}", env!("CARGO_PKG_VERSION"));

    // Upload directory is created once, here
    let uploads = UploadStore::new(&config.upload_dir, Arc::new(SystemClock));
    uploads
        .ensure_dir()
        .with_context(|| format!("Cannot create {}", config.upload_dir.display()))?;

    let repository: Arc<dyn ApplicationRepository> = match config.store {
        StoreKind::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres store")?;
            let repository = PgApplicationRepository::new(create_pool(url)?);
            // Unreachable store is logged; requests retry the schema until it is back
            if repository.ensure_schema().await.is_err() {
                warn!("Starting without a reachable store");
            }
            Arc::new(repository)
        }
        StoreKind::Memory => {
            info!("Using in-memory application store; records are lost on restart");
            Arc::new(InMemoryApplicationRepository::new())
        }
    };

    let state = AppState {
        repository,
        uploads,
    };

    let app = build_router(state)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
