//! tunelink — smart link redirector for music releases
//!
//! Creates shareable landing pages that list one release's links across
//! every streaming platform the Odesli lookup API knows about.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use tunelink::config::{Config, StoreBackend};
use tunelink::service::SmartLinkService;
use tunelink::services::{GeoClient, GeoResolver, OdesliClient};
use tunelink::store::{FileStore, LinkStore, SqliteStore};
use tunelink::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Build identification immediately after tracing init
    info!(
        "Starting tunelink v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = Config::from_env();

    let store: Arc<dyn LinkStore> = match config.backend {
        StoreBackend::Sqlite => {
            let store = SqliteStore::open(&config.data_path)
                .await
                .map_err(|e| anyhow::anyhow!("failed to open SQLite store: {e}"))?;
            Arc::new(store)
        }
        StoreBackend::File => {
            let store = FileStore::open(&config.data_path)
                .await
                .map_err(|e| anyhow::anyhow!("failed to open flat-file store: {e}"))?;
            Arc::new(store)
        }
    };

    let resolver = OdesliClient::new(&config.odesli_url)
        .map_err(|e| anyhow::anyhow!("failed to build lookup client: {e}"))?;

    let geo: Option<Arc<dyn GeoResolver>> = match GeoClient::new(&config.geo_url) {
        Some(client) => Some(Arc::new(client)),
        None => {
            info!("geolocation client unavailable; provenance enrichment disabled");
            None
        }
    };

    let service = SmartLinkService::new(store, Arc::new(resolver), geo);
    let state = AppState::new(Arc::new(service), config.public_host.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    info!("tunelink listening on http://{}", config.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
