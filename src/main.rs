//! Auto parts storefront - catalog and cart service

use anyhow::Result;
use autoparts_store::events::EventPublisher;
use autoparts_store::images::{CloudinaryStore, DisabledImageStore, ImageStore};
use autoparts_store::{web, AppConfig, AppState};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let db = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&db).await?;

    let events = EventPublisher::connect(config.nats_url.as_deref()).await;
    let images: Arc<dyn ImageStore> = match config.cloudinary.clone() {
        Some(settings) => Arc::new(CloudinaryStore::new(settings)?),
        None => {
            tracing::warn!("image host not configured, product image uploads will fail");
            Arc::new(DisabledImageStore)
        }
    };

    let state = AppState { db, images, events };
    let app = web::router(state, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!("🚀 Auto parts store listening on {}", listener.local_addr()?);
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
