//! BrickVest server entry point.

use brickvest_auth::AuthConfig;
use brickvest_core::storage::{PropertyStore, Storage};
use brickvest_db::{DbManager, SurrealStorage, run_migrations};
use brickvest_memstore::MemStorage;
use brickvest_server::config::{AppConfig, StorageBackend};
use brickvest_server::routes;
use brickvest_server::state::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("brickvest=info")),
        )
        .json()
        .init();

    let config = AppConfig::from_env()?;
    info!(backend = ?config.backend, addr = %config.bind_addr, "Starting BrickVest server");

    match config.backend {
        StorageBackend::Mem => {
            let storage = MemStorage::new();
            serve(storage, &config).await?;
        }
        StorageBackend::Surreal => {
            let manager = DbManager::connect(&config.db).await?;
            run_migrations(manager.client()).await?;
            let storage = SurrealStorage::new(manager.client().clone());
            serve(storage, &config).await?;
        }
    }

    Ok(())
}

async fn serve<S: Storage>(
    storage: S,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    storage.initialize_properties().await?;

    let auth_config = AuthConfig {
        pepper: config.pepper.clone(),
        session_lifetime_secs: config.session_lifetime_secs,
        ..AuthConfig::default()
    };

    let state = AppState::new(storage, auth_config);
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
