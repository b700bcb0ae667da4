//! Shift attribution server.
//!
//! Environment:
//! - `ATTRIBUTION_CONFIG` settings file (default `./config/attribution.yaml`)
//! - `ATTRIBUTION_SNAPSHOT` optional JSON roster snapshot seeding the store
//! - `ATTRIBUTION_ADDR` listen address (default `0.0.0.0:3000`)

use std::env;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use shift_attribution::api::{AppState, create_router};
use shift_attribution::config::ConfigLoader;
use shift_attribution::service::AttributionService;
use shift_attribution::store::InMemoryStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "./config/attribution.yaml";
const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let config_path = env::var("ATTRIBUTION_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_owned());
    let settings = ConfigLoader::load(&config_path)?;
    info!(
        path = %config_path,
        equity_window = ?settings.config().equity_window,
        overtime_enabled = settings.config().overtime_enabled,
        "Loaded attribution settings"
    );

    let store = match env::var("ATTRIBUTION_SNAPSHOT") {
        Ok(path) => InMemoryStore::from_snapshot_file(path)?,
        Err(_) => InMemoryStore::new(),
    };
    let service = AttributionService::in_memory(Arc::new(store));
    let app = create_router(AppState::new(service, settings));

    let address: SocketAddr = env::var("ATTRIBUTION_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_owned())
        .parse()?;
    let listener = tokio::net::TcpListener::bind(address).await?;
    info!(%address, "Shift attribution server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
