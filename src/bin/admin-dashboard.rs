use std::sync::Arc;

use admin_sync::config::DashboardConfig;
use admin_sync::http::{self, AppState};
use admin_sync::{InMemoryDocumentStore, InMemoryUserDirectory};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = DashboardConfig::from_env()?;

    let state = AppState::new(
        Arc::new(InMemoryDocumentStore::new()),
        Arc::new(InMemoryUserDirectory::new()),
        config.credentials.clone(),
    )
    .with_users_page(config.users_page);

    info!("Binding to {}", config.bind_addr);
    http::serve(state, &config.bind_addr).await?;
    Ok(())
}
