//! Dashboard server
//!
//! Reads `INVOICE_CONFIG` (YAML) and `POSTGRES_URL`, seeds the configured
//! users and serves the form actions until SIGTERM or Ctrl+C.

use anyhow::Result;
use invoice_actions::config::AppConfig;
use invoice_actions::server::{ServerBuilder, seed_users};
use invoice_actions::storage::InMemoryStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    #[cfg(feature = "postgres")]
    {
        if config.database.url.is_some() {
            use invoice_actions::storage::PostgresStore;

            let store = PostgresStore::connect(&config.database).await?;
            store.migrate().await?;
            seed_users(&store, &config.users).await?;
            tracing::info!("using PostgreSQL store");

            return ServerBuilder::new()
                .with_config(config)
                .with_store(store)
                .serve()
                .await;
        }
    }

    let store = InMemoryStore::new();
    seed_users(&store, &config.users).await?;
    tracing::info!("using in-memory store");

    ServerBuilder::new()
        .with_config(config)
        .with_store(store)
        .serve()
        .await
}
