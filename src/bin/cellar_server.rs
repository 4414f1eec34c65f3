//! HTTP server for the cellar ledger.

use std::path::PathBuf;
use std::sync::Arc;

use cellar_map::api;
use cellar_map::{Cellar, CellarConfig, InMemoryStore, JsonFileStore, Store};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Serve the cellar command API
#[derive(Parser, Debug)]
#[command(name = "cellar_server")]
#[command(version)]
struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value_t = 3000, env = "CELLAR_PORT")]
    port: u16,

    /// Bind address
    #[arg(long, default_value = "127.0.0.1", env = "CELLAR_HOST")]
    host: String,

    /// Directory holding the collection files. Omit to keep data in memory.
    #[arg(short = 'D', long, env = "CELLAR_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// User recorded on changes from requests without `x-cellar-user-id`
    #[arg(long, default_value = cellar_map::DEFAULT_USER_ID, env = "CELLAR_USER_ID")]
    user_id: String,
}

impl ServeArgs {
    fn config(self) -> CellarConfig {
        let config = CellarConfig::default()
            .with_bind(self.host, self.port)
            .with_default_user(self.user_id);
        match self.data_dir {
            Some(dir) => config.with_data_dir(dir),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("cellar_map=info".parse()?))
        .init();

    let config = ServeArgs::parse().config();
    match &config.data_dir {
        Some(dir) => {
            let store = JsonFileStore::open(dir)?;
            tracing::info!(dir = %dir.display(), "using file store");
            run(store, &config).await
        }
        None => {
            tracing::warn!("no data directory configured; cellar is kept in memory");
            run(InMemoryStore::new(), &config).await
        }
    }
}

async fn run<S: Store + 'static>(
    store: S,
    config: &CellarConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let cellar = Cellar::from_config(store, config);
    let service = Arc::new(api::cellar_service(cellar));
    let addr = format!("{}:{}", config.host, config.port);
    api::serve(service, &addr).await?;
    Ok(())
}
