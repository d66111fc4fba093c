use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use university_api::app::{self, AppState};
use university_api::config::{AppConfig, StorageBackend};

#[derive(Parser, Debug)]
#[command(name = "university-api", version, about = "University directory REST API")]
struct Cli {
    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind (overrides BIND_ADDR)
    #[arg(short, long)]
    bind: Option<String>,

    /// Storage backend (overrides STORAGE_BACKEND)
    #[arg(short, long, value_enum)]
    storage: Option<StorageBackend>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("university_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env();
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(bind) = cli.bind {
        config.server.bind_addr = bind;
    }
    if let Some(storage) = cli.storage {
        config.storage.backend = storage;
    }
    config.validate()?;

    tracing::info!(
        environment = ?config.environment,
        storage = ?config.storage.backend,
        "Starting University API"
    );

    let bind_addr = config.server.socket_addr();
    let state = AppState::connect(config).await?;
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    app::serve(listener, state, app::shutdown_signal()).await
}
