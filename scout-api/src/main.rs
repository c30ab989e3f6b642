//! scout-api - Scoutline recruiting API service
//!
//! Serves athlete profiles, combine metrics, benchmark comparisons, adult
//! height predictions, college match scores, the social feed, application
//! checklists, and parent dashboards over HTTP, with SSE change
//! notifications.

use anyhow::Result;
use clap::Parser;
use scout_common::api::auth::load_shared_secret;
use scout_common::events::EventBus;
use tracing::{error, info};

use scout_api::{build_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "scout-api", about = "Scoutline recruiting API service")]
struct Cli {
    /// Root data folder (overrides env var and config file)
    #[arg(long)]
    root_folder: Option<String>,

    /// Bind address
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Listen port
    #[arg(long, default_value_t = 5780)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting Scoutline API (scout-api) v{}", env!("CARGO_PKG_VERSION"));

    let root_folder = scout_common::config::resolve_root_folder(cli.root_folder.as_deref());
    let db_path = scout_common::config::ensure_root_folder(&root_folder)?;
    info!("Database path: {}", db_path.display());

    let pool = match scout_common::db::init_database(&db_path).await {
        Ok(pool) => {
            info!("Database connection established");
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let shared_secret = load_shared_secret(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load shared secret: {}", e))?;
    if shared_secret == 0 {
        info!("API authentication disabled (shared_secret = 0)");
    } else {
        info!("Loaded shared secret for API authentication");
    }

    let bus = EventBus::new(256);
    let state = AppState::new(pool, bus, shared_secret);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((cli.host.as_str(), cli.port)).await?;
    info!("scout-api listening on http://{}:{}", cli.host, cli.port);
    info!("Health check: http://{}:{}/health", cli.host, cli.port);

    axum::serve(listener, app).await?;

    Ok(())
}
