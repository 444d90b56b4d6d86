mod api;
mod config;
mod error;
mod indexer;
mod mint;
mod sessions;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;
use crate::indexer::Indexer;
use crate::mint::MintDesk;
use crate::sessions::SessionManager;
use crate::storage::MetadataStore;

pub use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub indexer: Indexer,
    pub sessions: SessionManager,
    pub storage: MetadataStore,
    pub mint: MintDesk,
    pub config: Arc<AppConfig>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prism=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .init();

    println!("================================================");
    println!("         IDENTITY PRISM - Starting Up           ");
    println!("================================================");

    let config = AppConfig::load().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    println!("[CONFIG] Server: {}:{}", config.server.host, config.server.port);
    match config.helius.proxy() {
        Some(proxy) => println!("[CONFIG] Ledger access via proxy: {}", proxy),
        None => {
            let keys = config.helius.keys();
            if keys.is_empty() {
                println!("[CONFIG] Helius API keys: *** EMPTY - PLEASE SET PRISM__HELIUS__API_KEYS ***");
            } else {
                println!("[CONFIG] Helius API keys: {} configured ({})", keys.len(), config.helius.rpc_base);
            }
        }
    }
    println!("[CONFIG] Metadata dir: {}", config.storage.metadata_dir);
    println!("[CONFIG] Public base URL: {}", config.storage.public_base_url);

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        "Starting Identity Prism"
    );

    println!("[STORAGE] Preparing metadata store...");
    let storage = MetadataStore::new(&config.storage.metadata_dir, &config.storage.public_base_url);
    storage
        .init()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to prepare metadata dir: {}", e))?;

    println!("[INDEXER] Initializing ledger client...");
    let indexer = Indexer::new(&config.helius)
        .map_err(|e| anyhow::anyhow!("Failed to build ledger client: {}", e))?;

    let mint = MintDesk::new(config.mint.branding(), storage.clone(), config.mint.pending_ttl());
    let prune_every = Duration::from_secs(config.mint.prune_interval_seconds.max(1));
    mint.spawn_pruner(prune_every);
    println!(
        "[MINT] Pending requests expire after {}s (pruned every {}s)",
        config.mint.pending_ttl().num_seconds(),
        prune_every.as_secs()
    );

    let sessions = SessionManager::new(config.server.session_ttl());
    sessions.spawn_pruner(prune_every);
    println!(
        "[SESSION] Finished sessions evicted after {}s",
        config.server.session_ttl().num_seconds()
    );

    let state = AppState {
        indexer,
        sessions,
        storage,
        mint,
        config: Arc::new(config.clone()),
    };

    println!("[ROUTER] Setting up API routes...");
    let app = Router::new()
        .merge(api::create_router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);
    println!("[ROUTER] Routes configured: /health, /api/v1/identity/{{wallet}}, /api/v1/sessions/*, /api/v1/mint/*, /metadata, /assets, /rpc");

    let addr: SocketAddr = config.server_addr().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    println!("================================================");
    println!("  Server listening on http://{}", addr);
    println!("================================================");
    println!();

    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
