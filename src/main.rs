// Initialize configuration
// Set up logging
// Open local wallet storage
// Create Solana client and shared wallet store
// Load the stored wallet in the background
// Serve the wallet screens until Ctrl-C

use burner_wallet::{config::Config, create_router, FileStore, SolanaClient, WalletStorage, WalletStore};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting burner-wallet");

    // Load configuration
    let config = Config::from_env();
    tracing::info!("Configuration loaded: {:?}", config);

    // Local storage
    let backend = Arc::new(FileStore::new(config.storage_dir.clone()));
    tracing::info!("Wallet storage at {}", backend.dir().display());
    let storage = WalletStorage::new(backend);

    // Shared state
    let client = Arc::new(SolanaClient::new(&config));
    let store = Arc::new(
        WalletStore::new(config.network, storage, client).with_airdrop_amount(config.airdrop_amount_sol),
    );

    // Screens show a loading page until this settles
    let init_store = store.clone();
    tokio::spawn(async move {
        init_store.initialize().await;
    });

    let shutdown = CancellationToken::new();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
        }
        signal_shutdown.cancel();
    });

    // Start HTTP server
    let app = create_router(store);
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Wallet available at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("Shut down cleanly");
    Ok(())
}
