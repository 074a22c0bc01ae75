use burner_wallet::{
    blockchain::{self, SolanaClient},
    config::{Config, Network},
    storage::{MemoryStore, WalletStorage},
};
use solana_sdk::signature::{Keypair, Signer};
use std::sync::Arc;
use tracing::{error, info, Level};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup tracing
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    info!("Starting devnet smoke test...");

    // 1. Setup
    let mut config = Config::from_env();
    if config.network != Network::Devnet {
        info!("Overriding {} with devnet, airdrops only work there", config.network.label());
        config.network = Network::Devnet;
    }
    let client = SolanaClient::new(&config);
    let storage = WalletStorage::new(Arc::new(MemoryStore::new()));

    // 2. Create wallet and round-trip the stored key
    let record = blockchain::create_wallet(&storage, config.network.rpc_url())?;
    let keypair = blockchain::derive_keypair(&record)?;
    let address = keypair.pubkey();
    info!("✅ Created wallet {}", address);

    // 3. Airdrop
    info!("Requesting 1 SOL airdrop...");
    match blockchain::request_test_funds(&storage, &client, &address, 1.0).await {
        Some(signature) => info!("✅ Airdrop confirmed: {}", signature),
        None => {
            error!("❌ Airdrop failed, the faucet may be rate limiting");
            return Err("airdrop failed".into());
        }
    }
    let balance = blockchain::fetch_balance(&client, &address).await;
    info!("✅ Balance after airdrop: {} SOL", balance);

    // 4. Transfer to a throwaway address
    let destination = Keypair::new().pubkey().to_string();
    info!("Sending 0.5 SOL to {}...", destination);
    match blockchain::transfer(&storage, &client, &keypair, &destination, 0.5).await {
        Some(signature) => info!("✅ Transfer confirmed: {}", signature),
        None => {
            error!("❌ Transfer failed");
            return Err("transfer failed".into());
        }
    }
    let balance = blockchain::fetch_balance(&client, &address).await;
    info!("✅ Balance after transfer: {} SOL", balance);

    // 5. Recorded history
    let record = storage.load()?.ok_or("wallet record disappeared")?;
    for tx in &record.transactions {
        info!("   {} {} SOL {:?} {}", tx.kind, tx.amount, tx.counterparty, tx.signature);
    }
    if record.transactions.len() != 2 {
        error!("❌ Expected 2 recorded transactions, found {}", record.transactions.len());
        return Err("history mismatch".into());
    }

    info!("All checks completed successfully!");
    Ok(())
}
