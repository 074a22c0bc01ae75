pub mod client;
pub mod wallet;

// Re-exports for convenience
pub use client::{ClientError, ClusterClient, SolanaClient};
pub use wallet::{
    create_wallet, derive_keypair, fetch_balance, request_test_funds, transfer, try_fetch_balance,
    WalletError,
};
