pub mod backend;
pub mod wallet;

use thiserror::Error;

pub use backend::{DetachedStore, FileStore, KeyValueStore, MemoryStore};
pub use wallet::WalletStorage;

/// Key the wallet record lives under.
pub const WALLET_STORAGE_KEY: &str = "solanaWallet";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored wallet is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}
