pub mod blockchain;
pub mod config;
pub mod models;
pub mod state;
pub mod storage;
pub mod validation;
pub mod web;

#[cfg(test)]
pub mod tests;

// Re-export specific items for convenience
pub use blockchain::{ClientError, ClusterClient, SolanaClient, WalletError};
pub use config::{Config, Network};
pub use models::{TransactionKind, TransactionRecord, WalletRecord};
pub use state::{ActionError, LoadState, WalletSnapshot, WalletStore};
pub use storage::{FileStore, KeyValueStore, MemoryStore, WalletStorage};
pub use validation::{format_address_for_display, is_valid_address, TransferRequest, ValidationError};
pub use web::create_router;
