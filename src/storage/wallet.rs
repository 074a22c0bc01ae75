use super::{KeyValueStore, StorageError, WALLET_STORAGE_KEY};
use crate::models::{TransactionRecord, WalletRecord};
use std::sync::Arc;
use tracing::{debug, info};

/// The single persisted wallet record. Every read and write of wallet data
/// goes through here.
#[derive(Clone)]
pub struct WalletStorage {
    backend: Arc<dyn KeyValueStore>,
}

impl WalletStorage {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Serialize and store the record, replacing any existing one.
    pub fn save(&self, record: &WalletRecord) -> Result<(), StorageError> {
        let json = serde_json::to_string(record)?;
        self.backend.set_item(WALLET_STORAGE_KEY, &json)?;
        debug!("Saved wallet record with {} transactions", record.transactions.len());
        Ok(())
    }

    /// `Ok(None)` when nothing is stored or the backend cannot store anything.
    pub fn load(&self) -> Result<Option<WalletRecord>, StorageError> {
        match self.backend.get_item(WALLET_STORAGE_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.backend.remove_item(WALLET_STORAGE_KEY)?;
        info!("Cleared stored wallet");
        Ok(())
    }

    pub fn exists(&self) -> Result<bool, StorageError> {
        self.backend.contains(WALLET_STORAGE_KEY)
    }

    /// Put `transaction` at the head of the stored history. Returns `false`
    /// without writing anything if no wallet is stored.
    pub fn prepend_transaction(&self, transaction: TransactionRecord) -> Result<bool, StorageError> {
        let Some(mut record) = self.load()? else {
            debug!("No stored wallet, dropping {} record {}", transaction.kind, transaction.signature);
            return Ok(false);
        };
        record.prepend_transaction(transaction);
        self.save(&record)?;
        Ok(true)
    }
}
