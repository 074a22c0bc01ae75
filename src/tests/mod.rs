//! Test support: an in-memory cluster and store builders

mod wallet_tests;

use crate::blockchain::{ClientError, ClusterClient};
use crate::config::Network;
use crate::state::WalletStore;
use crate::storage::{MemoryStore, WalletStorage};
use async_trait::async_trait;
use solana_client::client_error::{ClientError as RpcClientError, ClientErrorKind};
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::system_program;
use solana_sdk::transaction::Transaction;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const FEE_LAMPORTS: u64 = 5_000;

/// Ledger of balances that understands airdrops and system transfers.
#[derive(Default)]
pub struct MockCluster {
    balances: Mutex<HashMap<Pubkey, u64>>,
    unavailable: AtomicBool,
    unconfirmed: AtomicBool,
    airdrop_delay: Mutex<Option<Duration>>,
    pub airdrop_requests: AtomicUsize,
    pub submitted_transactions: AtomicUsize,
}

fn unavailable() -> ClientError {
    ClientError::RpcError(RpcClientError::from(ClientErrorKind::Custom(
        "cluster unavailable".to_string(),
    )))
}

impl MockCluster {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every RPC call fails.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Airdrops are accepted but never confirm.
    pub fn set_unconfirmed(&self, unconfirmed: bool) {
        self.unconfirmed.store(unconfirmed, Ordering::SeqCst);
    }

    pub fn set_airdrop_delay(&self, delay: Duration) {
        *self.airdrop_delay.lock().unwrap() = Some(delay);
    }

    pub fn credit(&self, pubkey: &Pubkey, lamports: u64) {
        *self.balances.lock().unwrap().entry(*pubkey).or_default() += lamports;
    }

    pub fn lamports_of(&self, pubkey: &Pubkey) -> u64 {
        self.balances.lock().unwrap().get(pubkey).copied().unwrap_or(0)
    }

    fn check_available(&self) -> Result<(), ClientError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }
}

#[async_trait]
impl ClusterClient for MockCluster {
    fn endpoint(&self) -> &str {
        "mock://cluster"
    }

    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, ClientError> {
        self.check_available()?;
        Ok(self.lamports_of(pubkey))
    }

    async fn request_airdrop(&self, pubkey: &Pubkey, lamports: u64) -> Result<Signature, ClientError> {
        let delay = *self.airdrop_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check_available()?;
        self.airdrop_requests.fetch_add(1, Ordering::SeqCst);

        self.credit(pubkey, lamports);
        Ok(Signature::new_unique())
    }

    async fn confirm_signature(&self, _signature: &Signature) -> Result<(), ClientError> {
        self.check_available()?;
        if self.unconfirmed.load(Ordering::SeqCst) {
            return Err(ClientError::RpcError(RpcClientError::from(ClientErrorKind::Custom(
                "signature not confirmed in time".to_string(),
            ))));
        }
        Ok(())
    }

    async fn latest_blockhash(&self) -> Result<Hash, ClientError> {
        self.check_available()?;
        Ok(Hash::new_unique())
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, ClientError> {
        self.check_available()?;
        transaction
            .verify()
            .map_err(|e| ClientError::InvalidTransaction(e.to_string()))?;

        let message = &transaction.message;
        let instruction = message
            .instructions
            .first()
            .ok_or_else(|| ClientError::InvalidTransaction("no instructions".to_string()))?;
        if message.account_keys[instruction.program_id_index as usize] != system_program::id() {
            return Err(ClientError::InvalidTransaction("not a system instruction".to_string()));
        }

        // Bincode system transfer: u32 variant index 2, then u64 lamports
        let data = &instruction.data;
        if data.len() != 12 || data[..4] != [2, 0, 0, 0] {
            return Err(ClientError::InvalidTransaction("not a transfer".to_string()));
        }
        let mut amount = [0u8; 8];
        amount.copy_from_slice(&data[4..12]);
        let lamports = u64::from_le_bytes(amount);

        let from = message.account_keys[instruction.accounts[0] as usize];
        let to = message.account_keys[instruction.accounts[1] as usize];

        let mut balances = self.balances.lock().unwrap();
        let available = balances.get(&from).copied().unwrap_or(0);
        if available < lamports + FEE_LAMPORTS {
            return Err(ClientError::InvalidTransaction("insufficient funds for fee".to_string()));
        }
        balances.insert(from, available - lamports - FEE_LAMPORTS);
        *balances.entry(to).or_default() += lamports;
        drop(balances);

        self.submitted_transactions.fetch_add(1, Ordering::SeqCst);
        Ok(transaction.signatures[0])
    }
}

pub fn memory_storage() -> WalletStorage {
    WalletStorage::new(Arc::new(MemoryStore::new()))
}

pub fn test_store(cluster: Arc<MockCluster>) -> (Arc<WalletStore>, WalletStorage) {
    let storage = memory_storage();
    let store = Arc::new(WalletStore::new(Network::Devnet, storage.clone(), cluster));
    (store, storage)
}
