//! Shared wallet state read by every screen.
//!
//! `WalletStore` owns the loaded record, the derived keypair and the cached
//! balance. Screens read `snapshot()` or `subscribe()` to changes; actions
//! update the state and publish a new snapshot when they settle.

use crate::blockchain::{self, ClusterClient};
use crate::config::Network;
use crate::models::{TransactionRecord, WalletRecord};
use crate::storage::{StorageError, WalletStorage};
use crate::validation::{validate_against_balance, TransferRequest, ValidationError};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    NoWallet,
    Loaded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WalletSnapshot {
    pub load_state: LoadState,
    pub public_key: Option<String>,
    /// SOL; `None` until fetched or after a failed refresh.
    pub balance: Option<f64>,
    pub transactions: Vec<TransactionRecord>,
    pub network: Network,
}

impl WalletSnapshot {
    fn loading(network: Network) -> Self {
        Self {
            load_state: LoadState::Loading,
            public_key: None,
            balance: None,
            transactions: Vec::new(),
            network,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    pub fn has_wallet(&self) -> bool {
        self.load_state == LoadState::Loaded
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Default,
    Destructive,
}

/// A transient notification shown once by the next rendered screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn info(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant: ToastVariant::Default,
        }
    }

    pub fn error(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant: ToastVariant::Destructive,
        }
    }
}

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("No wallet loaded")]
    NoWallet,

    #[error("Another operation is still in progress")]
    Busy,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("{0}")]
    Failed(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Default)]
struct Inner {
    record: Option<WalletRecord>,
    keypair: Option<Arc<Keypair>>,
    balance: Option<f64>,
    settled: bool,
}

pub struct WalletStore {
    network: Network,
    airdrop_amount: f64,
    storage: WalletStorage,
    client: Arc<dyn ClusterClient>,
    inner: Mutex<Inner>,
    /// Held for the duration of an airdrop or transfer.
    action_guard: Mutex<()>,
    toasts: std::sync::Mutex<Vec<Toast>>,
    updates: watch::Sender<WalletSnapshot>,
}

impl WalletStore {
    pub fn new(network: Network, storage: WalletStorage, client: Arc<dyn ClusterClient>) -> Self {
        let (updates, _) = watch::channel(WalletSnapshot::loading(network));
        Self {
            network,
            airdrop_amount: blockchain::wallet::DEFAULT_AIRDROP_SOL,
            storage,
            client,
            inner: Mutex::new(Inner::default()),
            action_guard: Mutex::new(()),
            toasts: std::sync::Mutex::new(Vec::new()),
            updates,
        }
    }

    pub fn with_airdrop_amount(mut self, amount: f64) -> Self {
        self.airdrop_amount = amount;
        self
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn airdrop_amount(&self) -> f64 {
        self.airdrop_amount
    }

    pub fn snapshot(&self) -> WalletSnapshot {
        self.updates.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WalletSnapshot> {
        self.updates.subscribe()
    }

    /// Whether a wallet is persisted, independent of what is loaded.
    pub fn has_stored_wallet(&self) -> bool {
        self.storage.exists().unwrap_or_else(|e| {
            error!("Failed to check for stored wallet: {}", e);
            false
        })
    }

    pub fn push_toast(&self, toast: Toast) {
        let mut toasts = self.toasts.lock().unwrap_or_else(|e| e.into_inner());
        toasts.push(toast);
    }

    pub fn take_toasts(&self) -> Vec<Toast> {
        let mut toasts = self.toasts.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *toasts)
    }

    fn publish(&self, inner: &Inner) {
        let load_state = match (inner.settled, &inner.keypair) {
            (false, _) => LoadState::Loading,
            (true, Some(_)) => LoadState::Loaded,
            (true, None) => LoadState::NoWallet,
        };
        let snapshot = WalletSnapshot {
            load_state,
            public_key: inner.keypair.as_ref().map(|kp| kp.pubkey().to_string()),
            balance: inner.balance,
            transactions: inner
                .record
                .as_ref()
                .map(|r| r.transactions.clone())
                .unwrap_or_default(),
            network: self.network,
        };
        self.updates.send_replace(snapshot);
    }

    /// Load the stored wallet, if any, and fetch its balance. Settles the
    /// store out of `Loading` whatever happens.
    pub async fn initialize(&self) {
        info!("Initializing wallet store on {}", self.network.label());

        let address = {
            let mut inner = self.inner.lock().await;
            // A create or reset already decided which wallet is current
            if inner.settled {
                info!("Wallet store already settled, skipping stored wallet");
                return;
            }
            match self.load_stored_wallet() {
                Ok(Some((record, keypair))) => {
                    if record.network != self.network.rpc_url() {
                        warn!(
                            "Stored wallet was created on {}, connecting to {}",
                            record.network,
                            self.network.rpc_url()
                        );
                    }
                    let address = keypair.pubkey();
                    inner.record = Some(record);
                    inner.keypair = Some(Arc::new(keypair));
                    Some(address)
                }
                Ok(None) => None,
                Err(e) => {
                    error!("Failed to initialize wallet: {}", e);
                    self.push_toast(Toast::error("Error", "Failed to initialize wallet"));
                    None
                }
            }
        };

        let balance = match address {
            Some(address) => match blockchain::try_fetch_balance(self.client.as_ref(), &address).await {
                Ok(balance) => Some(balance),
                Err(e) => {
                    error!("Error fetching balance for {}: {}", address, e);
                    None
                }
            },
            None => None,
        };

        let mut inner = self.inner.lock().await;
        // Same for one that landed during the balance query
        if !inner.settled {
            inner.balance = balance;
            inner.settled = true;
            self.publish(&inner);
        }
        drop(inner);
        info!("Wallet store ready: {:?}", self.snapshot().load_state);
    }

    fn load_stored_wallet(&self) -> Result<Option<(WalletRecord, Keypair)>, blockchain::WalletError> {
        let Some(record) = self.storage.load()? else {
            return Ok(None);
        };
        let keypair = blockchain::derive_keypair(&record)?;
        Ok(Some((record, keypair)))
    }

    /// Replace whatever wallet exists with a fresh one.
    pub async fn create_new_wallet(&self) -> Result<String, ActionError> {
        let created = blockchain::create_wallet(&self.storage, self.network.rpc_url())
            .and_then(|record| Ok((blockchain::derive_keypair(&record)?, record)));

        let (keypair, record) = match created {
            Ok(created) => created,
            Err(e) => {
                error!("Failed to create wallet: {}", e);
                self.push_toast(Toast::error("Error", "Failed to create wallet"));
                return Err(ActionError::Failed(e.to_string()));
            }
        };

        let address = keypair.pubkey().to_string();
        let mut inner = self.inner.lock().await;
        inner.record = Some(record);
        inner.keypair = Some(Arc::new(keypair));
        inner.balance = Some(0.0);
        inner.settled = true;
        self.publish(&inner);
        drop(inner);

        self.push_toast(Toast::info("Wallet Created", "Your new burner wallet has been created!"));
        Ok(address)
    }

    /// Forget the wallet and its history.
    pub async fn reset_wallet(&self) -> Result<(), ActionError> {
        self.storage.clear()?;

        let mut inner = self.inner.lock().await;
        inner.record = None;
        inner.keypair = None;
        inner.balance = None;
        inner.settled = true;
        self.publish(&inner);
        drop(inner);

        self.push_toast(Toast::info("Wallet Reset", "Your wallet has been reset"));
        Ok(())
    }

    async fn current_keypair(&self) -> Result<Arc<Keypair>, ActionError> {
        let inner = self.inner.lock().await;
        inner.keypair.clone().ok_or(ActionError::NoWallet)
    }

    /// Re-query the balance. On failure the balance becomes unknown.
    pub async fn refresh_balance(&self) -> Result<f64, ActionError> {
        let keypair = self.current_keypair().await?;
        let address = keypair.pubkey();

        let result = blockchain::try_fetch_balance(self.client.as_ref(), &address).await;

        let mut inner = self.inner.lock().await;
        // Reset while the query was in flight
        if !inner.keypair.as_ref().is_some_and(|kp| kp.pubkey() == address) {
            return Err(ActionError::NoWallet);
        }
        match result {
            Ok(balance) => {
                inner.balance = Some(balance);
                self.publish(&inner);
                Ok(balance)
            }
            Err(e) => {
                error!("Failed to refresh balance: {}", e);
                inner.balance = None;
                self.publish(&inner);
                drop(inner);
                self.push_toast(Toast::error("Error", "Failed to refresh balance"));
                Err(ActionError::Failed(e.to_string()))
            }
        }
    }

    /// Re-read the persisted history after an operation appended to it.
    async fn reload_transactions(&self, address: &Pubkey) {
        let record = match self.storage.load() {
            Ok(record) => record,
            Err(e) => {
                error!("Failed to reload wallet record: {}", e);
                return;
            }
        };
        let mut inner = self.inner.lock().await;
        if inner.keypair.as_ref().is_some_and(|kp| kp.pubkey() == *address) {
            inner.record = record;
            self.publish(&inner);
        }
    }

    pub async fn request_airdrop(&self) -> Result<Signature, ActionError> {
        let _guard = self.action_guard.try_lock().map_err(|_| ActionError::Busy)?;
        let keypair = self.current_keypair().await?;
        let address = keypair.pubkey();
        let amount = self.airdrop_amount;

        let Some(signature) =
            blockchain::request_test_funds(&self.storage, self.client.as_ref(), &address, amount).await
        else {
            self.push_toast(Toast::error(
                "Airdrop Failed",
                format!("Unable to airdrop SOL. This only works on {}.", Network::Devnet.cluster()),
            ));
            return Err(ActionError::Failed("airdrop failed".to_string()));
        };

        self.reload_transactions(&address).await;
        self.push_toast(Toast::info(
            "Airdrop Success!",
            format!("{} SOL has been airdropped to your wallet", amount),
        ));
        let _ = self.refresh_balance().await;
        Ok(signature)
    }

    /// Send SOL after checking the amount against the cached balance.
    pub async fn send(&self, request: &TransferRequest) -> Result<Signature, ActionError> {
        let _guard = self.action_guard.try_lock().map_err(|_| ActionError::Busy)?;
        let keypair = self.current_keypair().await?;
        let address = keypair.pubkey();

        let available = self.snapshot().balance.unwrap_or(0.0);
        if let Err(e) = validate_against_balance(request.amount, available) {
            self.push_toast(Toast::error(
                "Insufficient Balance",
                format!("You only have {} SOL available", available),
            ));
            return Err(e.into());
        }

        let destination = request.recipient.to_string();
        let Some(signature) = blockchain::transfer(
            &self.storage,
            self.client.as_ref(),
            &keypair,
            &destination,
            request.amount,
        )
        .await
        else {
            self.push_toast(Toast::error("Transaction Failed", "Failed to send SOL"));
            return Err(ActionError::Failed("transfer failed".to_string()));
        };

        self.reload_transactions(&address).await;
        self.push_toast(Toast::info(
            "Transaction Successful",
            format!("Sent {} SOL successfully", request.amount),
        ));
        let _ = self.refresh_balance().await;
        Ok(signature)
    }
}
