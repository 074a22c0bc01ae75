//! Wallet operations over the Solana SDK.
//!
//! Network operations report failure as `None` after logging it; nothing is
//! retried and nothing is recorded unless the cluster confirmed the
//! operation. Resubmitting a transfer sends a second, independent transfer.

use crate::blockchain::client::{ClientError, ClusterClient};
use crate::models::{TransactionRecord, WalletRecord};
use crate::storage::{StorageError, WalletStorage};
use chrono::Utc;
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::system_instruction;
use solana_sdk::transaction::Transaction;
use std::str::FromStr;
use thiserror::Error;
use tracing::{error, info, warn};

pub const DEFAULT_AIRDROP_SOL: f64 = 1.0;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Stored keypair could not be decoded: {0}")]
    Decoding(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub fn sol_to_lamports(sol: f64) -> u64 {
    (sol * LAMPORTS_PER_SOL as f64).round() as u64
}

pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Generate a fresh keypair and persist it as the wallet, discarding any
/// previous wallet and its history.
pub fn create_wallet(storage: &WalletStorage, network: &str) -> Result<WalletRecord, WalletError> {
    let keypair = Keypair::new();
    let record = WalletRecord::new(bs58::encode(keypair.to_bytes()).into_string(), network.to_string());
    storage.save(&record)?;

    info!("Created wallet {} on {}", keypair.pubkey(), network);
    Ok(record)
}

/// Rebuild the signing keypair from its stored encoding.
pub fn derive_keypair(record: &WalletRecord) -> Result<Keypair, WalletError> {
    let bytes = bs58::decode(&record.secret_key_encoded)
        .into_vec()
        .map_err(|e| WalletError::Decoding(e.to_string()))?;

    #[allow(deprecated)]
    let keypair = Keypair::from_bytes(&bytes).map_err(|e| WalletError::Decoding(e.to_string()))?;
    Ok(keypair)
}

pub async fn try_fetch_balance(client: &dyn ClusterClient, address: &Pubkey) -> Result<f64, ClientError> {
    let lamports = client.get_balance(address).await?;
    Ok(lamports_to_sol(lamports))
}

/// Balance in SOL. A failed query is logged and reads as zero.
pub async fn fetch_balance(client: &dyn ClusterClient, address: &Pubkey) -> f64 {
    match try_fetch_balance(client, address).await {
        Ok(balance) => balance,
        Err(e) => {
            error!("Error fetching balance for {}: {}", address, e);
            0.0
        }
    }
}

/// Ask the cluster's faucet for `amount` SOL and record the airdrop once it
/// is confirmed.
pub async fn request_test_funds(
    storage: &WalletStorage,
    client: &dyn ClusterClient,
    address: &Pubkey,
    amount: f64,
) -> Option<Signature> {
    let lamports = sol_to_lamports(amount);
    if lamports == 0 {
        warn!("Refusing airdrop of {} SOL", amount);
        return None;
    }

    let signature = match airdrop_and_confirm(client, address, lamports).await {
        Ok(signature) => signature,
        Err(e) => {
            error!("Error requesting airdrop on {}: {}", client.endpoint(), e);
            return None;
        }
    };
    info!("Airdrop of {} SOL to {} confirmed: {}", amount, address, signature);

    let record = TransactionRecord::airdrop(signature.to_string(), now_millis(), amount);
    record_transaction(storage, record);
    Some(signature)
}

async fn airdrop_and_confirm(
    client: &dyn ClusterClient,
    address: &Pubkey,
    lamports: u64,
) -> Result<Signature, ClientError> {
    let signature = client.request_airdrop(address, lamports).await?;
    client.confirm_signature(&signature).await?;
    Ok(signature)
}

/// Send `amount` SOL from `keypair` to `destination` in a single system
/// transfer and record it once confirmed. The caller checks the amount
/// against the cached balance.
pub async fn transfer(
    storage: &WalletStorage,
    client: &dyn ClusterClient,
    keypair: &Keypair,
    destination: &str,
    amount: f64,
) -> Option<Signature> {
    let Ok(to_pubkey) = Pubkey::from_str(destination) else {
        warn!("Refusing transfer to malformed address {:?}", destination);
        return None;
    };

    let lamports = sol_to_lamports(amount);
    if lamports == 0 {
        warn!("Refusing transfer of {} SOL", amount);
        return None;
    }

    let signature = match submit_transfer(client, keypair, &to_pubkey, lamports).await {
        Ok(signature) => signature,
        Err(e) => {
            error!("Error sending {} SOL to {}: {}", amount, destination, e);
            return None;
        }
    };
    info!("Sent {} SOL to {}: {}", amount, destination, signature);

    let record = TransactionRecord::send(signature.to_string(), now_millis(), amount, destination.to_string());
    record_transaction(storage, record);
    Some(signature)
}

async fn submit_transfer(
    client: &dyn ClusterClient,
    keypair: &Keypair,
    to_pubkey: &Pubkey,
    lamports: u64,
) -> Result<Signature, ClientError> {
    let from_pubkey = keypair.pubkey();
    let instruction = system_instruction::transfer(&from_pubkey, to_pubkey, lamports);
    let blockhash = client.latest_blockhash().await?;
    let transaction = Transaction::new_signed_with_payer(&[instruction], Some(&from_pubkey), &[keypair], blockhash);

    client.send_and_confirm(&transaction).await
}

// The operation already happened on-chain, so a failed write is logged and
// the signature still goes back to the caller.
fn record_transaction(storage: &WalletStorage, record: TransactionRecord) {
    match storage.prepend_transaction(record) {
        Ok(true) => {}
        Ok(false) => warn!("No stored wallet to record the transaction in"),
        Err(e) => error!("Failed to record transaction: {}", e),
    }
}
