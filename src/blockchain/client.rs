use crate::config::Config;
use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("RPC error: {0}")]
    RpcError(#[from] solana_client::client_error::ClientError),

    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
}

/// The remote calls the wallet makes against a Solana cluster.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// RPC URL of the cluster.
    fn endpoint(&self) -> &str;

    /// Balance in lamports.
    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, ClientError>;

    async fn request_airdrop(&self, pubkey: &Pubkey, lamports: u64) -> Result<Signature, ClientError>;

    /// Wait until `signature` reaches the client's commitment level.
    async fn confirm_signature(&self, signature: &Signature) -> Result<(), ClientError>;

    async fn latest_blockhash(&self) -> Result<Hash, ClientError>;

    /// Submit a signed transaction and wait for confirmation.
    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, ClientError>;
}

pub struct SolanaClient {
    endpoint: String,
    rpc_client: RpcClient,
    commitment: CommitmentConfig,
}

pub fn parse_commitment(level: &str) -> CommitmentConfig {
    match level {
        "processed" => CommitmentConfig::processed(),
        "confirmed" => CommitmentConfig::confirmed(),
        "finalized" => CommitmentConfig::finalized(),
        _ => CommitmentConfig::confirmed(),
    }
}

impl SolanaClient {
    pub fn new(config: &Config) -> Self {
        Self::with_endpoint(
            config.network.rpc_url().to_string(),
            config.rpc_timeout,
            parse_commitment(&config.solana_commitment_level),
        )
    }

    pub fn with_endpoint(rpc_url: String, timeout: Duration, commitment: CommitmentConfig) -> Self {
        info!("Initializing Solana client with RPC endpoint: {}, commitment: {:?}", rpc_url, commitment);

        let rpc_client = RpcClient::new_with_timeout_and_commitment(rpc_url.clone(), timeout, commitment);

        Self {
            endpoint: rpc_url,
            rpc_client,
            commitment,
        }
    }
}

#[async_trait]
impl ClusterClient for SolanaClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, ClientError> {
        let lamports = self.rpc_client.get_balance(pubkey).await?;
        debug!("Balance of {}: {} lamports", pubkey, lamports);
        Ok(lamports)
    }

    async fn request_airdrop(&self, pubkey: &Pubkey, lamports: u64) -> Result<Signature, ClientError> {
        let signature = self.rpc_client.request_airdrop(pubkey, lamports).await?;
        debug!("Airdrop of {} lamports to {} submitted: {}", lamports, pubkey, signature);
        Ok(signature)
    }

    async fn confirm_signature(&self, signature: &Signature) -> Result<(), ClientError> {
        self.rpc_client
            .poll_for_signature_with_commitment(signature, self.commitment)
            .await?;
        Ok(())
    }

    async fn latest_blockhash(&self) -> Result<Hash, ClientError> {
        Ok(self.rpc_client.get_latest_blockhash().await?)
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, ClientError> {
        let signature = self.rpc_client.send_and_confirm_transaction(transaction).await?;
        Ok(signature)
    }
}
