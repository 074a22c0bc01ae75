// Persisted wallet record and its transaction history.
// Field names on the wire match the record the browser build stored under
// `solanaWallet`, so an exported record can be dropped into the store as is.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Send,
    Receive,
    Airdrop,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionKind::Send => "send",
            TransactionKind::Receive => "receive",
            TransactionKind::Airdrop => "airdrop",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub signature: String,
    /// Client clock, milliseconds since the epoch.
    pub timestamp: i64,
    /// Amount in SOL.
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(rename = "otherParty", default, skip_serializing_if = "Option::is_none")]
    pub counterparty: Option<String>,
}

impl TransactionRecord {
    pub fn airdrop(signature: String, timestamp: i64, amount: f64) -> Self {
        Self {
            signature,
            timestamp,
            amount,
            kind: TransactionKind::Airdrop,
            counterparty: None,
        }
    }

    pub fn send(signature: String, timestamp: i64, amount: f64, destination: String) -> Self {
        Self {
            signature,
            timestamp,
            amount,
            kind: TransactionKind::Send,
            counterparty: Some(destination),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletRecord {
    /// Base58 of the 64 secret key bytes.
    #[serde(rename = "keypair")]
    pub secret_key_encoded: String,
    /// Newest first.
    pub transactions: Vec<TransactionRecord>,
    /// RPC URL the wallet was created against.
    pub network: String,
}

impl WalletRecord {
    pub fn new(secret_key_encoded: String, network: String) -> Self {
        Self {
            secret_key_encoded,
            transactions: Vec::new(),
            network,
        }
    }

    pub fn prepend_transaction(&mut self, transaction: TransactionRecord) {
        self.transactions.insert(0, transaction);
    }
}
