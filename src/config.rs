// Configuration for the wallet:
// - Solana cluster selection (the only functional setting)
// - Local storage directory
// - Screen server listening address/port
// - RPC timeout and commitment level

use dotenv::dotenv;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const MAINNET_URL: &str = "https://api.mainnet-beta.solana.com";
pub const TESTNET_URL: &str = "https://api.testnet.solana.com";
pub const DEVNET_URL: &str = "https://api.devnet.solana.com";

/// One of the three public Solana clusters the wallet can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network {
    Mainnet,
    Testnet,
    /// Airdrops only work here, so it is the default.
    #[default]
    Devnet,
}

impl Network {
    pub fn rpc_url(&self) -> &'static str {
        match self {
            Network::Mainnet => MAINNET_URL,
            Network::Testnet => TESTNET_URL,
            Network::Devnet => DEVNET_URL,
        }
    }

    /// Cluster name as used by the explorer's `cluster` query parameter.
    pub fn cluster(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet-beta",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Network::Mainnet => "Mainnet",
            Network::Testnet => "Testnet",
            Network::Devnet => "Devnet",
        }
    }

    pub fn explorer_tx_url(&self, signature: &str) -> String {
        match self {
            Network::Mainnet => format!("https://explorer.solana.com/tx/{}", signature),
            _ => format!(
                "https://explorer.solana.com/tx/{}?cluster={}",
                signature,
                self.cluster()
            ),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rpc_url())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown Solana network: {0}")]
pub struct UnknownNetwork(pub String);

impl FromStr for Network {
    type Err = UnknownNetwork;

    /// Accepts a cluster name or one of the three RPC URLs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" | "mainnet-beta" | MAINNET_URL => Ok(Network::Mainnet),
            "testnet" | TESTNET_URL => Ok(Network::Testnet),
            "devnet" | DEVNET_URL => Ok(Network::Devnet),
            _ => Err(UnknownNetwork(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub network: Network,
    pub storage_dir: PathBuf,
    pub server_host: String,
    pub server_port: u16,
    pub rpc_timeout: Duration,
    pub solana_commitment_level: String,
    pub airdrop_amount_sol: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: Network::default(),
            storage_dir: PathBuf::from(".burner-wallet"),
            server_host: "127.0.0.1".to_string(),
            server_port: 3000,
            rpc_timeout: Duration::from_secs(30),
            solana_commitment_level: "confirmed".to_string(),
            airdrop_amount_sol: 1.0,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();
        let defaults = Self::default();

        let network = env::var("SOLANA_NETWORK")
            .ok()
            .and_then(|v| match v.parse() {
                Ok(network) => Some(network),
                Err(e) => {
                    tracing::warn!("{}, falling back to {}", e, defaults.network.label());
                    None
                }
            })
            .unwrap_or(defaults.network);
        let storage_dir = env::var("WALLET_STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage_dir);
        let server_host = env::var("SERVER_HOST").unwrap_or(defaults.server_host);
        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.server_port);
        let rpc_timeout = env::var("RPC_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.rpc_timeout);
        let solana_commitment_level = env::var("SOLANA_COMMITMENT_LEVEL")
            .unwrap_or(defaults.solana_commitment_level);
        let airdrop_amount_sol = env::var("AIRDROP_AMOUNT_SOL")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| *v > 0.0)
            .unwrap_or(defaults.airdrop_amount_sol);

        Self {
            network,
            storage_dir,
            server_host,
            server_port,
            rpc_timeout,
            solana_commitment_level,
            airdrop_amount_sol,
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
