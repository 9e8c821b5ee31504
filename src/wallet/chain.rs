//! Chain identifiers
//!
//! Symbolic network names from configuration ("mainnet", "devnet",
//! "sepolia", "11155111", ...) are mapped to concrete CAIP-2 chain ids.

use std::fmt;

use super::{WalletError, WalletType};

pub const SOLANA_MAINNET_CAIP2: &str = "solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp";
pub const SOLANA_DEVNET_CAIP2: &str = "solana:EtWTRABZaYq6iMfeYKouRu166VU2xqa1";
pub const SOLANA_TESTNET_CAIP2: &str = "solana:4uhcVJyU9pJkvQyS88uRDiswHXSCkY3z";

pub const ETHEREUM_MAINNET_CHAIN_ID: u64 = 1;
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Solana cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SolanaCluster {
    #[default]
    Mainnet,
    Devnet,
    Testnet,
}

impl SolanaCluster {
    /// Case-insensitive substring match; anything unrecognised is mainnet.
    pub fn resolve(chain_id: &str) -> Self {
        let chain_id = chain_id.to_lowercase();
        if chain_id.contains("devnet") {
            SolanaCluster::Devnet
        } else if chain_id.contains("testnet") {
            SolanaCluster::Testnet
        } else {
            SolanaCluster::Mainnet
        }
    }

    pub fn caip2(&self) -> &'static str {
        match self {
            SolanaCluster::Mainnet => SOLANA_MAINNET_CAIP2,
            SolanaCluster::Devnet => SOLANA_DEVNET_CAIP2,
            SolanaCluster::Testnet => SOLANA_TESTNET_CAIP2,
        }
    }
}

/// EVM network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EvmNetwork {
    #[default]
    Mainnet,
    Sepolia,
}

impl EvmNetwork {
    pub fn resolve(chain_id: &str) -> Self {
        let chain_id = chain_id.to_lowercase();
        let sepolia_id = SEPOLIA_CHAIN_ID.to_string();
        if chain_id.contains("sepolia")
            || chain_id == sepolia_id
            || chain_id.strip_prefix("eip155:") == Some(sepolia_id.as_str())
        {
            EvmNetwork::Sepolia
        } else {
            EvmNetwork::Mainnet
        }
    }

    /// Numeric EIP-155 chain id
    pub fn chain_id(&self) -> u64 {
        match self {
            EvmNetwork::Mainnet => ETHEREUM_MAINNET_CHAIN_ID,
            EvmNetwork::Sepolia => SEPOLIA_CHAIN_ID,
        }
    }
}

/// A concrete network within a wallet family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainId {
    Solana(SolanaCluster),
    Evm(EvmNetwork),
}

impl ChainId {
    pub fn wallet_type(&self) -> WalletType {
        match self {
            ChainId::Solana(_) => WalletType::Svm,
            ChainId::Evm(_) => WalletType::Evm,
        }
    }

    /// CAIP-2 representation (`namespace:reference`)
    pub fn caip2(&self) -> String {
        match self {
            ChainId::Solana(cluster) => cluster.caip2().to_string(),
            ChainId::Evm(network) => format!("eip155:{}", network.chain_id()),
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.caip2())
    }
}

/// Resolve a configured chain id string for the given wallet family.
pub fn resolve_chain_id(wallet_type: WalletType, chain_id: &str) -> ChainId {
    match wallet_type {
        WalletType::Svm => ChainId::Solana(SolanaCluster::resolve(chain_id)),
        WalletType::Evm => ChainId::Evm(EvmNetwork::resolve(chain_id)),
    }
}

/// Like [`resolve_chain_id`], for a wallet type that has not been parsed yet.
pub fn resolve_chain_id_str(wallet_type: &str, chain_id: &str) -> Result<ChainId, WalletError> {
    let wallet_type: WalletType = wallet_type.parse()?;
    Ok(resolve_chain_id(wallet_type, chain_id))
}
