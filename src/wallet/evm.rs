//! EVM Wallet Implementation
//!
//! Signs marketplace requests with a secp256k1 key using ethers-rs.

use ethers_core::types::{Address, Signature};
use ethers_core::utils::to_checksum;
use ethers_signers::{LocalWallet, Signer};

use super::{EvmNetwork, WalletError};

/// `0x` followed by exactly 64 hex digits
pub fn is_valid_hex_key(private_key: &str) -> bool {
    private_key
        .strip_prefix("0x")
        .is_some_and(|digits| digits.len() == 64 && digits.bytes().all(|b| b.is_ascii_hexdigit()))
}

/// EVM wallet for signing messages
#[derive(Clone)]
pub struct EvmWallet {
    wallet: LocalWallet,
    network: EvmNetwork,
}

impl EvmWallet {
    /// Create a new wallet from a private key (hex string, with or without 0x prefix)
    pub fn from_private_key(private_key: &str, network: EvmNetwork) -> Result<Self, WalletError> {
        let key = private_key.strip_prefix("0x").unwrap_or(private_key);

        let wallet: LocalWallet = key
            .parse()
            .map_err(|e| WalletError::InvalidPrivateKey(format!("{}", e)))?;

        Ok(Self {
            wallet: wallet.with_chain_id(network.chain_id()),
            network,
        })
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// EIP-55 checksummed address
    pub fn address_string(&self) -> String {
        to_checksum(&self.wallet.address(), None)
    }

    pub fn network(&self) -> EvmNetwork {
        self.network
    }

    pub fn chain_id(&self) -> u64 {
        self.wallet.chain_id()
    }

    /// Sign a message (personal_sign / EIP-191 format)
    pub async fn sign_message(&self, message: &[u8]) -> Result<Signature, WalletError> {
        self.wallet
            .sign_message(message)
            .await
            .map_err(|e| WalletError::SigningFailed(format!("{}", e)))
    }
}

impl std::fmt::Debug for EvmWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmWallet")
            .field("address", &self.address_string())
            .field("chain_id", &self.chain_id())
            .finish()
    }
}
