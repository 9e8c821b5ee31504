//! Wallet implementations for request signing
//!
//! This module validates wallet private keys for the two supported families
//! (SVM and EVM), resolves chain identifiers and builds the [`Signer`] used to
//! authenticate requests to the AiMo marketplace.

pub mod chain;
pub mod evm;
pub mod solana;

use std::fmt;
use std::str::FromStr;

use tracing::debug;

pub use chain::{resolve_chain_id, resolve_chain_id_str, ChainId, EvmNetwork, SolanaCluster};
pub use evm::EvmWallet;
pub use solana::SolanaWallet;

/// Common wallet error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    #[error("Missing wallet type: set AIMO_WALLET_TYPE to \"svm\" or \"evm\"")]
    MissingWalletType,

    #[error("Missing private key: set AIMO_PRIVATE_KEY")]
    MissingPrivateKey,

    #[error("Invalid private key format for {wallet_type} wallet: expected {expected}")]
    InvalidKeyFormat {
        wallet_type: WalletType,
        expected: &'static str,
    },

    #[error("Unknown wallet type: {0:?} (expected \"svm\" or \"evm\")")]
    UnknownWalletType(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),
}

/// Blockchain family a wallet belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalletType {
    /// Solana-style wallet (base58 encoded 64-byte keypair)
    Svm,
    /// Ethereum-style wallet (0x-prefixed hex secp256k1 key)
    Evm,
}

impl WalletType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletType::Svm => "svm",
            WalletType::Evm => "evm",
        }
    }

    /// Human readable description of the key encoding this family expects
    pub fn expected_key_format(&self) -> &'static str {
        match self {
            WalletType::Svm => "a base58 string decoding to a 64-byte keypair",
            WalletType::Evm => "0x followed by 64 hexadecimal characters",
        }
    }

    /// Chain used when no chain id is configured
    pub fn default_chain(&self) -> ChainId {
        match self {
            WalletType::Svm => ChainId::Solana(SolanaCluster::default()),
            WalletType::Evm => ChainId::Evm(EvmNetwork::default()),
        }
    }
}

impl fmt::Display for WalletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WalletType {
    type Err = WalletError;

    /// Only the exact literals `svm` and `evm` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "svm" => Ok(WalletType::Svm),
            "evm" => Ok(WalletType::Evm),
            other => Err(WalletError::UnknownWalletType(other.to_string())),
        }
    }
}

/// Minimal inputs needed to construct a [`Signer`]
///
/// Fields are optional so that an incomplete configuration can still be
/// handed to [`build_signer`], which reports exactly what is missing.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SignerConfig {
    pub wallet_type: Option<WalletType>,
    pub private_key: Option<String>,
    /// Free-form network name or numeric chain id
    pub chain_id: Option<String>,
}

impl SignerConfig {
    pub fn new(wallet_type: WalletType, private_key: impl Into<String>) -> Self {
        Self {
            wallet_type: Some(wallet_type),
            private_key: Some(private_key.into()),
            chain_id: None,
        }
    }

    pub fn with_chain_id(mut self, chain_id: impl Into<String>) -> Self {
        self.chain_id = Some(chain_id.into());
        self
    }
}

impl fmt::Debug for SignerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignerConfig")
            .field("wallet_type", &self.wallet_type)
            .field("private_key", &self.private_key.as_ref().map(|_| "[REDACTED]"))
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

/// Credential that authenticates marketplace requests on behalf of a wallet
#[derive(Debug, Clone)]
pub enum Signer {
    Svm(SolanaWallet),
    Evm(EvmWallet),
}

impl Signer {
    pub fn wallet_type(&self) -> WalletType {
        match self {
            Signer::Svm(_) => WalletType::Svm,
            Signer::Evm(_) => WalletType::Evm,
        }
    }

    /// Wallet address in the family's native text form
    pub fn address(&self) -> String {
        match self {
            Signer::Svm(wallet) => wallet.pubkey_string(),
            Signer::Evm(wallet) => wallet.address_string(),
        }
    }

    pub fn chain(&self) -> ChainId {
        match self {
            Signer::Svm(wallet) => ChainId::Solana(wallet.cluster()),
            Signer::Evm(wallet) => ChainId::Evm(wallet.network()),
        }
    }

    /// Sign a payload, returning the signature encoded the way the family's
    /// tooling expects it (base58 for SVM, 0x-hex for EVM).
    pub async fn sign(&self, payload: &[u8]) -> Result<String, WalletError> {
        match self {
            Signer::Svm(wallet) => Ok(bs58::encode(wallet.sign_bytes(payload)).into_string()),
            Signer::Evm(wallet) => {
                let signature = wallet.sign_message(payload).await?;
                Ok(format!("0x{}", hex::encode(signature.to_vec())))
            }
        }
    }
}

/// Check that a private key is well formed for its wallet family.
///
/// Never fails: decode errors are reported as `false`.
pub fn validate_key_format(wallet_type: WalletType, private_key: &str) -> bool {
    match wallet_type {
        WalletType::Svm => solana::is_valid_base58_keypair(private_key),
        WalletType::Evm => evm::is_valid_hex_key(private_key),
    }
}

/// String-typed variant of [`validate_key_format`]; unknown wallet types are invalid.
pub fn key_format_matches(wallet_type: &str, private_key: &str) -> bool {
    wallet_type
        .parse::<WalletType>()
        .map(|wallet_type| validate_key_format(wallet_type, private_key))
        .unwrap_or(false)
}

/// Validate a [`SignerConfig`] and construct the matching [`Signer`].
pub fn build_signer(config: &SignerConfig) -> Result<Signer, WalletError> {
    let wallet_type = config.wallet_type.ok_or(WalletError::MissingWalletType)?;
    let private_key = config
        .private_key
        .as_deref()
        .filter(|key| !key.is_empty())
        .ok_or(WalletError::MissingPrivateKey)?;

    if !validate_key_format(wallet_type, private_key) {
        return Err(WalletError::InvalidKeyFormat {
            wallet_type,
            expected: wallet_type.expected_key_format(),
        });
    }

    let chain = config
        .chain_id
        .as_deref()
        .map(|chain_id| resolve_chain_id(wallet_type, chain_id))
        .unwrap_or_else(|| wallet_type.default_chain());

    let signer = match chain {
        ChainId::Solana(cluster) => {
            Signer::Svm(SolanaWallet::from_base58(private_key)?.with_cluster(cluster))
        }
        ChainId::Evm(network) => Signer::Evm(EvmWallet::from_private_key(private_key, network)?),
    };

    debug!(
        wallet_type = %wallet_type,
        chain = %chain,
        address = %signer.address(),
        "Signer constructed"
    );
    Ok(signer)
}

#[cfg(test)]
pub(crate) mod test_keys {
    use ed25519_dalek::SigningKey;

    /// Well-known development key (DO NOT USE IN PRODUCTION)
    pub const EVM_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    pub const EVM_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    pub fn svm_keypair_bytes() -> [u8; 64] {
        SigningKey::from_bytes(&[7u8; 32]).to_keypair_bytes()
    }

    pub fn svm_key() -> String {
        bs58::encode(svm_keypair_bytes()).into_string()
    }
}
