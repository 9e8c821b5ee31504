//! Solana Wallet Implementation
//!
//! Signs marketplace requests with an ed25519 keypair. Uses ed25519-dalek
//! directly rather than solana-sdk, which conflicts with ethers (zeroize).

use ed25519_dalek::{Signer as _, SigningKey};

use super::{SolanaCluster, WalletError};

const KEYPAIR_LEN: usize = 64;

/// True when `private_key` is base58 decoding to exactly 64 bytes
pub fn is_valid_base58_keypair(private_key: &str) -> bool {
    bs58::decode(private_key)
        .into_vec()
        .map(|bytes| bytes.len() == KEYPAIR_LEN)
        .unwrap_or(false)
}

/// Solana wallet for signing messages
#[derive(Clone)]
pub struct SolanaWallet {
    /// Secret half plus verified public half
    signing_key: SigningKey,
    cluster: SolanaCluster,
}

impl SolanaWallet {
    /// Create a new wallet from a keypair (64 bytes: 32 secret + 32 public)
    pub fn from_keypair_bytes(keypair: &[u8]) -> Result<Self, WalletError> {
        let bytes: &[u8; KEYPAIR_LEN] = keypair.try_into().map_err(|_| {
            WalletError::InvalidPrivateKey(format!(
                "Expected {} bytes, got {}",
                KEYPAIR_LEN,
                keypair.len()
            ))
        })?;

        let signing_key = SigningKey::from_keypair_bytes(bytes).map_err(|e| {
            WalletError::InvalidPrivateKey(format!("Public key does not match secret key: {}", e))
        })?;

        Ok(Self {
            signing_key,
            cluster: SolanaCluster::default(),
        })
    }

    /// Create a wallet from a base58 encoded keypair
    pub fn from_base58(private_key: &str) -> Result<Self, WalletError> {
        let bytes = bs58::decode(private_key)
            .into_vec()
            .map_err(|e| WalletError::InvalidPrivateKey(format!("Invalid base58: {}", e)))?;

        Self::from_keypair_bytes(&bytes)
    }

    pub fn with_cluster(mut self, cluster: SolanaCluster) -> Self {
        self.cluster = cluster;
        self
    }

    pub fn cluster(&self) -> SolanaCluster {
        self.cluster
    }

    /// Get the public key as a base58 string
    pub fn pubkey_string(&self) -> String {
        bs58::encode(self.pubkey()).into_string()
    }

    pub fn pubkey(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Sign a message using ed25519
    pub fn sign_bytes(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl std::fmt::Debug for SolanaWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolanaWallet")
            .field("pubkey", &self.pubkey_string())
            .field("cluster", &self.cluster)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::test_keys::{svm_key, svm_keypair_bytes};
    use ed25519_dalek::{Signature, Verifier};

    #[test]
    fn test_pubkey_string() {
        let wallet = SolanaWallet::from_base58(&svm_key()).unwrap();

        assert_eq!(wallet.pubkey().as_slice(), &svm_keypair_bytes()[32..]);
        assert!(!wallet.pubkey_string().is_empty());
        assert_eq!(wallet.cluster(), SolanaCluster::Mainnet);
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        assert!(matches!(
            SolanaWallet::from_keypair_bytes(&[1u8; 32]),
            Err(WalletError::InvalidPrivateKey(msg)) if msg.contains("got 32")
        ));
    }

    #[test]
    fn test_invalid_base58_is_rejected() {
        assert!(!is_valid_base58_keypair("not-base58!"));
        assert!(matches!(
            SolanaWallet::from_base58("not-base58!"),
            Err(WalletError::InvalidPrivateKey(_))
        ));
    }

    #[test]
    fn test_sign_bytes_verifies() {
        let wallet = SolanaWallet::from_base58(&svm_key()).unwrap();
        let message = b"Hello, AiMo!";

        let signature = Signature::from_bytes(&wallet.sign_bytes(message));
        assert!(wallet
            .signing_key
            .verifying_key()
            .verify(message, &signature)
            .is_ok());
    }

    #[test]
    fn test_debug_hides_secret() {
        let wallet = SolanaWallet::from_base58(&svm_key())
            .unwrap()
            .with_cluster(SolanaCluster::Devnet);
        let debug_str = format!("{:?}", wallet);
        assert!(debug_str.contains("Devnet"));
        assert!(!debug_str.contains(&svm_key()));
    }
}
