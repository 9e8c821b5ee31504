//! Request Authentication
//!
//! Every marketplace request is signed by the configured wallet. The signed
//! payload binds the method, path, timestamp and a digest of the body:
//!
//! ```text
//! POST
//! /api/v1/chat/completions
//! 1718000000000
//! <hex sha256 of body>
//! ```

use sha2::{Digest, Sha256};

use crate::wallet::{Signer, WalletError};

pub const HEADER_ADDRESS: &str = "X-Aimo-Address";
pub const HEADER_CHAIN: &str = "X-Aimo-Chain";
pub const HEADER_TIMESTAMP: &str = "X-Aimo-Timestamp";
pub const HEADER_SIGNATURE: &str = "X-Aimo-Signature";

/// Authentication headers for a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub address: String,
    /// CAIP-2 chain id
    pub chain: String,
    pub timestamp_ms: i64,
    pub signature: String,
}

impl SignedHeaders {
    /// Header name/value pairs ready to attach to a request
    pub fn pairs(&self) -> [(&'static str, String); 4] {
        [
            (HEADER_ADDRESS, self.address.clone()),
            (HEADER_CHAIN, self.chain.clone()),
            (HEADER_TIMESTAMP, self.timestamp_ms.to_string()),
            (HEADER_SIGNATURE, self.signature.clone()),
        ]
    }
}

/// Current time in milliseconds
pub fn timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Hex-encoded SHA-256 of the request body
pub fn body_digest(body: &[u8]) -> String {
    hex::encode(Sha256::digest(body))
}

pub fn canonical_payload(method: &str, path: &str, timestamp_ms: i64, body: &[u8]) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        method.to_uppercase(),
        path,
        timestamp_ms,
        body_digest(body)
    )
}

/// Sign a request at the current time
pub async fn sign_request(
    signer: &Signer,
    method: &str,
    path: &str,
    body: &[u8],
) -> Result<SignedHeaders, WalletError> {
    sign_request_at(signer, method, path, body, timestamp_ms()).await
}

pub async fn sign_request_at(
    signer: &Signer,
    method: &str,
    path: &str,
    body: &[u8],
    timestamp_ms: i64,
) -> Result<SignedHeaders, WalletError> {
    let payload = canonical_payload(method, path, timestamp_ms, body);
    let signature = signer.sign(payload.as_bytes()).await?;

    Ok(SignedHeaders {
        address: signer.address(),
        chain: signer.chain().caip2(),
        timestamp_ms,
        signature,
    })
}
