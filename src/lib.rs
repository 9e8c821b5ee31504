//! aimo-plugin - AiMo network model provider
//!
//! Adapts a host agent runtime's model interface to the AiMo inference
//! marketplace. Requests are authenticated by an SVM (Solana) or EVM
//! (Ethereum) wallet configured through runtime settings or the environment.
//!
//! ```rust,no_run
//! use aimo_plugin::{generate_text, GenerateTextParams, MapSettings, ModelTier};
//!
//! # async fn run() -> Result<(), aimo_plugin::ProviderError> {
//! let settings = MapSettings::new()
//!     .with("AIMO_WALLET_TYPE", "evm")
//!     .with("AIMO_PRIVATE_KEY", "0x...");
//! let text = generate_text(&settings, ModelTier::Small, &GenerateTextParams::new("Hello")).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod plugin;
pub mod provider;
pub mod wallet;

pub use config::{ConfigResolver, MapSettings, ModelTier, SettingValue, SettingsSource};
pub use plugin::{
    generate_object, generate_text, handle, AgentRuntime, AimoPlugin, GenerateObjectParams,
    GenerateTextParams, ModelKind, ModelOutput, ModelRequest, ModelUsageEvent,
};
pub use provider::{AimoClient, ChatCompletion, ProviderError};
pub use wallet::{
    build_signer, resolve_chain_id, validate_key_format, ChainId, Signer, SignerConfig,
    WalletError, WalletType,
};
