//! Host runtime integration
//!
//! [`AimoPlugin`] is what a host agent runtime registers: a startup hook that
//! checks wallet configuration in the background, plus handlers for each
//! model capability the plugin serves.

pub mod handlers;

use std::fmt;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub use handlers::*;

use crate::config::{ConfigResolver, MapSettings, ModelTier, SettingsSource};
use crate::provider::Usage;
use crate::wallet::{build_signer, WalletError};

pub const PLUGIN_NAME: &str = "aimo";
pub const PLUGIN_DESCRIPTION: &str =
    "Model provider backed by the AiMo network, authenticated with an SVM or EVM wallet";

/// Services the plugin needs from the host agent runtime
pub trait AgentRuntime: SettingsSource {
    /// Called after every successful generation with normalized token counts
    fn emit_model_usage(&self, _event: &ModelUsageEvent) {}
}

impl AgentRuntime for MapSettings {}

/// Model capability kinds registered with the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModelKind {
    TextSmall,
    TextLarge,
    ObjectSmall,
    ObjectLarge,
    ImageDescription,
    Image,
    TextEmbedding,
}

impl ModelKind {
    pub const ALL: [ModelKind; 7] = [
        ModelKind::TextSmall,
        ModelKind::TextLarge,
        ModelKind::ObjectSmall,
        ModelKind::ObjectLarge,
        ModelKind::ImageDescription,
        ModelKind::Image,
        ModelKind::TextEmbedding,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::TextSmall => "TEXT_SMALL",
            ModelKind::TextLarge => "TEXT_LARGE",
            ModelKind::ObjectSmall => "OBJECT_SMALL",
            ModelKind::ObjectLarge => "OBJECT_LARGE",
            ModelKind::ImageDescription => "IMAGE_DESCRIPTION",
            ModelKind::Image => "IMAGE",
            ModelKind::TextEmbedding => "TEXT_EMBEDDING",
        }
    }

    pub fn text(tier: ModelTier) -> Self {
        match tier {
            ModelTier::Small => ModelKind::TextSmall,
            ModelTier::Large => ModelKind::TextLarge,
        }
    }

    pub fn object(tier: ModelTier) -> Self {
        match tier {
            ModelTier::Small => ModelKind::ObjectSmall,
            ModelTier::Large => ModelKind::ObjectLarge,
        }
    }

    /// Tier for the generation kinds; `None` for the placeholder kinds
    pub fn tier(&self) -> Option<ModelTier> {
        match self {
            ModelKind::TextSmall | ModelKind::ObjectSmall => Some(ModelTier::Small),
            ModelKind::TextLarge | ModelKind::ObjectLarge => Some(ModelTier::Large),
            ModelKind::ImageDescription | ModelKind::Image | ModelKind::TextEmbedding => None,
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Usage report handed back to the host runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelUsageEvent {
    pub provider: &'static str,
    pub kind: ModelKind,
    pub model: String,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl ModelUsageEvent {
    pub fn new(kind: ModelKind, model: &str, usage: Usage) -> Self {
        let usage = usage.normalized();
        Self {
            provider: PLUGIN_NAME,
            kind,
            model: model.to_string(),
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        }
    }
}

/// The AiMo model provider plugin
#[derive(Debug, Clone, Copy, Default)]
pub struct AimoPlugin;

impl AimoPlugin {
    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    pub fn description(&self) -> &'static str {
        PLUGIN_DESCRIPTION
    }

    pub fn models(&self) -> &'static [ModelKind] {
        &ModelKind::ALL
    }

    /// Startup hook.
    ///
    /// Settings are read immediately; signer construction runs on a detached
    /// task so startup never waits on it. Failures are logged as warnings and
    /// are also available through the returned handle. Must be called from
    /// within a Tokio runtime.
    pub fn init<R: AgentRuntime + ?Sized>(&self, runtime: &R) -> JoinHandle<Result<(), WalletError>> {
        let config = ConfigResolver::new(runtime).require_signer_config();

        tokio::spawn(async move {
            match config.and_then(|config| build_signer(&config)) {
                Ok(signer) => {
                    info!(
                        wallet_type = %signer.wallet_type(),
                        chain = %signer.chain(),
                        address = %signer.address(),
                        "AiMo wallet configured"
                    );
                    Ok(())
                }
                Err(err) => {
                    warn!(error = %err, "AiMo wallet configuration is invalid; model calls will fail until it is fixed");
                    Err(err)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PRIVATE_KEY_KEY, WALLET_TYPE_KEY};
    use crate::wallet::test_keys::EVM_KEY;
    use serial_test::serial;

    #[test]
    fn test_model_kinds() {
        assert_eq!(AimoPlugin.models().len(), 7);
        assert_eq!(ModelKind::text(ModelTier::Large), ModelKind::TextLarge);
        assert_eq!(ModelKind::object(ModelTier::Small).as_str(), "OBJECT_SMALL");
        assert_eq!(ModelKind::ObjectLarge.tier(), Some(ModelTier::Large));
        assert_eq!(ModelKind::TextEmbedding.tier(), None);
        assert_eq!(
            serde_json::to_value(ModelKind::ImageDescription).unwrap(),
            serde_json::json!("IMAGE_DESCRIPTION")
        );
    }

    #[test]
    fn test_usage_event_normalizes_total() {
        let event = ModelUsageEvent::new(
            ModelKind::TextSmall,
            "m",
            Usage {
                prompt_tokens: 3,
                completion_tokens: 4,
                total_tokens: 0,
            },
        );
        assert_eq!(event.provider, "aimo");
        assert_eq!(event.total_tokens, 7);
    }

    #[tokio::test]
    #[serial]
    async fn test_init_reports_valid_wallet() {
        std::env::remove_var(crate::config::CHAIN_ID_KEY);
        let settings = MapSettings::new()
            .with(WALLET_TYPE_KEY, "evm")
            .with(PRIVATE_KEY_KEY, EVM_KEY);

        let outcome = AimoPlugin.init(&settings).await.unwrap();
        assert!(outcome.is_ok());
    }

    #[tokio::test]
    #[serial]
    async fn test_init_does_not_fail_on_bad_config() {
        std::env::remove_var(WALLET_TYPE_KEY);
        std::env::remove_var(PRIVATE_KEY_KEY);
        let settings = MapSettings::new()
            .with(WALLET_TYPE_KEY, "evm")
            .with(PRIVATE_KEY_KEY, "0xdeadbeef");

        let handle = AimoPlugin.init(&settings);
        let outcome = handle.await.unwrap();
        assert!(matches!(outcome, Err(WalletError::InvalidKeyFormat { .. })));
    }
}
