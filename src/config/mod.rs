//! Layered configuration
//!
//! Settings are looked up in the host runtime first, then in the process
//! environment, then fall back to built-in defaults. All values come back as
//! strings; typed getters parse them.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::wallet::{SignerConfig, WalletError, WalletType};

pub const WALLET_TYPE_KEY: &str = "AIMO_WALLET_TYPE";
pub const PRIVATE_KEY_KEY: &str = "AIMO_PRIVATE_KEY";
pub const CHAIN_ID_KEY: &str = "AIMO_CHAIN_ID";
pub const BASE_URL_KEY: &str = "AIMO_BASE_URL";
pub const SMALL_MODEL_KEY: &str = "AIMO_SMALL_MODEL";
pub const LARGE_MODEL_KEY: &str = "AIMO_LARGE_MODEL";
pub const GENERIC_SMALL_MODEL_KEY: &str = "SMALL_MODEL";
pub const GENERIC_LARGE_MODEL_KEY: &str = "LARGE_MODEL";
pub const REQUEST_TIMEOUT_KEY: &str = "AIMO_REQUEST_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "https://beta.aimo.network";
pub const DEFAULT_SMALL_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_LARGE_MODEL: &str = "openai/gpt-4o";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Raw value as returned by the host runtime's settings store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Null,
}

impl SettingValue {
    /// String form of the value; `Null` counts as unset.
    pub fn into_string(self) -> Option<String> {
        match self {
            SettingValue::Bool(b) => Some(b.to_string()),
            SettingValue::Number(n) => Some(n.to_string()),
            SettingValue::String(s) => Some(s),
            SettingValue::Null => None,
        }
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::String(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::String(value)
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Number(value.into())
    }
}

impl From<u64> for SettingValue {
    fn from(value: u64) -> Self {
        SettingValue::Number(value.into())
    }
}

/// Anything that can answer `getSetting(key)`
pub trait SettingsSource: Send + Sync {
    fn get_setting(&self, key: &str) -> Option<SettingValue>;
}

/// In-memory settings store
#[derive(Debug, Clone, Default)]
pub struct MapSettings {
    values: HashMap<String, SettingValue>,
}

impl MapSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<SettingValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn with(mut self, key: &str, value: impl Into<SettingValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Parse a `KEY=VALUE` assignment into the store
    pub fn set_assignment(&mut self, assignment: &str) -> Result<(), String> {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| format!("Expected KEY=VALUE, got: {}", assignment))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("Empty key in assignment: {}", assignment));
        }
        self.set(key, value);
        Ok(())
    }
}

impl SettingsSource for MapSettings {
    fn get_setting(&self, key: &str) -> Option<SettingValue> {
        self.values.get(key).cloned()
    }
}

/// Model size tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelTier {
    Small,
    Large,
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelTier::Small => write!(f, "small"),
            ModelTier::Large => write!(f, "large"),
        }
    }
}

impl FromStr for ModelTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" => Ok(ModelTier::Small),
            "large" => Ok(ModelTier::Large),
            _ => Err(format!("Unknown model tier: {}", s)),
        }
    }
}

/// Typed view over a [`SettingsSource`] plus the process environment
pub struct ConfigResolver<'a, S: SettingsSource + ?Sized> {
    settings: &'a S,
}

impl<'a, S: SettingsSource + ?Sized> ConfigResolver<'a, S> {
    pub fn new(settings: &'a S) -> Self {
        Self { settings }
    }

    /// Runtime setting, then environment variable of the same name, then `default`.
    pub fn resolve_setting(&self, key: &str, default: Option<&str>) -> Option<String> {
        if let Some(value) = self
            .settings
            .get_setting(key)
            .and_then(SettingValue::into_string)
        {
            return Some(value);
        }
        if let Ok(value) = std::env::var(key) {
            return Some(value);
        }
        default.map(str::to_string)
    }

    /// `None` unless the setting is exactly `svm` or `evm`
    pub fn wallet_type(&self) -> Option<WalletType> {
        self.resolve_setting(WALLET_TYPE_KEY, None)?.parse().ok()
    }

    /// An empty key counts as unset
    pub fn private_key(&self) -> Option<String> {
        self.resolve_setting(PRIVATE_KEY_KEY, None)
            .filter(|key| !key.is_empty())
    }

    pub fn chain_id(&self) -> Option<String> {
        self.resolve_setting(CHAIN_ID_KEY, None)
    }

    /// Whatever wallet settings are present, without requiring any of them.
    fn partial_signer_config(&self) -> SignerConfig {
        SignerConfig {
            wallet_type: self.wallet_type(),
            private_key: self.private_key(),
            chain_id: self.chain_id(),
        }
    }

    /// Signer inputs, or `None` if wallet type or private key is missing.
    /// Key format is not checked here.
    pub fn signer_config(&self) -> Option<SignerConfig> {
        let config = self.partial_signer_config();
        if config.wallet_type.is_some() && config.private_key.is_some() {
            Some(config)
        } else {
            None
        }
    }

    /// Like [`signer_config`](Self::signer_config), but names the missing field.
    pub fn require_signer_config(&self) -> Result<SignerConfig, WalletError> {
        self.signer_config().ok_or_else(|| {
            if self.wallet_type().is_none() {
                WalletError::MissingWalletType
            } else {
                WalletError::MissingPrivateKey
            }
        })
    }

    pub fn model_name(&self, tier: ModelTier) -> String {
        let (specific, generic, default) = match tier {
            ModelTier::Small => (SMALL_MODEL_KEY, GENERIC_SMALL_MODEL_KEY, DEFAULT_SMALL_MODEL),
            ModelTier::Large => (LARGE_MODEL_KEY, GENERIC_LARGE_MODEL_KEY, DEFAULT_LARGE_MODEL),
        };
        self.resolve_setting(specific, None)
            .or_else(|| self.resolve_setting(generic, None))
            .unwrap_or_else(|| default.to_string())
    }

    pub fn base_url(&self) -> String {
        self.resolve_setting(BASE_URL_KEY, Some(DEFAULT_BASE_URL))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn request_timeout(&self) -> Duration {
        let secs = match self.resolve_setting(REQUEST_TIMEOUT_KEY, None) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(value = %raw, "Ignoring invalid {}", REQUEST_TIMEOUT_KEY);
                DEFAULT_REQUEST_TIMEOUT_SECS
            }),
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };
        Duration::from_secs(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ALL_KEYS: &[&str] = &[
        WALLET_TYPE_KEY,
        PRIVATE_KEY_KEY,
        CHAIN_ID_KEY,
        BASE_URL_KEY,
        SMALL_MODEL_KEY,
        LARGE_MODEL_KEY,
        GENERIC_SMALL_MODEL_KEY,
        GENERIC_LARGE_MODEL_KEY,
        REQUEST_TIMEOUT_KEY,
    ];

    fn clear_env() {
        for key in ALL_KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_runtime_setting_wins_over_env() {
        clear_env();
        std::env::set_var(CHAIN_ID_KEY, "devnet");
        let settings = MapSettings::new().with(CHAIN_ID_KEY, "mainnet");
        let resolver = ConfigResolver::new(&settings);

        assert_eq!(resolver.chain_id().as_deref(), Some("mainnet"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_then_default() {
        clear_env();
        let settings = MapSettings::new().with(CHAIN_ID_KEY, SettingValue::Null);
        let resolver = ConfigResolver::new(&settings);

        assert_eq!(
            resolver.resolve_setting(CHAIN_ID_KEY, Some("fallback")).as_deref(),
            Some("fallback")
        );
        assert_eq!(resolver.resolve_setting(CHAIN_ID_KEY, None), None);

        std::env::set_var(CHAIN_ID_KEY, "sepolia");
        assert_eq!(
            resolver.resolve_setting(CHAIN_ID_KEY, Some("fallback")).as_deref(),
            Some("sepolia")
        );
        clear_env();
    }

    #[test]
    #[serial]
    fn test_non_string_values_are_stringified() {
        clear_env();
        let settings = MapSettings::new()
            .with(CHAIN_ID_KEY, 11_155_111u64)
            .with(REQUEST_TIMEOUT_KEY, 5i64)
            .with("FLAG", true);
        let resolver = ConfigResolver::new(&settings);

        assert_eq!(resolver.chain_id().as_deref(), Some("11155111"));
        assert_eq!(resolver.request_timeout(), Duration::from_secs(5));
        assert_eq!(resolver.resolve_setting("FLAG", None).as_deref(), Some("true"));
    }

    #[test]
    #[serial]
    fn test_wallet_type_requires_exact_literal() {
        clear_env();
        for (raw, expected) in [
            ("svm", Some(WalletType::Svm)),
            ("evm", Some(WalletType::Evm)),
            ("EVM", None),
            ("", None),
            ("solana", None),
        ] {
            let settings = MapSettings::new().with(WALLET_TYPE_KEY, raw);
            assert_eq!(ConfigResolver::new(&settings).wallet_type(), expected, "raw {raw:?}");
        }
        assert_eq!(ConfigResolver::new(&MapSettings::new()).wallet_type(), None);
    }

    #[test]
    #[serial]
    fn test_signer_config_requires_type_and_key() {
        clear_env();
        let only_type = MapSettings::new().with(WALLET_TYPE_KEY, "evm");
        assert!(ConfigResolver::new(&only_type).signer_config().is_none());

        let only_key = MapSettings::new().with(PRIVATE_KEY_KEY, "0xabc");
        assert!(ConfigResolver::new(&only_key).signer_config().is_none());

        let empty_key = MapSettings::new()
            .with(WALLET_TYPE_KEY, "evm")
            .with(PRIVATE_KEY_KEY, "");
        let resolver = ConfigResolver::new(&empty_key);
        assert!(resolver.private_key().is_none());
        assert!(resolver.signer_config().is_none());
        assert_eq!(
            resolver.require_signer_config(),
            Err(WalletError::MissingPrivateKey)
        );
        assert_eq!(
            ConfigResolver::new(&only_key).require_signer_config(),
            Err(WalletError::MissingWalletType)
        );

        // No format validation at this stage
        let settings = MapSettings::new()
            .with(WALLET_TYPE_KEY, "evm")
            .with(PRIVATE_KEY_KEY, "0xabc")
            .with(CHAIN_ID_KEY, "sepolia");
        let config = ConfigResolver::new(&settings).signer_config().unwrap();
        assert_eq!(config.wallet_type, Some(WalletType::Evm));
        assert_eq!(config.private_key.as_deref(), Some("0xabc"));
        assert_eq!(config.chain_id.as_deref(), Some("sepolia"));
    }

    #[test]
    #[serial]
    fn test_signer_config_is_idempotent() {
        clear_env();
        let settings = MapSettings::new()
            .with(WALLET_TYPE_KEY, "svm")
            .with(PRIVATE_KEY_KEY, "key");
        let resolver = ConfigResolver::new(&settings);

        assert_eq!(resolver.signer_config(), resolver.signer_config());
    }

    #[test]
    #[serial]
    fn test_model_name_fallback_chain() {
        clear_env();
        let resolver_defaults = MapSettings::new();
        let resolver = ConfigResolver::new(&resolver_defaults);
        assert_eq!(resolver.model_name(ModelTier::Small), DEFAULT_SMALL_MODEL);
        assert_eq!(resolver.model_name(ModelTier::Large), DEFAULT_LARGE_MODEL);

        let generic = MapSettings::new().with(GENERIC_LARGE_MODEL_KEY, "generic/large");
        assert_eq!(
            ConfigResolver::new(&generic).model_name(ModelTier::Large),
            "generic/large"
        );

        let specific = generic.with(LARGE_MODEL_KEY, "aimo/large");
        assert_eq!(
            ConfigResolver::new(&specific).model_name(ModelTier::Large),
            "aimo/large"
        );
        assert_eq!(
            ConfigResolver::new(&specific).model_name(ModelTier::Small),
            DEFAULT_SMALL_MODEL
        );
    }

    #[test]
    #[serial]
    fn test_base_url_and_timeout_defaults() {
        clear_env();
        let settings = MapSettings::new();
        let resolver = ConfigResolver::new(&settings);
        assert_eq!(resolver.base_url(), DEFAULT_BASE_URL);
        assert_eq!(
            resolver.request_timeout(),
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );

        let settings = MapSettings::new()
            .with(BASE_URL_KEY, "http://localhost:8080/")
            .with(REQUEST_TIMEOUT_KEY, "soon");
        let resolver = ConfigResolver::new(&settings);
        assert_eq!(resolver.base_url(), "http://localhost:8080");
        assert_eq!(
            resolver.request_timeout(),
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_set_assignment() {
        let mut settings = MapSettings::new();
        settings.set_assignment("AIMO_CHAIN_ID=devnet").unwrap();
        settings.set_assignment("EMPTY=").unwrap();
        assert!(settings.set_assignment("novalue").is_err());
        assert!(settings.set_assignment("=x").is_err());

        assert_eq!(
            settings.get_setting(CHAIN_ID_KEY),
            Some(SettingValue::String("devnet".to_string()))
        );
        assert_eq!(
            settings.get_setting("EMPTY"),
            Some(SettingValue::String(String::new()))
        );
    }

    #[test]
    fn test_setting_value_deserializes_from_json() {
        let values: Vec<SettingValue> = serde_json::from_str(r#"["a", 1, false, null]"#).unwrap();
        assert_eq!(
            values.into_iter().map(SettingValue::into_string).collect::<Vec<_>>(),
            vec![
                Some("a".to_string()),
                Some("1".to_string()),
                Some("false".to_string()),
                None
            ]
        );
    }

    #[test]
    fn test_model_tier_from_str() {
        assert_eq!("Small".parse::<ModelTier>().unwrap(), ModelTier::Small);
        assert_eq!("large".parse::<ModelTier>().unwrap(), ModelTier::Large);
        assert!("medium".parse::<ModelTier>().is_err());
    }
}
