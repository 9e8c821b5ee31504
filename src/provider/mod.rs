//! AiMo marketplace provider
//!
//! Builds wallet-authenticated clients for the marketplace and exposes its
//! chat completion API through the [`ChatCompletion`] trait.

pub mod auth;
pub mod client;
pub mod error;
pub mod types;

pub use client::{AimoClient, ChatCompletion, ChatModel, CHAT_COMPLETIONS_PATH};
pub use error::ProviderError;
pub use types::*;

use crate::config::{ConfigResolver, SettingsSource};
use crate::wallet::build_signer;

/// Resolve wallet settings, build a signer and wrap it in a client.
///
/// Runs on every model call; nothing is cached between calls.
pub fn create_client<S: SettingsSource + ?Sized>(
    resolver: &ConfigResolver<'_, S>,
) -> Result<AimoClient, ProviderError> {
    let signer = build_signer(&resolver.require_signer_config()?)?;
    AimoClient::with_timeout(signer, &resolver.base_url(), resolver.request_timeout())
}
