//! AiMo marketplace client
//!
//! Thin authenticated HTTP client. Each request body is signed by the
//! configured wallet (see [`super::auth`]).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::auth;
use super::types::{api_error_message, ChatRequest, ChatResponse};
use super::ProviderError;
use crate::config::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::wallet::Signer;

pub const CHAT_COMPLETIONS_PATH: &str = "/api/v1/chat/completions";

/// A model that can answer chat completion requests
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Model identifier sent to the marketplace
    fn model_id(&self) -> &str;

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError>;
}

/// Marketplace client bound to one signer
#[derive(Clone)]
pub struct AimoClient {
    http: reqwest::Client,
    base_url: String,
    signer: Arc<Signer>,
}

impl AimoClient {
    pub fn new(signer: Signer, base_url: &str) -> Result<Self, ProviderError> {
        Self::with_timeout(
            signer,
            base_url,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn with_timeout(
        signer: Signer,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ProviderError::Config(format!(
                "Base URL must start with http:// or https://, got: {}",
                base_url
            )));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            signer: Arc::new(signer),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    /// Handle for a specific model
    pub fn chat(&self, model_id: &str) -> ChatModel {
        ChatModel {
            client: self.clone(),
            model_id: model_id.to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sign and POST a JSON body, decoding a JSON response
    async fn post_json<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, ProviderError> {
        let body = serde_json::to_vec(body)?;
        let signed = auth::sign_request(&self.signer, "POST", path, &body).await?;

        let mut request = self
            .http
            .post(self.endpoint(path))
            .header(CONTENT_TYPE, "application/json");
        for (name, value) in signed.pairs() {
            request = request.header(name, value);
        }

        let resp = request.body(body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: api_error_message(&text),
            });
        }

        Ok(resp.json().await?)
    }
}

impl std::fmt::Debug for AimoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AimoClient")
            .field("base_url", &self.base_url)
            .field("signer", &self.signer)
            .finish()
    }
}

/// Chat model served through the marketplace
#[derive(Debug, Clone)]
pub struct ChatModel {
    client: AimoClient,
    model_id: String,
}

#[async_trait]
impl ChatCompletion for ChatModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        let mut request = request.clone();
        request.model = self.model_id.clone();

        debug!(
            model = %self.model_id,
            messages = request.messages.len(),
            structured = request.response_format.is_some(),
            "Sending chat completion"
        );
        self.client.post_json(CHAT_COMPLETIONS_PATH, &request).await
    }
}
