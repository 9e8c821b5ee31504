//! Model handlers
//!
//! Text and object generation re-resolve configuration and rebuild the signer
//! on every call before delegating to the marketplace. Embeddings and images
//! are not offered by the marketplace yet and return placeholders.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{AgentRuntime, ModelKind, ModelUsageEvent};
use crate::config::{ConfigResolver, ModelTier};
use crate::provider::{
    create_client, ChatCompletion, ChatMessage, ChatRequest, JsonSchemaFormat, ProviderError,
    ResponseFormat, Usage,
};

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 8192;
pub const DEFAULT_FREQUENCY_PENALTY: f32 = 0.7;
pub const DEFAULT_PRESENCE_PENALTY: f32 = 0.7;
pub const EMBEDDING_DIMENSIONS: usize = 1536;

/// Parameters for text generation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateTextParams {
    pub prompt: String,
    pub system: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub frequency_penalty: Option<f32>,
    pub presence_penalty: Option<f32>,
    pub stop: Vec<String>,
}

impl GenerateTextParams {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    fn to_request(&self, model_id: &str) -> ChatRequest {
        ChatRequest {
            model: model_id.to_string(),
            messages: messages(self.system.as_deref(), &self.prompt),
            temperature: Some(self.temperature.unwrap_or(DEFAULT_TEMPERATURE)),
            max_tokens: Some(self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)),
            frequency_penalty: Some(self.frequency_penalty.unwrap_or(DEFAULT_FREQUENCY_PENALTY)),
            presence_penalty: Some(self.presence_penalty.unwrap_or(DEFAULT_PRESENCE_PENALTY)),
            stop: self.stop.clone(),
            response_format: None,
        }
    }
}

/// Parameters for structured (JSON) generation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateObjectParams {
    pub prompt: String,
    pub system: Option<String>,
    /// JSON schema the output must follow; free-form JSON when absent
    pub schema: Option<Value>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl GenerateObjectParams {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    fn to_request(&self, model_id: &str) -> ChatRequest {
        let response_format = match &self.schema {
            Some(schema) => ResponseFormat::JsonSchema {
                json_schema: JsonSchemaFormat {
                    name: "object".to_string(),
                    schema: schema.clone(),
                    strict: true,
                },
            },
            None => ResponseFormat::JsonObject,
        };

        ChatRequest {
            model: model_id.to_string(),
            messages: messages(self.system.as_deref(), &self.prompt),
            temperature: Some(self.temperature.unwrap_or(0.0)),
            max_tokens: Some(self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)),
            frequency_penalty: None,
            presence_penalty: None,
            stop: Vec::new(),
            response_format: Some(response_format),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageDescription {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageGenerationParams {
    pub prompt: String,
    pub count: Option<u32>,
    pub size: Option<String>,
}

/// Input for [`handle`]
#[derive(Debug, Clone, PartialEq)]
pub enum ModelRequest {
    Text(GenerateTextParams),
    Object(GenerateObjectParams),
    ImageDescription { image_url: String },
    Image(ImageGenerationParams),
    /// `None` is the host's probe for the embedding dimension
    Embedding(Option<String>),
}

impl ModelRequest {
    fn name(&self) -> &'static str {
        match self {
            ModelRequest::Text(_) => "text request",
            ModelRequest::Object(_) => "object request",
            ModelRequest::ImageDescription { .. } => "image description request",
            ModelRequest::Image(_) => "image generation request",
            ModelRequest::Embedding(_) => "embedding request",
        }
    }
}

/// Output of [`handle`]
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput {
    Text(String),
    Object(Value),
    ImageDescription(ImageDescription),
    /// URLs of generated images
    Images(Vec<String>),
    Embedding(Vec<f32>),
}

fn messages(system: Option<&str>, prompt: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system.filter(|s| !s.is_empty()) {
        messages.push(ChatMessage::system(system));
    }
    messages.push(ChatMessage::user(prompt));
    messages
}

fn report_usage<R: AgentRuntime + ?Sized>(
    runtime: &R,
    kind: ModelKind,
    model_id: &str,
    usage: Option<Usage>,
) {
    let Some(usage) = usage else {
        debug!(kind = %kind, model = %model_id, "Response carried no usage");
        return;
    };
    let event = ModelUsageEvent::new(kind, model_id, usage);
    debug!(
        kind = %kind,
        model = %model_id,
        prompt_tokens = event.prompt_tokens,
        completion_tokens = event.completion_tokens,
        total_tokens = event.total_tokens,
        "Model usage"
    );
    runtime.emit_model_usage(&event);
}

/// Strip a surrounding Markdown code fence, if any
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse a model reply as JSON
pub fn parse_json_reply(text: &str) -> Result<Value, ProviderError> {
    serde_json::from_str(strip_code_fence(text))
        .map_err(|e| ProviderError::Parse(format!("Model did not return valid JSON: {}", e)))
}

/// Generate text with the configured small or large model
pub async fn generate_text<R: AgentRuntime + ?Sized>(
    runtime: &R,
    tier: ModelTier,
    params: &GenerateTextParams,
) -> Result<String, ProviderError> {
    let resolver = ConfigResolver::new(runtime);
    let model_id = resolver.model_name(tier);
    let client = create_client(&resolver)?;
    generate_text_with(runtime, &client.chat(&model_id), ModelKind::text(tier), params).await
}

/// Generate text against an already constructed model
pub async fn generate_text_with<R, M>(
    runtime: &R,
    model: &M,
    kind: ModelKind,
    params: &GenerateTextParams,
) -> Result<String, ProviderError>
where
    R: AgentRuntime + ?Sized,
    M: ChatCompletion + ?Sized,
{
    let request = params.to_request(model.model_id());
    let response = model.complete(&request).await?;

    let text = response
        .text()
        .ok_or_else(|| ProviderError::InvalidResponse("Response contained no message".to_string()))?
        .to_string();

    info!(kind = %kind, model = %model.model_id(), chars = text.len(), "Text generated");
    report_usage(runtime, kind, model.model_id(), response.usage);
    Ok(text)
}

/// Generate a JSON value with the configured small or large model
pub async fn generate_object<R: AgentRuntime + ?Sized>(
    runtime: &R,
    tier: ModelTier,
    params: &GenerateObjectParams,
) -> Result<Value, ProviderError> {
    let resolver = ConfigResolver::new(runtime);
    let model_id = resolver.model_name(tier);
    let client = create_client(&resolver)?;
    generate_object_with(runtime, &client.chat(&model_id), ModelKind::object(tier), params).await
}

pub async fn generate_object_with<R, M>(
    runtime: &R,
    model: &M,
    kind: ModelKind,
    params: &GenerateObjectParams,
) -> Result<Value, ProviderError>
where
    R: AgentRuntime + ?Sized,
    M: ChatCompletion + ?Sized,
{
    let request = params.to_request(model.model_id());
    let response = model.complete(&request).await?;

    let text = response
        .text()
        .ok_or_else(|| ProviderError::InvalidResponse("Response contained no message".to_string()))?;
    let value = parse_json_reply(text)?;

    info!(kind = %kind, model = %model.model_id(), "Object generated");
    report_usage(runtime, kind, model.model_id(), response.usage);
    Ok(value)
}

/// Placeholder embedding; index 0 is 0.1 so the vector is not all zeros.
pub fn text_embedding(text: Option<&str>) -> Vec<f32> {
    if text.is_some() {
        warn!("AiMo does not provide embeddings yet; returning a placeholder vector");
    }
    let mut vector = vec![0.0; EMBEDDING_DIMENSIONS];
    vector[0] = 0.1;
    vector
}

pub fn describe_image(image_url: &str) -> ImageDescription {
    warn!(image_url = %image_url, "AiMo does not support image description yet");
    ImageDescription::default()
}

pub fn generate_image(params: &ImageGenerationParams) -> Vec<String> {
    warn!(prompt_chars = params.prompt.len(), "AiMo does not support image generation yet");
    Vec::new()
}

/// Dispatch a request to the handler registered for `kind`
pub async fn handle<R: AgentRuntime + ?Sized>(
    runtime: &R,
    kind: ModelKind,
    request: ModelRequest,
) -> Result<ModelOutput, ProviderError> {
    match (kind, request) {
        (ModelKind::TextSmall | ModelKind::TextLarge, ModelRequest::Text(params)) => {
            let tier = kind.tier().unwrap_or(ModelTier::Small);
            generate_text(runtime, tier, &params).await.map(ModelOutput::Text)
        }
        (ModelKind::ObjectSmall | ModelKind::ObjectLarge, ModelRequest::Object(params)) => {
            let tier = kind.tier().unwrap_or(ModelTier::Small);
            generate_object(runtime, tier, &params)
                .await
                .map(ModelOutput::Object)
        }
        (ModelKind::TextEmbedding, ModelRequest::Embedding(text)) => {
            Ok(ModelOutput::Embedding(text_embedding(text.as_deref())))
        }
        (ModelKind::ImageDescription, ModelRequest::ImageDescription { image_url }) => {
            Ok(ModelOutput::ImageDescription(describe_image(&image_url)))
        }
        (ModelKind::Image, ModelRequest::Image(params)) => {
            Ok(ModelOutput::Images(generate_image(&params)))
        }
        (kind, request) => Err(ProviderError::InvalidRequest(format!(
            "{} cannot handle a {}",
            kind,
            request.name()
        ))),
    }
}
