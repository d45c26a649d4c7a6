//! Caption requests against any rig-core compatible vision model.
//!
//! The production path wraps a rig `CompletionModel` in a [`CaptionRequester`].
//! Providers are wired up in [`crate::config`]; by default that is Groq's
//! OpenAI-compatible endpoint.
//!
//! # Example
//! ```ignore
//! use rig::providers::openai;
//! use caption_maker::llm::{CaptionRequester, CaptionConfig};
//!
//! let client = openai::Client::from_env();
//! let model = client.completion_model("gpt-4o").completions_api();
//! let requester = CaptionRequester::new(model);
//! ```

use async_trait::async_trait;
use rig::{
    completion::{AssistantContent, CompletionModel, CompletionRequest},
    message::{ImageDetail, Message, UserContent},
    OneOrMany,
};
use serde_json::json;
use std::sync::Arc;

use crate::error::CaptionError;
use crate::image::ImageUpload;
use crate::prompts::CAPTION_PROMPT;

pub const DEFAULT_MODEL: &str = "llama-3.2-90b-vision-preview";

/// Request settings for caption generation.
#[derive(Debug, Clone)]
pub struct CaptionConfig {
    /// Instruction sent alongside the image
    pub prompt: String,
    /// Model identifier, reported in logs
    pub model: String,
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u64,
    /// Extra attempts after a failed request. 0 means fail on the first error.
    pub max_retries: u32,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            prompt: CAPTION_PROMPT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 1.0,
            top_p: 1.0,
            max_tokens: 1500,
            max_retries: 0,
        }
    }
}

impl CaptionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temp: f64) -> Self {
        self.temperature = temp.clamp(0.0, 2.0);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = top_p.clamp(0.0, 1.0);
        self
    }

    pub fn with_max_tokens(mut self, tokens: u64) -> Self {
        self.max_tokens = tokens.max(1);
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }
}

/// Anything that can turn an image into a raw caption reply.
#[async_trait]
pub trait CaptionClient: Send + Sync {
    /// Send the image with the configured prompt and return the reply text.
    async fn request_caption(&self, image: &ImageUpload) -> Result<String, CaptionError>;

    fn config(&self) -> &CaptionConfig;
}

pub type SharedCaptionClient = Arc<dyn CaptionClient>;

/// [`CaptionClient`] backed by a rig-core completion model.
pub struct CaptionRequester<M: CompletionModel> {
    model: Arc<M>,
    config: CaptionConfig,
}

impl<M: CompletionModel> CaptionRequester<M> {
    pub fn new(model: M) -> Self {
        Self::with_config(model, CaptionConfig::default())
    }

    pub fn with_config(model: M, config: CaptionConfig) -> Self {
        Self {
            model: Arc::new(model),
            config,
        }
    }

    /// One user message: the instruction text followed by the image.
    fn build_request(&self, image: &ImageUpload) -> CompletionRequest {
        let mut content = OneOrMany::one(UserContent::text(&self.config.prompt));
        content.push(UserContent::image_base64(
            image.to_base64(),
            Some(image.format.media_type()),
            Some(ImageDetail::Auto),
        ));

        self.model
            .completion_request(Message::User { content })
            .temperature(self.config.temperature)
            // sent as a raw field: not every rig provider forwards the builder's max_tokens
            .additional_params(json!({
                "max_tokens": self.config.max_tokens,
                "top_p": self.config.top_p,
                "stream": false,
                "stop": null,
            }))
            .build()
    }

    async fn send_request(&self, request: CompletionRequest) -> Result<String, CaptionError> {
        let response = self.model.completion(request).await?;
        let text = extract_text_from_response(&response.choice);
        if text.trim().is_empty() {
            return Err(CaptionError::Transport(
                "model returned an empty reply".to_string(),
            ));
        }
        Ok(text.trim().to_string())
    }
}

/// Extract text content from assistant response
fn extract_text_from_response(content: &OneOrMany<AssistantContent>) -> String {
    content
        .iter()
        .filter_map(|c| match c {
            AssistantContent::Text(text) => Some(text.text.clone()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl<M: CompletionModel + Send + Sync + 'static> CaptionClient for CaptionRequester<M> {
    async fn request_caption(&self, image: &ImageUpload) -> Result<String, CaptionError> {
        let mut attempt = 0;
        loop {
            tracing::debug!(
                model = %self.config.model,
                file = %image.file_name,
                mime = image.mime_type(),
                attempt,
                "requesting captions"
            );
            match self.send_request(self.build_request(image)).await {
                Ok(reply) => return Ok(reply),
                Err(e) if attempt < self.config.max_retries => {
                    tracing::warn!("caption request failed, retrying: {}", e);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn config(&self) -> &CaptionConfig {
        &self.config
    }
}

/// A canned-reply client for tests and offline runs.
pub struct MockCaptionClient {
    pub reply: Result<String, String>,
    config: CaptionConfig,
}

impl MockCaptionClient {
    pub fn new() -> Self {
        Self {
            reply: Ok("Description: A mock photo.\nCaptions:\n1. Mock caption".to_string()),
            config: CaptionConfig::default(),
        }
    }

    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.reply = Ok(reply.into());
        self
    }

    /// Every request fails with a transport error carrying `message`.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.reply = Err(message.into());
        self
    }

    pub fn with_config(mut self, config: CaptionConfig) -> Self {
        self.config = config;
        self
    }
}

impl Default for MockCaptionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptionClient for MockCaptionClient {
    async fn request_caption(&self, _image: &ImageUpload) -> Result<String, CaptionError> {
        self.reply.clone().map_err(CaptionError::Transport)
    }

    fn config(&self) -> &CaptionConfig {
        &self.config
    }
}

pub fn create_caption_client<M: CompletionModel + Send + Sync + 'static>(
    model: M,
) -> SharedCaptionClient {
    Arc::new(CaptionRequester::new(model))
}

pub fn create_caption_client_with_config<M: CompletionModel + Send + Sync + 'static>(
    model: M,
    config: CaptionConfig,
) -> SharedCaptionClient {
    Arc::new(CaptionRequester::with_config(model, config))
}
