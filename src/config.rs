use rig::client::CompletionClient;
use rig::providers::openai;
use std::env;

use crate::error::CaptionError;
use crate::llm::{
    create_caption_client_with_config, CaptionConfig, SharedCaptionClient, DEFAULT_MODEL,
};
use crate::parser::ParserOptions;
use crate::prompts::prompt_for;

/// Groq serves an OpenAI-compatible chat completions API.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

pub const API_KEY_VAR: &str = "GROQ_API_KEY";
pub const BASE_URL_VAR: &str = "GROQ_BASE_URL";
pub const MODEL_VAR: &str = "CAPTION_MODEL";
pub const MAX_RETRIES_VAR: &str = "CAPTION_MAX_RETRIES";

/// Provider settings read from the environment (after `.env` is loaded).
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_retries: u32,
}

impl Settings {
    /// Read settings through `lookup`, so tests need not touch the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CaptionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                CaptionError::Config(format!("Please set {} in your .env file", API_KEY_VAR))
            })?;

        let base_url = lookup(BASE_URL_VAR)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let model = lookup(MODEL_VAR)
            .map(|model| model.trim().to_string())
            .filter(|model| !model.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let max_retries = match lookup(MAX_RETRIES_VAR) {
            Some(raw) => raw.trim().parse().map_err(|_| {
                CaptionError::Config(format!(
                    "{} must be a non-negative integer, got '{}'",
                    MAX_RETRIES_VAR, raw
                ))
            })?,
            None => 0,
        };

        Ok(Self {
            api_key,
            base_url,
            model,
            max_retries,
        })
    }

    pub fn from_env() -> Result<Self, CaptionError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn caption_config(&self, options: ParserOptions) -> CaptionConfig {
        CaptionConfig::default()
            .with_prompt(prompt_for(options.include_main_caption))
            .with_model(&self.model)
            .with_max_retries(self.max_retries)
    }

    /// Build the shared caption client for the configured provider.
    pub fn build_client(&self, options: ParserOptions) -> SharedCaptionClient {
        let client = openai::Client::builder(&self.api_key)
            .base_url(&self.base_url)
            .build();
        let model = client.completion_model(&self.model).completions_api();

        create_caption_client_with_config(model, self.caption_config(options))
    }
}
