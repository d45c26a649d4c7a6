pub mod config;
pub mod error;
pub mod image;
pub mod llm;
pub mod parser;
pub mod prompts;
pub mod session;
pub mod store;
pub mod telemetry;
pub mod web;

use error::CaptionError;
use image::ImageUpload;
use store::UploadStore;

// Re-export key types
pub use config::Settings;
pub use llm::{
    create_caption_client, create_caption_client_with_config, CaptionClient, CaptionConfig,
    CaptionRequester, MockCaptionClient, SharedCaptionClient,
};
pub use parser::{parse, CaptionSet, ParserOptions};
pub use prompts::{CAPTION_PROMPT, MAIN_CAPTION_PROMPT};

/// Main interface: image in, parsed captions out.
#[derive(Clone)]
pub struct CaptionMaker {
    client: SharedCaptionClient,
    options: ParserOptions,
    store: UploadStore,
}

impl CaptionMaker {
    /// Create a maker that keeps uploads in memory only
    pub fn new(client: SharedCaptionClient, options: ParserOptions) -> Self {
        Self::with_store(client, options, UploadStore::in_memory())
    }

    pub fn with_store(
        client: SharedCaptionClient,
        options: ParserOptions,
        store: UploadStore,
    ) -> Self {
        Self {
            client,
            options,
            store,
        }
    }

    pub fn options(&self) -> ParserOptions {
        self.options
    }

    pub fn store(&self) -> &UploadStore {
        &self.store
    }

    /// Request captions for `upload` and parse the reply.
    pub async fn generate(&self, upload: &ImageUpload) -> Result<CaptionSet, CaptionError> {
        let reply = match self.client.request_caption(upload).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("Caption generation failed for {}: {}", upload.file_name, e);
                return Err(e);
            }
        };

        let set = parse(&reply, self.options);

        tracing::info!("Generated Description: {}", set.description);
        if let Some(main) = &set.main_caption {
            tracing::info!("Main Caption: {}", main);
        }
        for (idx, caption) in set.captions.iter().enumerate() {
            tracing::info!("Caption {}: {}", idx + 1, caption);
        }

        Ok(set)
    }

    /// Convenience for one-shot use: read, store and caption a local file.
    pub async fn caption_file(&self, file_path: &str) -> Result<CaptionSet, CaptionError> {
        let bytes = tokio::fs::read(file_path).await?;
        let upload = ImageUpload::new(file_path, bytes)?;
        self.store.save(&upload).await?;
        self.generate(&upload).await
    }
}
