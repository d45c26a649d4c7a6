use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("Configuration error: {0} - Please check your .env file and command line flags")]
    Config(String),

    #[error("Caption generation failed: {0} - Please check your API configuration and try again")]
    Transport(String),

    #[error("Unsupported format: {0} - Upload a JPG, PNG, or WEBP image")]
    UnsupportedFormat(String),

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("Object store error: {0} - Please verify the upload directory")]
    Store(String),

    #[error("IO error: {0} - Please check file permissions and path")]
    Io(#[from] io::Error),

    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Template error: {0}")]
    Render(String),
}

impl From<object_store::Error> for CaptionError {
    fn from(error: object_store::Error) -> Self {
        CaptionError::Store(error.to_string())
    }
}

impl From<rig::completion::CompletionError> for CaptionError {
    fn from(error: rig::completion::CompletionError) -> Self {
        CaptionError::Transport(error.to_string())
    }
}

impl From<minijinja::Error> for CaptionError {
    fn from(error: minijinja::Error) -> Self {
        CaptionError::Render(error.to_string())
    }
}
