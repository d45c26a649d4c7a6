use base64::prelude::*;
use bytes::Bytes;
use mime_guess::MimeGuess;
use rig::message::ImageMediaType;
use std::path::Path;

use crate::error::CaptionError;

/// Image encodings accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Webp => "image/webp",
        }
    }

    pub fn media_type(&self) -> ImageMediaType {
        match self {
            ImageFormat::Jpeg => ImageMediaType::JPEG,
            ImageFormat::Png => ImageMediaType::PNG,
            ImageFormat::Webp => ImageMediaType::WEBP,
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.to_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/png" => Some(ImageFormat::Png),
            "image/webp" => Some(ImageFormat::Webp),
            _ => None,
        }
    }

    /// Detect the format of an upload.
    /// Priority: 1) magic bytes, 2) MIME guess from the file name
    pub fn detect(bytes: &[u8], file_name: &str) -> Result<Self, CaptionError> {
        if let Some(kind) = infer::get(bytes) {
            return Self::from_mime(kind.mime_type()).ok_or_else(|| {
                CaptionError::UnsupportedFormat(format!(
                    "{} looks like {}",
                    file_name,
                    kind.mime_type()
                ))
            });
        }

        MimeGuess::from_path(file_name)
            .iter()
            .find_map(|mime| Self::from_mime(mime.essence_str()))
            .ok_or_else(|| {
                CaptionError::UnsupportedFormat(format!("could not identify {}", file_name))
            })
    }
}

/// A single uploaded image and the name it was uploaded under.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub data: Bytes,
    pub format: ImageFormat,
}

impl ImageUpload {
    /// Build an upload from raw bytes, detecting the format.
    ///
    /// Directory components are dropped from `file_name`, so the stored name
    /// is always a plain file name.
    pub fn new(file_name: &str, data: impl Into<Bytes>) -> Result<Self, CaptionError> {
        let data = data.into();
        if data.is_empty() {
            return Err(CaptionError::InvalidUpload(format!("{} is empty", file_name)));
        }

        let file_name = sanitize_file_name(file_name)?;
        let format = ImageFormat::detect(&data, &file_name)?;

        Ok(Self {
            file_name,
            data,
            format,
        })
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn to_base64(&self) -> String {
        BASE64_STANDARD.encode(&self.data)
    }

    /// `data:<mime>;base64,<payload>` using the detected MIME type.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), self.to_base64())
    }
}

fn sanitize_file_name(file_name: &str) -> Result<String, CaptionError> {
    // Browsers on Windows may send the full client path.
    let normalized = file_name.replace('\\', "/");
    Path::new(&normalized)
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty() && name != "." && name != "..")
        .ok_or_else(|| CaptionError::InvalidUpload(format!("bad file name '{}'", file_name)))
}
