//! Media storage port for uploaded images.

use async_trait::async_trait;

/// Image formats accepted for avatars and covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// Resolve a format from a `Content-Type` value or a file extension.
    pub fn detect(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        let essence = value.split(';').next().unwrap_or_default().trim();
        match essence {
            "image/jpeg" | "image/jpg" | "jpg" | "jpeg" => Some(Self::Jpeg),
            "image/png" | "png" => Some(Self::Png),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Persist an image under `folder` and return the URL it is served from.
    async fn store(
        &self,
        folder: &str,
        format: ImageFormat,
        bytes: &[u8],
    ) -> Result<String, MediaError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("No file uploaded")]
    Empty,

    #[error("Storage failure: {0}")]
    Storage(String),
}
