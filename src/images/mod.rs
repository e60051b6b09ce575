//! External image hosting for product pictures.

mod cloudinary;

pub use cloudinary::CloudinaryStore;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// A file received from a product form.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Location of an image on the host, plus the id needed to delete it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub url: String,
    pub public_id: String,
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image hosting is not configured")]
    NotConfigured,

    #[error("image host rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("image host request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload(&self, image: UploadedImage) -> Result<StoredImage, ImageError>;
    async fn destroy(&self, public_id: &str) -> Result<(), ImageError>;
}

/// Used when no image host credentials are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledImageStore;

#[async_trait]
impl ImageStore for DisabledImageStore {
    async fn upload(&self, _image: UploadedImage) -> Result<StoredImage, ImageError> {
        Err(ImageError::NotConfigured)
    }

    async fn destroy(&self, _public_id: &str) -> Result<(), ImageError> {
        Err(ImageError::NotConfigured)
    }
}
