use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{ImageError, ImageStore, StoredImage, UploadedImage};
use crate::config::CloudinarySettings;

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Cloudinary client: unsigned uploads through an upload preset, deletions
/// through the admin API.
#[derive(Debug, Clone)]
pub struct CloudinaryStore {
    http: reqwest::Client,
    settings: CloudinarySettings,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

impl CloudinaryStore {
    pub fn new(settings: CloudinarySettings) -> Result<Self, ImageError> {
        let http = reqwest::Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self { http, settings })
    }

    fn upload_url(&self) -> String {
        format!("{API_BASE}/{}/image/upload", self.settings.cloud_name)
    }

    fn resources_url(&self) -> String {
        format!("{API_BASE}/{}/resources/image/upload", self.settings.cloud_name)
    }

    fn new_public_id(&self) -> String {
        format!("{}/{}", self.settings.folder.trim_end_matches('/'), Uuid::new_v4())
    }
}

async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, ImageError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ImageError::Rejected { status: status.as_u16(), body })
}

#[async_trait]
impl ImageStore for CloudinaryStore {
    #[instrument(skip(self, image), fields(bytes = image.data.len()))]
    async fn upload(&self, image: UploadedImage) -> Result<StoredImage, ImageError> {
        let mut part = Part::bytes(image.data.to_vec()).file_name(image.file_name.unwrap_or_else(|| "upload".to_string()));
        if let Some(content_type) = image.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }
        let form = Form::new()
            .text("upload_preset", self.settings.upload_preset.clone())
            .text("public_id", self.new_public_id())
            .part("file", part);

        let resp = self.http.post(self.upload_url()).multipart(form).send().await?;
        let uploaded: UploadResponse = ensure_success(resp).await?.json().await?;
        debug!(public_id = %uploaded.public_id, "image uploaded");
        Ok(StoredImage { url: uploaded.secure_url, public_id: uploaded.public_id })
    }

    #[instrument(skip(self))]
    async fn destroy(&self, public_id: &str) -> Result<(), ImageError> {
        let resp = self
            .http
            .delete(self.resources_url())
            .basic_auth(&self.settings.api_key, Some(&self.settings.api_secret))
            .query(&[("public_ids[]", public_id)])
            .send()
            .await?;
        ensure_success(resp).await?;
        debug!("image destroyed");
        Ok(())
    }
}
