//! Product forms arrive as multipart bodies: text fields plus an optional
//! `image` file.

use axum::extract::Multipart;
use std::collections::HashMap;

use super::response::ApiError;
use crate::images::UploadedImage;

const IMAGE_FIELD: &str = "image";

#[derive(Debug, Default)]
pub struct ProductForm {
    pub(crate) fields: HashMap<String, String>,
    pub(crate) image: Option<UploadedImage>,
}

impl ProductForm {
    pub async fn collect(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if field.file_name().is_some() {
                if name != IMAGE_FIELD {
                    continue;
                }
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(|e| ApiError::bad_request(e.body_text()))?;
                if !data.is_empty() {
                    form.image = Some(UploadedImage { file_name, content_type, data });
                }
            } else {
                let value = field.text().await.map_err(|e| ApiError::bad_request(e.body_text()))?;
                form.fields.insert(name, value);
            }
        }
        Ok(form)
    }

    /// Raw value of the first key present, trimmed.
    pub fn raw(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.fields.get(*k)).map(|v| v.trim())
    }

    /// Like [`raw`](Self::raw) but treats blank values as absent.
    pub fn text(&self, keys: &[&str]) -> Option<&str> {
        self.raw(keys).filter(|v| !v.is_empty())
    }

    pub fn take_image(&mut self) -> Option<UploadedImage> {
        self.image.take()
    }
}
