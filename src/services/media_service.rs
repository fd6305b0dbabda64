use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::dto::service_dto::UploadResponse;
use crate::error::{Error, Result};
use crate::models::draft::ServiceDraft;
use crate::models::media::{MediaFile, MediaKind, UploadType};
use crate::services::api_client::{server_message, ApiClient};
use crate::utils::image::compress_image;

const UPLOAD_CONTEXT: &str = "service";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaUploader: Send + Sync {
    async fn upload(&self, file: MediaFile, upload_type: UploadType) -> Result<String>;
}

#[derive(Clone)]
pub struct UploadService {
    api: ApiClient,
}

impl UploadService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl MediaUploader for UploadService {
    #[instrument(skip(self, file), fields(file_name = %file.file_name, size = file.size()))]
    async fn upload(&self, file: MediaFile, upload_type: UploadType) -> Result<String> {
        let part = Part::bytes(file.data.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| Error::UploadFailed(format!("Invalid content type: {}", e)))?;
        let form = Form::new()
            .part("file", part)
            .text("type", upload_type.as_str())
            .text("context", UPLOAD_CONTEXT);

        let response = self
            .api
            .request(Method::POST, "upload")?
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::UploadFailed(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::UploadFailed(format!("Failed to read upload response: {}", e)))?;
        if !status.is_success() {
            warn!(status = status.as_u16(), body = %text, "Upload rejected");
            return Err(Error::UploadFailed(
                server_message(&text).unwrap_or_else(|| format!("HTTP error {}", status.as_u16())),
            ));
        }

        let parsed: UploadResponse = serde_json::from_str(&text)
            .map_err(|e| Error::UploadFailed(format!("Unexpected upload response: {}", e)))?;
        match (parsed.url, parsed.error) {
            (_, Some(error)) => Err(Error::UploadFailed(error)),
            (Some(url), None) => Ok(url),
            (None, None) => Err(Error::UploadFailed(String::new())),
        }
    }
}

#[derive(Clone)]
pub struct MediaManager {
    uploader: Arc<dyn MediaUploader>,
}

impl MediaManager {
    pub fn new(uploader: Arc<dyn MediaUploader>) -> Self {
        Self { uploader }
    }

    #[instrument(skip(self, draft, file), fields(file_name = %file.file_name))]
    pub async fn add_media(
        &self,
        draft: &mut ServiceDraft,
        kind: MediaKind,
        file: MediaFile,
    ) -> Result<String> {
        let current = slot_len(draft, kind);
        if kind != MediaKind::Cover && current >= kind.cap() {
            return Err(Error::LimitExceeded {
                kind,
                max: kind.cap(),
            });
        }

        if let Some(max) = kind.size_ceiling() {
            if file.size() > max {
                return Err(Error::SizeExceeded {
                    kind,
                    size: file.size(),
                    max,
                });
            }
        }

        let file = if kind.is_image() {
            prepare_image(file).await
        } else {
            file
        };

        let url = self.uploader.upload(file, kind.upload_type()).await?;
        info!(%kind, %url, "Media uploaded");

        match kind {
            MediaKind::Cover => draft.cover_image = Some(url.clone()),
            MediaKind::Image => draft.images.push(url.clone()),
            MediaKind::Video => draft.videos.push(url.clone()),
            MediaKind::Document => draft.documents.push(url.clone()),
        }
        Ok(url)
    }

    pub fn remove_media(draft: &mut ServiceDraft, kind: MediaKind, url: &str) -> bool {
        match kind {
            MediaKind::Cover => {
                if draft.cover_image.as_deref() == Some(url) {
                    draft.cover_image = None;
                    true
                } else {
                    false
                }
            }
            MediaKind::Image => remove_url(&mut draft.images, url),
            MediaKind::Video => remove_url(&mut draft.videos, url),
            MediaKind::Document => remove_url(&mut draft.documents, url),
        }
    }
}

fn slot_len(draft: &ServiceDraft, kind: MediaKind) -> usize {
    match kind {
        MediaKind::Cover => usize::from(draft.cover_image.is_some()),
        MediaKind::Image => draft.images.len(),
        MediaKind::Video => draft.videos.len(),
        MediaKind::Document => draft.documents.len(),
    }
}

fn remove_url(list: &mut Vec<String>, url: &str) -> bool {
    let before = list.len();
    list.retain(|u| u != url);
    list.len() != before
}

async fn prepare_image(file: MediaFile) -> MediaFile {
    let original = file.clone();
    match tokio::task::spawn_blocking(move || compress_image(&file)).await {
        Ok(Ok(compressed)) => compressed,
        Ok(Err(e)) => {
            warn!(error = %e, "Image compression failed, uploading original");
            original
        }
        Err(e) => {
            warn!(error = %e, "Image compression task failed, uploading original");
            original
        }
    }
}
