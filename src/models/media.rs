use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_IMAGES: usize = 5;
pub const MAX_VIDEOS: usize = 2;
pub const MAX_DOCUMENTS: usize = 2;

pub const MAX_VIDEO_BYTES: u64 = 50 * 1024 * 1024;
pub const MAX_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Cover,
    Image,
    Video,
    Document,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadType {
    Image,
    Video,
    Document,
    Audio,
}

impl UploadType {
    pub fn as_str(self) -> &'static str {
        match self {
            UploadType::Image => "image",
            UploadType::Video => "video",
            UploadType::Document => "document",
            UploadType::Audio => "audio",
        }
    }
}

impl MediaKind {
    pub fn cap(self) -> usize {
        match self {
            MediaKind::Cover => 1,
            MediaKind::Image => MAX_IMAGES,
            MediaKind::Video => MAX_VIDEOS,
            MediaKind::Document => MAX_DOCUMENTS,
        }
    }

    pub fn size_ceiling(self) -> Option<u64> {
        match self {
            MediaKind::Video => Some(MAX_VIDEO_BYTES),
            MediaKind::Document => Some(MAX_DOCUMENT_BYTES),
            MediaKind::Cover | MediaKind::Image => None,
        }
    }

    pub fn upload_type(self) -> UploadType {
        match self {
            MediaKind::Cover | MediaKind::Image => UploadType::Image,
            MediaKind::Video => UploadType::Video,
            MediaKind::Document => UploadType::Document,
        }
    }

    pub fn is_image(self) -> bool {
        matches!(self, MediaKind::Cover | MediaKind::Image)
    }

    pub(crate) fn limit_message_key(self) -> &'static str {
        match self {
            MediaKind::Cover | MediaKind::Image => "media.too_many_images",
            MediaKind::Video => "media.too_many_videos",
            MediaKind::Document => "media.too_many_documents",
        }
    }

    pub(crate) fn size_message_key(self) -> &'static str {
        match self {
            MediaKind::Document => "media.document_too_large",
            _ => "media.video_too_large",
        }
    }

    /// Classifies a stored gallery URL back into image / video / document by extension.
    pub fn infer_from_url(url: &str) -> MediaKind {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let ext = path
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "mp4" | "mov" | "webm" | "avi" | "mkv" | "m4v" => MediaKind::Video,
            "pdf" | "doc" | "docx" | "ppt" | "pptx" | "xls" | "xlsx" | "txt" | "zip" => {
                MediaKind::Document
            }
            _ => MediaKind::Image,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaKind::Cover => "cover",
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Document => "document",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct MediaFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl MediaFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_kind_from_extension() {
        assert_eq!(
            MediaKind::infer_from_url("https://cdn.test/a/clip.MP4?token=1"),
            MediaKind::Video
        );
        assert_eq!(
            MediaKind::infer_from_url("https://cdn.test/brief.pdf"),
            MediaKind::Document
        );
        assert_eq!(
            MediaKind::infer_from_url("https://cdn.test/shot.webp"),
            MediaKind::Image
        );
        assert_eq!(MediaKind::infer_from_url("https://cdn.test/noext"), MediaKind::Image);
    }

    #[test]
    fn caps_and_ceilings() {
        assert_eq!(MediaKind::Image.cap(), 5);
        assert_eq!(MediaKind::Video.cap(), 2);
        assert_eq!(MediaKind::Document.cap(), 2);
        assert_eq!(MediaKind::Image.size_ceiling(), None);
        assert_eq!(MediaKind::Video.size_ceiling(), Some(50 * 1024 * 1024));
        assert_eq!(MediaKind::Document.upload_type().as_str(), "document");
    }
}
