use anyhow::Context as _;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use crate::models::media::MediaFile;

pub const MAX_EDGE_PX: u32 = 1920;
pub const TARGET_BYTES: usize = 1024 * 1024;
const QUALITY_STEPS: [u8; 5] = [85, 75, 65, 55, 45];

/// Shrinks an image to fit `MAX_EDGE_PX` and re-encodes it as JPEG until it fits
/// `TARGET_BYTES`. Files already within both bounds are returned untouched.
pub fn compress_image(file: &MediaFile) -> anyhow::Result<MediaFile> {
    let img = image::load_from_memory(&file.data).context("decode image")?;
    let (width, height) = img.dimensions();
    let oversized = width.max(height) > MAX_EDGE_PX;

    if !oversized && file.data.len() <= TARGET_BYTES {
        return Ok(file.clone());
    }

    let img = if oversized {
        img.resize(MAX_EDGE_PX, MAX_EDGE_PX, FilterType::Lanczos3)
    } else {
        img
    };
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());

    let mut smallest: Option<Vec<u8>> = None;
    for quality in QUALITY_STEPS {
        let mut buf = Vec::new();
        rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))
            .with_context(|| format!("encode jpeg at quality {}", quality))?;
        let fits = buf.len() <= TARGET_BYTES;
        if smallest.as_ref().map_or(true, |s| buf.len() < s.len()) {
            smallest = Some(buf);
        }
        if fits {
            break;
        }
    }

    let data = smallest.context("no encoding produced")?;
    Ok(MediaFile::new(jpeg_name(&file.file_name), "image/jpeg", data))
}

fn jpeg_name(file_name: &str) -> String {
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);
    format!("{}.jpg", stem)
}
