use std::{fs, io::Cursor, path::Path};

use base64::Engine as _;
use image::{DynamicImage, ImageFormat, imageops::FilterType};

use crate::error::ImageError;

/// File extensions picked up by batch runs, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

#[derive(Debug, Clone)]
pub struct PreparedImage {
    png: Vec<u8>,
    width: u32,
    height: u32,
}

impl PreparedImage {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.png)
    }
}

pub fn decode_bytes(bytes: &[u8], size: u32) -> Result<PreparedImage, ImageError> {
    let img = image::load_from_memory(bytes).map_err(|e| ImageError::Decode(e.to_string()))?;
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8()).resize_exact(size, size, FilterType::Triangle);

    let mut png = Cursor::new(Vec::new());
    rgb.write_to(&mut png, ImageFormat::Png)
        .map_err(|e| ImageError::Encode(e.to_string()))?;

    Ok(PreparedImage {
        png: png.into_inner(),
        width: rgb.width(),
        height: rgb.height(),
    })
}

pub fn decode_path(path: &Path, size: u32) -> Result<PreparedImage, ImageError> {
    let bytes = fs::read(path)?;
    decode_bytes(&bytes, size)
}

/// Decode on the blocking pool so large images do not stall the runtime.
pub async fn decode_bytes_blocking(bytes: Vec<u8>, size: u32) -> Result<PreparedImage, ImageError> {
    tokio::task::spawn_blocking(move || decode_bytes(&bytes, size))
        .await
        .map_err(|e| ImageError::Worker(e.to_string()))?
}

pub async fn decode_path_blocking(
    path: &Path,
    size: u32,
) -> Result<PreparedImage, ImageError> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || decode_path(&path, size))
        .await
        .map_err(|e| ImageError::Worker(e.to_string()))?
}

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}
