//! Encoded bytes to [`RawImage`], via the `image` codecs.

use crate::error::LoadError;
use crate::models::RawImage;
use image::ImageError;
use std::path::Path;
use tracing::{debug, instrument};

/// Decode an in-memory image (PNG, JPEG, ...)
#[instrument(skip(bytes), fields(len = bytes.len()))]
pub fn load_from_memory(bytes: &[u8]) -> Result<RawImage, LoadError> {
    let decoded = image::load_from_memory(bytes).map_err(classify)?;
    let image = RawImage::from_dynamic(&decoded)?;
    debug!(
        width = image.width(),
        height = image.height(),
        "Image decoded from bytes"
    );
    Ok(image)
}

/// Read and decode an image file
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_path<P: AsRef<Path>>(path: P) -> Result<RawImage, LoadError> {
    let bytes = std::fs::read(path.as_ref())?;
    load_from_memory(&bytes)
}

fn classify(err: ImageError) -> LoadError {
    match err {
        ImageError::Unsupported(e) => LoadError::UnsupportedFormat(e.to_string()),
        other => LoadError::CorruptData(other.to_string()),
    }
}
