//! Decoding image files through the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::OwnedImage;
use crate::util::{ScreenMatchError, ScreenMatchResult};
use std::path::Path;

/// Converts a decoded grayscale buffer to an owned image.
pub fn owned_from_gray_image(img: &image::GrayImage) -> ScreenMatchResult<OwnedImage> {
    OwnedImage::new(
        img.as_raw().clone(),
        img.width() as usize,
        img.height() as usize,
    )
}

/// Converts any decoded image (RGB, RGBA, ...) to grayscale.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> ScreenMatchResult<OwnedImage> {
    owned_from_gray_image(&img.to_luma8())
}

/// Loads and decodes an image file, converting it to grayscale.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> ScreenMatchResult<OwnedImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| ScreenMatchError::DecodeFailure {
        reason: format!("{}: {err}", path.display()),
    })?;
    owned_from_dynamic_image(&img)
}

/// Returns true for file extensions this module can decode.
pub fn is_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .is_some_and(|ext| matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "bmp"))
}
