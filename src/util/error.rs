//! Error types for screenmatch.

use thiserror::Error;

/// Result alias for screenmatch operations.
pub type ScreenMatchResult<T> = std::result::Result<T, ScreenMatchError>;

/// Errors that can occur while loading, matching or acting on images.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ScreenMatchError {
    /// The retry deadline elapsed without a match for the named image.
    #[error("image not found: {name}")]
    ImageNotFound { name: String },
    /// An image asset could not be turned into pixels.
    #[error("cannot decode image: {reason}")]
    DecodeFailure { reason: String },
    /// No image is registered under the requested name.
    #[error("unregistered image: {name}")]
    UnregisteredImage { name: String },
    /// A similarity threshold outside `[0, 1]`.
    #[error("similarity threshold {value} is outside [0, 1]")]
    InvalidThreshold { value: f32 },
    /// The template cannot be scored with the selected metric.
    #[error("degenerate template: {reason}")]
    DegenerateTemplate { reason: &'static str },
    /// Width or height is zero or overflows.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer is shorter than the declared geometry.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A region does not fit inside the image.
    #[error(
        "roi {width}x{height} at ({x}, {y}) out of bounds for {img_width}x{img_height} image"
    )]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// The screen source failed to produce a capture.
    #[error("screen capture failed: {reason}")]
    Capture { reason: String },
    /// The input driver failed to deliver an event.
    #[error("input injection failed: {reason}")]
    Input { reason: String },
}
