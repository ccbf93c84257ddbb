//! Image assets with an explicit decode cache.
//!
//! An asset names where its pixels come from (a file, an in-memory buffer or
//! both) and memoizes the decoded grayscale image on first access. Clones share
//! one cache, so a template handed out by a directory is decoded once no matter
//! how often it is looked up. The cache is never invalidated by the matcher;
//! owners call [`ImageAsset::invalidate`] or [`ImageAsset::reload`] when the
//! file on disk has changed.

use crate::image::OwnedImage;
use crate::util::{ScreenMatchError, ScreenMatchResult};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

type DecodeCache = Arc<OnceLock<Arc<OwnedImage>>>;

/// Pixel origin plus its lazily populated decode cache.
#[derive(Clone, Debug, Default)]
pub struct ImageAsset {
    path: Option<PathBuf>,
    buffer: Option<Arc<OwnedImage>>,
    cache: DecodeCache,
}

impl ImageAsset {
    /// Asset decoded from a file on first use.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Asset backed by an already decoded buffer.
    pub fn from_image(image: OwnedImage) -> Self {
        Self {
            buffer: Some(Arc::new(image)),
            ..Self::default()
        }
    }

    /// Asset with both origins; the file takes precedence when decoding.
    pub fn with_path_and_image(path: impl Into<PathBuf>, image: OwnedImage) -> Self {
        Self {
            path: Some(path.into()),
            buffer: Some(Arc::new(image)),
            cache: DecodeCache::default(),
        }
    }

    /// Asset with no pixel origin. Decoding it fails.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Short human-readable description used in errors and traces.
    pub fn label(&self) -> String {
        match (&self.path, &self.buffer) {
            (Some(path), _) => path.display().to_string(),
            (None, Some(img)) => format!("<buffer {}x{}>", img.width(), img.height()),
            (None, None) => "<empty>".to_string(),
        }
    }

    /// Returns the decoded pixels, decoding and caching them on first call.
    pub fn pixels(&self) -> ScreenMatchResult<&OwnedImage> {
        if let Some(img) = self.cache.get() {
            return Ok(&**img);
        }
        let decoded = self.decode()?;
        Ok(&**self.cache.get_or_init(|| decoded))
    }

    /// Width and height of the decoded image.
    pub fn dimensions(&self) -> ScreenMatchResult<(usize, usize)> {
        let img = self.pixels()?;
        Ok((img.width(), img.height()))
    }

    pub fn is_cached(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Drops the cached pixels; the next access decodes again.
    ///
    /// Only this asset is detached. Clones taken earlier keep the old pixels;
    /// clones taken afterwards share the fresh cache.
    pub fn invalidate(&mut self) {
        self.cache = DecodeCache::default();
    }

    /// Drops the cached pixels and decodes immediately.
    pub fn reload(&mut self) -> ScreenMatchResult<&OwnedImage> {
        self.invalidate();
        self.pixels()
    }

    #[cfg(feature = "image-io")]
    fn decode(&self) -> ScreenMatchResult<Arc<OwnedImage>> {
        if let Some(path) = &self.path {
            return crate::image::io::load_gray_image(path).map(Arc::new);
        }
        self.buffered()
    }

    #[cfg(not(feature = "image-io"))]
    fn decode(&self) -> ScreenMatchResult<Arc<OwnedImage>> {
        match (&self.path, &self.buffer) {
            (Some(path), None) => Err(ScreenMatchError::DecodeFailure {
                reason: format!(
                    "{}: file decoding requires the `image-io` feature",
                    path.display()
                ),
            }),
            _ => self.buffered(),
        }
    }

    fn buffered(&self) -> ScreenMatchResult<Arc<OwnedImage>> {
        self.buffer
            .clone()
            .ok_or_else(|| ScreenMatchError::DecodeFailure {
                reason: "asset has neither a file path nor an in-memory buffer".to_string(),
            })
    }
}
