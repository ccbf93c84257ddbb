//! Search templates and their precomputed scoring plans.

use crate::asset::ImageAsset;
use crate::util::{ScreenMatchError, ScreenMatchResult};

mod plan;

pub use plan::{SsdTemplatePlan, TemplatePlan};

/// Similarity used when a template is registered without an explicit one.
pub const DEFAULT_SIMILARITY: f32 = 0.8;

/// An image to look for plus the minimum similarity a hit must reach.
#[derive(Clone, Debug)]
pub struct SearchTemplate {
    name: String,
    asset: ImageAsset,
    similarity: f32,
}

impl SearchTemplate {
    /// Creates a template, rejecting thresholds outside `[0, 1]`.
    pub fn new(
        name: impl Into<String>,
        asset: ImageAsset,
        similarity: f32,
    ) -> ScreenMatchResult<Self> {
        if !(0.0..=1.0).contains(&similarity) {
            return Err(ScreenMatchError::InvalidThreshold { value: similarity });
        }
        Ok(Self {
            name: name.into(),
            asset,
            similarity,
        })
    }

    /// Creates a template with [`DEFAULT_SIMILARITY`].
    pub fn with_default_similarity(name: impl Into<String>, asset: ImageAsset) -> Self {
        Self {
            name: name.into(),
            asset,
            similarity: DEFAULT_SIMILARITY,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn asset(&self) -> &ImageAsset {
        &self.asset
    }

    /// Mutable access for cache invalidation.
    pub fn asset_mut(&mut self) -> &mut ImageAsset {
        &mut self.asset
    }

    pub fn similarity(&self) -> f32 {
        self.similarity
    }
}
