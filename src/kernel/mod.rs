//! Similarity kernels.
//!
//! A kernel scores a single template placement. Scores are normalized to
//! `[0, 1]` and values within [`PERFECT_SCORE_EPS`] of one snap to exactly
//! `1.0`, so a pixel-exact placement is always reported as perfect.

use crate::ImageView;

pub mod scalar;

#[cfg(feature = "rayon")]
pub mod rayon;

/// Distance from 1.0 under which a score counts as a perfect match.
pub const PERFECT_SCORE_EPS: f32 = 1e-5;

/// Scan configuration shared by all kernels.
#[derive(Clone, Copy, Debug)]
pub struct ScanParams {
    /// Placements scoring below this are discarded.
    pub min_score: f32,
    /// Minimum sum of squared deviations for an image window (ZNCC only).
    pub min_var_i: f64,
}

/// Kernel trait for scoring one placement (top-left coordinates).
pub trait Kernel {
    type Plan: Sync;

    /// Template width and height covered by the plan.
    fn plan_size(plan: &Self::Plan) -> (usize, usize);

    /// Returns `None` when the placement cannot be scored (out of bounds or a
    /// flat window under ZNCC).
    fn score_at(
        image: ImageView<'_, u8>,
        plan: &Self::Plan,
        x: usize,
        y: usize,
        params: &ScanParams,
    ) -> Option<f32>;
}

/// Clamps a raw score into `[0, 1]` and snaps near-perfect values.
pub(crate) fn normalize_score(raw: f64) -> Option<f32> {
    if !raw.is_finite() {
        return None;
    }
    let score = raw.clamp(0.0, 1.0) as f32;
    if score >= 1.0 - PERFECT_SCORE_EPS {
        Some(1.0)
    } else {
        Some(score)
    }
}

/// Whether a `w x h` template fits at `(x, y)`.
pub(crate) fn placement_fits(image: ImageView<'_, u8>, w: usize, h: usize, x: usize, y: usize) -> bool {
    image.width() >= w && image.height() >= h && x <= image.width() - w && y <= image.height() - h
}
