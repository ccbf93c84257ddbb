//! Row-parallel scanning (feature-gated).
//!
//! Rows are scored independently and concatenated in row order, so the output
//! is identical to the sequential raster scan.

use crate::candidate::MatchCandidate;
use crate::kernel::{Kernel, ScanParams};
use crate::ImageView;
use rayon::prelude::*;

/// Scores every placement in parallel over rows, keeping those >= `min_score`.
pub(crate) fn scan_all_par<K: Kernel>(
    image: ImageView<'_, u8>,
    plan: &K::Plan,
    params: ScanParams,
) -> Vec<MatchCandidate> {
    let (tpl_width, tpl_height) = K::plan_size(plan);
    if image.width() < tpl_width || image.height() < tpl_height {
        return Vec::new();
    }
    let max_x = image.width() - tpl_width;
    let max_y = image.height() - tpl_height;

    let rows: Vec<Vec<MatchCandidate>> = (0..=max_y)
        .into_par_iter()
        .map(|y| {
            (0..=max_x)
                .filter_map(|x| {
                    K::score_at(image, plan, x, y, &params)
                        .filter(|&score| score >= params.min_score)
                        .map(|score| MatchCandidate { x, y, score })
                })
                .collect()
        })
        .collect();

    rows.into_iter().flatten().collect()
}
