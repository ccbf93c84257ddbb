//! Scalar reference kernels.

use crate::kernel::{normalize_score, placement_fits, Kernel, ScanParams};
use crate::template::{SsdTemplatePlan, TemplatePlan};
use crate::ImageView;

/// Zero-mean normalized cross-correlation; negative correlation scores 0.
pub(crate) struct ZnccScalar;

/// Sum of squared differences mapped to `1 - sse / max_sse`.
pub(crate) struct SsdScalar;

impl Kernel for ZnccScalar {
    type Plan = TemplatePlan;

    fn plan_size(plan: &Self::Plan) -> (usize, usize) {
        (plan.width(), plan.height())
    }

    fn score_at(
        image: ImageView<'_, u8>,
        tpl: &Self::Plan,
        x: usize,
        y: usize,
        params: &ScanParams,
    ) -> Option<f32> {
        let tpl_width = tpl.width();
        let tpl_height = tpl.height();
        if !placement_fits(image, tpl_width, tpl_height, x, y) {
            return None;
        }

        let t_prime = tpl.t_prime();
        let n = (tpl_width * tpl_height) as f64;

        let mut dot = 0.0f64;
        let mut sum_i = 0.0f64;
        let mut sum_i2 = 0.0f64;
        for ty in 0..tpl_height {
            let img_row = &image.row(y + ty)?[x..x + tpl_width];
            let tpl_row = &t_prime[ty * tpl_width..(ty + 1) * tpl_width];
            for (&t, &value) in tpl_row.iter().zip(img_row) {
                let value = value as f64;
                dot += t * value;
                sum_i += value;
                sum_i2 += value * value;
            }
        }

        let var_i = sum_i2 - (sum_i * sum_i) / n;
        if var_i <= params.min_var_i {
            return None;
        }
        normalize_score(dot / (tpl.var_t() * var_i).sqrt())
    }
}

impl Kernel for SsdScalar {
    type Plan = SsdTemplatePlan;

    fn plan_size(plan: &Self::Plan) -> (usize, usize) {
        (plan.width(), plan.height())
    }

    fn score_at(
        image: ImageView<'_, u8>,
        tpl: &Self::Plan,
        x: usize,
        y: usize,
        _params: &ScanParams,
    ) -> Option<f32> {
        let tpl_width = tpl.width();
        let tpl_height = tpl.height();
        if !placement_fits(image, tpl_width, tpl_height, x, y) {
            return None;
        }

        let data = tpl.data();
        let mut sse = 0.0f64;
        for ty in 0..tpl_height {
            let img_row = &image.row(y + ty)?[x..x + tpl_width];
            let tpl_row = &data[ty * tpl_width..(ty + 1) * tpl_width];
            for (&t, &value) in tpl_row.iter().zip(img_row) {
                let diff = value as f64 - t;
                sse += diff * diff;
            }
        }

        let max_sse = (tpl_width * tpl_height) as f64 * 255.0 * 255.0;
        normalize_score(1.0 - sse / max_sse)
    }
}
