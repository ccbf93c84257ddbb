//! Template statistics precomputed once per match call.

use crate::image::ImageView;
use crate::util::{ScreenMatchError, ScreenMatchResult};

/// Zero-mean template buffer and its variance for ZNCC scoring.
pub struct TemplatePlan {
    width: usize,
    height: usize,
    mean: f64,
    var_t: f64,
    t_prime: Vec<f64>,
}

impl TemplatePlan {
    /// Builds a plan; flat templates are rejected because ZNCC is undefined for them.
    pub fn from_view(tpl: ImageView<'_, u8>) -> ScreenMatchResult<Self> {
        let width = tpl.width();
        let height = tpl.height();
        let count = width
            .checked_mul(height)
            .ok_or(ScreenMatchError::InvalidDimensions { width, height })?;

        let mut sum = 0.0f64;
        for y in 0..height {
            let row = tpl
                .row(y)
                .ok_or(ScreenMatchError::InvalidDimensions { width, height })?;
            sum += row.iter().map(|&v| v as f64).sum::<f64>();
        }
        let mean = sum / count as f64;

        let mut t_prime = Vec::with_capacity(count);
        let mut var_t = 0.0f64;
        for y in 0..height {
            let row = tpl
                .row(y)
                .ok_or(ScreenMatchError::InvalidDimensions { width, height })?;
            for &value in row {
                let centered = value as f64 - mean;
                var_t += centered * centered;
                t_prime.push(centered);
            }
        }

        if var_t / count as f64 <= 1e-8 {
            return Err(ScreenMatchError::DegenerateTemplate {
                reason: "zero variance",
            });
        }

        Ok(Self {
            width,
            height,
            mean,
            var_t,
            t_prime,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sum of squared deviations from the mean.
    pub fn var_t(&self) -> f64 {
        self.var_t
    }

    /// Zero-mean template values in row-major order.
    pub fn t_prime(&self) -> &[f64] {
        &self.t_prime
    }
}

/// Raw template values for SSD scoring.
pub struct SsdTemplatePlan {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl SsdTemplatePlan {
    pub fn from_view(tpl: ImageView<'_, u8>) -> ScreenMatchResult<Self> {
        let width = tpl.width();
        let height = tpl.height();
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            let row = tpl
                .row(y)
                .ok_or(ScreenMatchError::InvalidDimensions { width, height })?;
            data.extend(row.iter().map(|&v| v as f64));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }
}
