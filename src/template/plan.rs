//! Template plan precomputation for correlation metrics.

use crate::image::ImageView;
use crate::util::{ShiftDiffError, ShiftDiffResult};

/// Precomputed buffer and energy for normalized cross-correlation.
pub struct CcorrPlan {
    width: usize,
    height: usize,
    energy: f64,
    values: Vec<f64>,
}

impl CcorrPlan {
    /// Builds a plan from a template view.
    pub fn from_view(tpl: ImageView<'_, u8>) -> ShiftDiffResult<Self> {
        let values = collect_values(tpl)?;
        let energy: f64 = values.iter().map(|v| v * v).sum();
        if energy <= 0.0 {
            return Err(ShiftDiffError::DegenerateTemplate {
                reason: "all-zero template",
            });
        }

        Ok(Self {
            width: tpl.width(),
            height: tpl.height(),
            energy,
            values,
        })
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `sum(T^2)`.
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Returns the template values in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Precomputed statistics and zero-mean buffer for ZNCC.
pub struct ZnccPlan {
    width: usize,
    height: usize,
    mean: f64,
    var_t: f64,
    zero_mean: Vec<f64>,
}

impl ZnccPlan {
    /// Builds a plan from a template view.
    pub fn from_view(tpl: ImageView<'_, u8>) -> ShiftDiffResult<Self> {
        let mut zero_mean = collect_values(tpl)?;
        let count = zero_mean.len() as f64;
        let mean = zero_mean.iter().sum::<f64>() / count;
        for value in zero_mean.iter_mut() {
            *value -= mean;
        }

        let var_t: f64 = zero_mean.iter().map(|v| v * v).sum();
        if var_t <= 1e-8 {
            return Err(ShiftDiffError::DegenerateTemplate {
                reason: "zero variance",
            });
        }

        Ok(Self {
            width: tpl.width(),
            height: tpl.height(),
            mean,
            var_t,
            zero_mean,
        })
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the mean intensity of the template.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Returns `sum((T - mean)^2)`.
    pub fn var_t(&self) -> f64 {
        self.var_t
    }

    /// Returns the zero-mean template buffer in row-major order.
    pub fn zero_mean(&self) -> &[f64] {
        &self.zero_mean
    }
}

fn collect_values(tpl: ImageView<'_, u8>) -> ShiftDiffResult<Vec<f64>> {
    let mut values = Vec::with_capacity(tpl.width() * tpl.height());
    for y in 0..tpl.height() {
        let row = tpl.row(y).ok_or(ShiftDiffError::BufferTooSmall {
            needed: y * tpl.stride() + tpl.width(),
            got: tpl.as_slice().len(),
        })?;
        values.extend(row.iter().map(|&v| v as f64));
    }
    Ok(values)
}
