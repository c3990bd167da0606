//! Scalar reference kernels for score evaluation.

use crate::kernel::Kernel;
use crate::template::{CcorrPlan, ZnccPlan};
use crate::ImageView;

/// Scalar normalized cross-correlation kernel.
pub struct CcorrScalar;

/// Scalar zero-mean normalized cross-correlation kernel.
pub struct ZnccScalar;

fn in_range(
    image: ImageView<'_, u8>,
    tpl_width: usize,
    tpl_height: usize,
    x: usize,
    y: usize,
) -> bool {
    image.width() >= tpl_width
        && image.height() >= tpl_height
        && x <= image.width() - tpl_width
        && y <= image.height() - tpl_height
}

impl Kernel for CcorrScalar {
    type Plan = CcorrPlan;

    fn dims(plan: &Self::Plan) -> (usize, usize) {
        (plan.width(), plan.height())
    }

    fn score_at(
        image: ImageView<'_, u8>,
        tpl: &Self::Plan,
        x: usize,
        y: usize,
        _min_var_i: f64,
    ) -> f32 {
        let tpl_width = tpl.width();
        let tpl_height = tpl.height();
        if !in_range(image, tpl_width, tpl_height, x, y) {
            return f32::NEG_INFINITY;
        }

        let values = tpl.values();
        let mut dot = 0.0f64;
        let mut sum_i2 = 0.0f64;
        for ty in 0..tpl_height {
            let Some(img_row) = image.row(y + ty) else {
                return f32::NEG_INFINITY;
            };
            let base = ty * tpl_width;
            for tx in 0..tpl_width {
                let value = img_row[x + tx] as f64;
                dot += values[base + tx] * value;
                sum_i2 += value * value;
            }
        }

        // A black window correlates with nothing.
        if sum_i2 <= 0.0 {
            return 0.0;
        }
        let score = dot / (tpl.energy() * sum_i2).sqrt();
        if score.is_finite() {
            score.clamp(-1.0, 1.0) as f32
        } else {
            f32::NEG_INFINITY
        }
    }
}

impl Kernel for ZnccScalar {
    type Plan = ZnccPlan;

    fn dims(plan: &Self::Plan) -> (usize, usize) {
        (plan.width(), plan.height())
    }

    fn score_at(
        image: ImageView<'_, u8>,
        tpl: &Self::Plan,
        x: usize,
        y: usize,
        min_var_i: f64,
    ) -> f32 {
        let tpl_width = tpl.width();
        let tpl_height = tpl.height();
        if !in_range(image, tpl_width, tpl_height, x, y) {
            return f32::NEG_INFINITY;
        }

        let t_prime = tpl.zero_mean();
        let n = (tpl_width * tpl_height) as f64;
        let mut dot = 0.0f64;
        let mut sum_i = 0.0f64;
        let mut sum_i2 = 0.0f64;
        for ty in 0..tpl_height {
            let Some(img_row) = image.row(y + ty) else {
                return f32::NEG_INFINITY;
            };
            let base = ty * tpl_width;
            for tx in 0..tpl_width {
                let value = img_row[x + tx] as f64;
                dot += t_prime[base + tx] * value;
                sum_i += value;
                sum_i2 += value * value;
            }
        }

        let var_i = sum_i2 - (sum_i * sum_i) / n;
        if var_i <= min_var_i {
            return f32::NEG_INFINITY;
        }
        let score = dot / (tpl.var_t() * var_i).sqrt();
        if score.is_finite() {
            score.clamp(-1.0, 1.0) as f32
        } else {
            f32::NEG_INFINITY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CcorrScalar, ZnccScalar};
    use crate::kernel::Kernel;
    use crate::template::{CcorrPlan, ZnccPlan};
    use crate::ImageView;

    fn pattern(width: usize, height: usize) -> Vec<u8> {
        (0..width * height)
            .map(|i| {
                let (x, y) = (i % width, i / width);
                (((x * 29) ^ (y * 17) ^ (x * y)) & 0xFF) as u8
            })
            .collect()
    }

    #[test]
    fn ccorr_scores_one_at_true_placement() {
        let data = pattern(24, 20);
        let image = ImageView::from_slice(&data, 24, 20).unwrap();
        let plan = CcorrPlan::from_view(image.roi(6, 4, 8, 7).unwrap()).unwrap();
        let score = CcorrScalar::score_at(image, &plan, 6, 4, 0.0);
        assert!((score - 1.0).abs() < 1e-6, "score {score}");
    }

    #[test]
    fn ccorr_is_invariant_to_gain() {
        let data: Vec<u8> = pattern(16, 16).iter().map(|v| v / 2).collect();
        let brighter: Vec<u8> = data.iter().map(|v| v * 2).collect();
        let tpl_view = ImageView::from_slice(&data, 16, 16).unwrap().roi(2, 2, 6, 6).unwrap();
        let plan = CcorrPlan::from_view(tpl_view).unwrap();
        let image = ImageView::from_slice(&brighter, 16, 16).unwrap();
        let score = CcorrScalar::score_at(image, &plan, 2, 2, 0.0);
        assert!((score - 1.0).abs() < 1e-6, "score {score}");
    }

    #[test]
    fn ccorr_black_window_scores_zero() {
        let data = pattern(8, 8);
        let tpl = ImageView::from_slice(&data, 8, 8).unwrap();
        let plan = CcorrPlan::from_view(tpl.roi(0, 0, 3, 3).unwrap()).unwrap();
        let black = vec![0u8; 64];
        let image = ImageView::from_slice(&black, 8, 8).unwrap();
        assert_eq!(CcorrScalar::score_at(image, &plan, 1, 1, 0.0), 0.0);
    }

    #[test]
    fn zncc_rejects_flat_window() {
        let data = pattern(8, 8);
        let tpl = ImageView::from_slice(&data, 8, 8).unwrap();
        let plan = ZnccPlan::from_view(tpl.roi(0, 0, 3, 3).unwrap()).unwrap();
        let flat = vec![90u8; 64];
        let image = ImageView::from_slice(&flat, 8, 8).unwrap();
        assert_eq!(ZnccScalar::score_at(image, &plan, 0, 0, 1e-8), f32::NEG_INFINITY);
    }

    #[test]
    fn out_of_range_placement_is_rejected() {
        let data = pattern(8, 8);
        let image = ImageView::from_slice(&data, 8, 8).unwrap();
        let plan = CcorrPlan::from_view(image.roi(0, 0, 4, 4).unwrap()).unwrap();
        assert_eq!(CcorrScalar::score_at(image, &plan, 5, 0, 0.0), f32::NEG_INFINITY);
    }
}
