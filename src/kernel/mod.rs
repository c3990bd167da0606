//! Correlation kernel implementations.
//!
//! Every kernel produces a [`ResponseMap`]: one score per valid placement of
//! the template's top-left corner, `(W - w + 1) x (H - h + 1)` in total.

use crate::candidate::nms::nms_2d;
use crate::candidate::topk::{Peak, TopK};
use crate::util::{ShiftDiffError, ShiftDiffResult};
use crate::ImageView;

pub mod fourier;
pub(crate) mod integral;
pub mod scalar;

#[cfg(feature = "rayon")]
pub mod rayon;

/// Kernel trait for per-placement scoring.
pub trait Kernel {
    type Plan: Sync;

    /// Returns the template width and height of a plan.
    fn dims(plan: &Self::Plan) -> (usize, usize);

    /// Computes the score at a single placement (top-left coordinates).
    ///
    /// Returns `f32::NEG_INFINITY` for placements that are out of range or
    /// rejected by `min_var_i`.
    fn score_at(
        image: ImageView<'_, u8>,
        plan: &Self::Plan,
        x: usize,
        y: usize,
        min_var_i: f64,
    ) -> f32;

    /// Scores every valid placement sequentially.
    fn response_map(
        image: ImageView<'_, u8>,
        plan: &Self::Plan,
        min_var_i: f64,
    ) -> ShiftDiffResult<ResponseMap> {
        let (tpl_width, tpl_height) = Self::dims(plan);
        let (width, height) = response_dims(image, tpl_width, tpl_height)?;
        let mut scores = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                scores.push(Self::score_at(image, plan, x, y, min_var_i));
            }
        }
        ResponseMap::new(scores, width, height)
    }
}

/// Returns the size of the response map for a template placed in `image`.
pub(crate) fn response_dims(
    image: ImageView<'_, u8>,
    tpl_width: usize,
    tpl_height: usize,
) -> ShiftDiffResult<(usize, usize)> {
    if image.width() < tpl_width || image.height() < tpl_height {
        return Err(ShiftDiffError::TemplateLargerThanImage {
            tpl_width,
            tpl_height,
            img_width: image.width(),
            img_height: image.height(),
        });
    }
    Ok((
        image.width() - tpl_width + 1,
        image.height() - tpl_height + 1,
    ))
}

/// Dense correlation scores indexed by template placement.
#[derive(Clone, Debug)]
pub struct ResponseMap {
    scores: Vec<f32>,
    width: usize,
    height: usize,
}

impl ResponseMap {
    /// Wraps a row-major score buffer of exactly `width * height` entries.
    pub fn new(scores: Vec<f32>, width: usize, height: usize) -> ShiftDiffResult<Self> {
        if width == 0 || height == 0 || scores.len() != width * height {
            return Err(ShiftDiffError::InvalidDimensions { width, height });
        }
        Ok(Self {
            scores,
            width,
            height,
        })
    }

    /// Number of horizontal placements.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of vertical placements.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row-major score buffer.
    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    /// Returns the maximum score; on ties the first placement in row-major order wins.
    pub fn best(&self) -> Option<Peak> {
        let mut best: Option<Peak> = None;
        for (idx, &score) in self.scores.iter().enumerate() {
            if !score.is_finite() {
                continue;
            }
            if best.is_none_or(|b| score > b.score) {
                best = Some(Peak {
                    x: idx % self.width,
                    y: idx / self.width,
                    score,
                });
            }
        }
        best
    }

    /// Returns up to `k` local maxima at least `nms_radius + 1` apart,
    /// strongest first.
    pub fn peaks(&self, k: usize, nms_radius: usize) -> Vec<Peak> {
        if k == 0 {
            return Vec::new();
        }
        let mut topk = TopK::new(k.saturating_mul(4));
        for y in 0..self.height {
            for x in 0..self.width {
                let score = self.scores[y * self.width + x];
                if score.is_finite() && self.is_local_max(x, y, score) {
                    topk.push(Peak { x, y, score });
                }
            }
        }
        let mut peaks = topk.into_sorted_desc();
        let mut kept = nms_2d(&mut peaks, nms_radius);
        kept.truncate(k);
        kept
    }

    fn is_local_max(&self, x: usize, y: usize, score: f32) -> bool {
        let y0 = y.saturating_sub(1);
        let y1 = (y + 1).min(self.height - 1);
        let x0 = x.saturating_sub(1);
        let x1 = (x + 1).min(self.width - 1);
        for ny in y0..=y1 {
            for nx in x0..=x1 {
                if self.scores[ny * self.width + nx] > score {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::ResponseMap;

    #[test]
    fn best_prefers_first_maximum() {
        let map = ResponseMap::new(vec![0.1, 0.9, 0.3, 0.9, f32::NEG_INFINITY, 0.2], 3, 2).unwrap();
        let best = map.best().unwrap();
        assert_eq!((best.x, best.y), (1, 0));
    }

    #[test]
    fn peaks_are_local_maxima() {
        #[rustfmt::skip]
        let scores = vec![
            0.1, 0.2, 0.1, 0.0, 0.0,
            0.2, 0.9, 0.2, 0.0, 0.5,
            0.1, 0.2, 0.1, 0.0, 0.1,
        ];
        let map = ResponseMap::new(scores, 5, 3).unwrap();
        let peaks = map.peaks(3, 1);
        assert_eq!(peaks.len(), 2);
        assert_eq!((peaks[0].x, peaks[0].y), (1, 1));
        assert_eq!((peaks[1].x, peaks[1].y), (4, 1));
    }

    #[test]
    fn all_invalid_map_has_no_best() {
        let map = ResponseMap::new(vec![f32::NEG_INFINITY; 4], 2, 2).unwrap();
        assert!(map.best().is_none());
        assert!(map.peaks(2, 0).is_empty());
    }
}
