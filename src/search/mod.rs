//! Shift estimation by template matching.
//!
//! A template is cut from the reference image and located anywhere in the
//! compared image. The best placement gives the displacement between the two
//! captures; a handful of runner-up peaks are kept so an ambiguous match (a
//! repetitive pattern, a template without prominent features) can be spotted.

use crate::candidate::topk::Peak;
use crate::image::ImageView;
use crate::kernel::scalar::{CcorrScalar, ZnccScalar};
use crate::kernel::{fourier, Kernel, ResponseMap};
use crate::region::{Roi, Shift};
use crate::template::{CcorrPlan, Template, ZnccPlan};
use crate::trace::{trace_event, trace_span};
use crate::util::{ShiftDiffError, ShiftDiffResult};

/// Similarity score used to compare the template with image windows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Metric {
    /// Normalized cross-correlation, `sum(T*I) / sqrt(sum(T^2) * sum(I^2))`.
    #[default]
    Ccorr,
    /// Zero-mean normalized cross-correlation; insensitive to brightness offsets.
    Zncc,
}

/// How the response map is computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Backend {
    /// FFT correlation with integral-image normalization.
    #[default]
    Fourier,
    /// Direct per-placement evaluation.
    Direct,
}

/// Configuration for the shift search.
#[derive(Clone, Debug)]
pub struct MatchConfig {
    /// Similarity metric.
    pub metric: Metric,
    /// Response map computation strategy.
    pub backend: Backend,
    /// Spread direct evaluation across threads (requires the `rayon` feature).
    pub parallel: bool,
    /// Number of distinct candidate placements to report.
    pub topk: usize,
    /// Chebyshev radius within which weaker candidates are suppressed.
    pub nms_radius: usize,
    /// Minimum window variance accepted by ZNCC.
    pub min_var_i: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            metric: Metric::Ccorr,
            backend: Backend::Fourier,
            parallel: false,
            topk: 3,
            nms_radius: 8,
            min_var_i: 1e-8,
        }
    }
}

/// Result of locating the template in the compared image.
#[derive(Clone, Debug, PartialEq)]
pub struct Alignment {
    /// Where the template was cut from the reference image.
    pub template_roi: Roi,
    /// Best placement of the template in the compared image.
    pub best: Peak,
    /// `template origin - best placement`.
    pub shift: Shift,
    /// Distinct candidate placements, strongest first (includes `best`).
    pub candidates: Vec<Peak>,
}

impl Alignment {
    /// Rectangle covered by the template at its best placement.
    pub fn matched_roi(&self) -> Roi {
        Roi::new(
            self.best.x,
            self.best.y,
            self.template_roi.width,
            self.template_roi.height,
        )
    }
}

/// Locates a reference template inside a compared image.
#[derive(Clone, Debug, Default)]
pub struct ShiftFinder {
    cfg: MatchConfig,
}

impl ShiftFinder {
    /// Creates a finder with the given configuration.
    pub fn new(cfg: MatchConfig) -> Self {
        Self { cfg }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Scores every placement of `template` in `image`.
    pub fn response_map(
        &self,
        template: &Template,
        image: ImageView<'_, u8>,
    ) -> ShiftDiffResult<ResponseMap> {
        let cfg = &self.cfg;
        match cfg.metric {
            Metric::Ccorr => {
                let plan = CcorrPlan::from_view(template.view())?;
                match cfg.backend {
                    Backend::Fourier => fourier::ccorr_response(image, &plan),
                    Backend::Direct => direct::<CcorrScalar>(image, &plan, cfg),
                }
            }
            Metric::Zncc => {
                let plan = ZnccPlan::from_view(template.view())?;
                match cfg.backend {
                    Backend::Fourier => fourier::zncc_response(image, &plan, cfg.min_var_i),
                    Backend::Direct => direct::<ZnccScalar>(image, &plan, cfg),
                }
            }
        }
    }

    /// Cuts `template_roi` from `reference` and finds it in `compare`.
    pub fn locate(
        &self,
        reference: ImageView<'_, u8>,
        compare: ImageView<'_, u8>,
        template_roi: Roi,
    ) -> ShiftDiffResult<Alignment> {
        let _span = trace_span!(
            "locate",
            tpl_width = template_roi.width,
            tpl_height = template_roi.height
        )
        .entered();

        let template = Template::cut(reference, template_roi)?;
        let map = self.response_map(&template, compare)?;
        let best = map.best().ok_or(ShiftDiffError::NoMatch)?;
        let mut candidates = map.peaks(self.cfg.topk.max(1), self.cfg.nms_radius);
        if candidates.first() != Some(&best) {
            candidates.insert(0, best);
            candidates.truncate(self.cfg.topk.max(1));
        }
        let shift = Shift::between(template.origin(), (best.x, best.y));

        trace_event!(
            "match_found",
            x = best.x,
            y = best.y,
            score = best.score,
            dx = shift.dx,
            dy = shift.dy
        );

        Ok(Alignment {
            template_roi,
            best,
            shift,
            candidates,
        })
    }
}

#[cfg(feature = "rayon")]
fn direct<K: Kernel>(
    image: ImageView<'_, u8>,
    plan: &K::Plan,
    cfg: &MatchConfig,
) -> ShiftDiffResult<ResponseMap> {
    if cfg.parallel {
        crate::kernel::rayon::response_map_par::<K>(image, plan, cfg.min_var_i)
    } else {
        K::response_map(image, plan, cfg.min_var_i)
    }
}

#[cfg(not(feature = "rayon"))]
fn direct<K: Kernel>(
    image: ImageView<'_, u8>,
    plan: &K::Plan,
    cfg: &MatchConfig,
) -> ShiftDiffResult<ResponseMap> {
    K::response_map(image, plan, cfg.min_var_i)
}

#[cfg(test)]
mod tests {
    use super::{Backend, MatchConfig, Metric, ShiftFinder};
    use crate::region::{Roi, Shift};
    use crate::ImageView;

    fn scene(width: usize, height: usize, ox: usize, oy: usize) -> Vec<u8> {
        (0..width * height)
            .map(|i| {
                let (x, y) = (i % width + ox, i / width + oy);
                (((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF) as u8
            })
            .collect()
    }

    #[test]
    fn locate_recovers_known_shift() {
        // The compared capture sees the scene moved by (+3, -2).
        let reference = scene(64, 48, 10, 10);
        let compare = scene(64, 48, 7, 12);
        let reference = ImageView::from_slice(&reference, 64, 48).unwrap();
        let compare = ImageView::from_slice(&compare, 64, 48).unwrap();

        for metric in [Metric::Ccorr, Metric::Zncc] {
            for backend in [Backend::Fourier, Backend::Direct] {
                let finder = ShiftFinder::new(MatchConfig {
                    metric,
                    backend,
                    ..MatchConfig::default()
                });
                let alignment = finder
                    .locate(reference, compare, Roi::new(20, 15, 12, 14))
                    .unwrap();
                assert_eq!((alignment.best.x, alignment.best.y), (23, 13));
                assert_eq!(alignment.shift, Shift { dx: -3, dy: 2 });
                assert_eq!(alignment.matched_roi(), Roi::new(23, 13, 12, 14));
                assert_eq!(alignment.candidates[0], alignment.best);
            }
        }
    }

    #[test]
    fn locate_rejects_template_outside_reference() {
        let data = scene(16, 16, 0, 0);
        let view = ImageView::from_slice(&data, 16, 16).unwrap();
        let finder = ShiftFinder::default();
        assert!(finder.locate(view, view, Roi::new(10, 10, 8, 8)).is_err());
    }
}
