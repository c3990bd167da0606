//! The full align-and-diff pass over a pair of captures.

use crate::defects::{find_defects, DefectSummary};
use crate::diff::{abs_diff, count_nonzero, erode_dilate, threshold_binary};
use crate::image::{ImageView, OwnedImage};
use crate::params::Params;
use crate::region::Roi;
use crate::render::{
    render_compare_preview, render_difference, render_reference_preview, RenderStyle,
};
use crate::search::{Alignment, MatchConfig, ShiftFinder};
use crate::trace::{stage_span, trace_event, trace_span};
use crate::util::{ShiftDiffError, ShiftDiffResult};
use image::RgbImage;

/// Reference and compared captures plus the matching configuration.
pub struct Inspector {
    reference: OwnedImage,
    compare: OwnedImage,
    finder: ShiftFinder,
}

/// Everything one inspection pass found.
#[derive(Clone, Debug)]
pub struct Inspection {
    /// Template match and the resulting shift.
    pub alignment: Alignment,
    /// Region compared in the reference capture.
    pub reference_roi: Roi,
    /// Same region located in the compared capture.
    pub compare_roi: Roi,
    /// Thresholded, erode/dilate filtered difference of both crops.
    pub difference: OwnedImage,
    /// Number of non-zero pixels in `difference`.
    pub discrepancy_pixels: usize,
    /// Traced contours and those above the minimum area.
    pub defects: DefectSummary,
}

/// The three preview images of one refresh.
#[derive(Clone, Debug)]
pub struct Previews {
    /// Reference capture with the selected regions.
    pub reference: RgbImage,
    /// Compared capture with the matched regions.
    pub compare: RgbImage,
    /// Colorized difference with defect contours.
    pub difference: RgbImage,
}

impl Inspector {
    /// Creates an inspector over two grayscale captures.
    pub fn new(reference: OwnedImage, compare: OwnedImage, cfg: MatchConfig) -> Self {
        Self {
            reference,
            compare,
            finder: ShiftFinder::new(cfg),
        }
    }

    /// Returns the reference capture.
    pub fn reference(&self) -> ImageView<'_, u8> {
        self.reference.view()
    }

    /// Returns the compared capture.
    pub fn compare(&self) -> ImageView<'_, u8> {
        self.compare.view()
    }

    /// Returns the matching configuration.
    pub fn match_config(&self) -> &MatchConfig {
        self.finder.config()
    }

    /// Aligns the captures and extracts defects for one parameter set.
    pub fn run(&self, params: &Params) -> ShiftDiffResult<Inspection> {
        let _span = trace_span!("inspect").entered();
        if params.reference.is_empty() {
            return Err(ShiftDiffError::InvalidParameter("reference region is empty"));
        }
        if params.template.is_empty() {
            return Err(ShiftDiffError::InvalidParameter("template region is empty"));
        }

        let reference = self.reference.view();
        let compare = self.compare.view();

        let alignment = self.finder.locate(reference, compare, params.template)?;
        let reference_roi = params.reference;
        let compare_roi = reference_roi.translate(alignment.shift)?;
        trace_event!(
            "crop",
            x = compare_roi.x,
            y = compare_roi.y,
            width = compare_roi.width,
            height = compare_roi.height
        );

        let difference = {
            let _stage = stage_span!("difference", threshold = params.threshold).entered();
            let raw = abs_diff(reference.crop(reference_roi)?, compare.crop(compare_roi)?)?;
            threshold_binary(raw.view(), params.threshold)?
        };
        let difference = {
            let _stage = stage_span!("erode_dilate", radius = params.morph_radius).entered();
            erode_dilate(difference.view(), params.morph_radius)?
        };

        let discrepancy_pixels = count_nonzero(difference.view());
        trace_event!("discrepancy", pixels = discrepancy_pixels);

        let defects = find_defects(difference.view(), params.min_area as f64)?;
        trace_event!(
            "defects",
            contours = defects.contours_total(),
            above_min_area = defects.defects.len()
        );

        Ok(Inspection {
            alignment,
            reference_roi,
            compare_roi,
            difference,
            discrepancy_pixels,
            defects,
        })
    }

    /// Draws the reference preview; needs only the parameters.
    pub fn render_reference(
        &self,
        params: &Params,
        style: &RenderStyle,
    ) -> ShiftDiffResult<RgbImage> {
        render_reference_preview(self.reference.view(), params.reference, params.template, style)
    }

    /// Draws the compared-capture and difference previews of an inspection.
    pub fn render_findings(
        &self,
        inspection: &Inspection,
        style: &RenderStyle,
    ) -> ShiftDiffResult<(RgbImage, RgbImage)> {
        let compare = render_compare_preview(
            self.compare.view(),
            inspection.compare_roi,
            inspection.alignment.matched_roi(),
            style,
        )?;
        let difference =
            render_difference(inspection.difference.view(), &inspection.defects, style)?;
        Ok((compare, difference))
    }

    /// Draws all three previews for a finished inspection.
    pub fn render(
        &self,
        params: &Params,
        inspection: &Inspection,
        style: &RenderStyle,
    ) -> ShiftDiffResult<Previews> {
        let (compare, difference) = self.render_findings(inspection, style)?;
        Ok(Previews {
            reference: self.render_reference(params, style)?,
            compare,
            difference,
        })
    }
}
