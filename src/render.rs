//! Preview images for the three inspection views.
//!
//! Previews are always drawn on fresh RGB copies, so the source captures
//! never need to be restored between refreshes.

use crate::defects::DefectSummary;
use crate::image::io::dim_u32;
use crate::image::ImageView;
use crate::region::Roi;
use crate::util::ShiftDiffResult;
use image::RgbImage;
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use image::Rgb;

/// Line widths, colors and palette seed used for previews.
#[derive(Clone, Debug)]
pub struct RenderStyle {
    /// Outline color of the reference and template rectangles.
    pub highlight: Rgb<u8>,
    /// Outline width of the reference region.
    pub region_width: u32,
    /// Outline width of the template region.
    pub template_width: u32,
    /// Stroke width of defect contours.
    pub contour_width: u32,
    /// Seed of the contour color sequence.
    pub palette_seed: u64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            highlight: Rgb([0, 0, 255]),
            region_width: 2,
            template_width: 8,
            contour_width: 6,
            palette_seed: 12345,
        }
    }
}

/// Reference capture with its reference region and template region outlined.
pub fn render_reference_preview(
    reference: ImageView<'_, u8>,
    region: Roi,
    template: Roi,
    style: &RenderStyle,
) -> ShiftDiffResult<RgbImage> {
    let mut canvas = to_rgb(reference)?;
    draw_thick_rect(&mut canvas, region, style.region_width, style.highlight);
    draw_thick_rect(&mut canvas, template, style.template_width, style.highlight);
    Ok(canvas)
}

/// Compared capture with the shifted reference region and matched template outlined.
pub fn render_compare_preview(
    compare: ImageView<'_, u8>,
    region: Roi,
    matched: Roi,
    style: &RenderStyle,
) -> ShiftDiffResult<RgbImage> {
    let mut canvas = to_rgb(compare)?;
    draw_thick_rect(&mut canvas, region, style.region_width, style.highlight);
    draw_thick_rect(&mut canvas, matched, style.template_width, style.highlight);
    Ok(canvas)
}

/// Binary difference image with every defect contour stroked in its own color.
///
/// Colors are drawn from a seeded sequence that advances once per traced
/// contour, including the ones filtered out, so a contour keeps its color
/// while the minimum area changes.
pub fn render_difference(
    binary: ImageView<'_, u8>,
    summary: &DefectSummary,
    style: &RenderStyle,
) -> ShiftDiffResult<RgbImage> {
    let mut canvas = to_rgb(binary)?;
    let mut rng = StdRng::seed_from_u64(style.palette_seed);
    let width = style.contour_width.max(1);
    let before = ((width - 1) / 2) as i32;

    let mut defects = summary.defects.iter().peekable();
    for index in 0..summary.contours_total() {
        let color = Rgb([
            rng.random_range(0..=255u8),
            rng.random_range(0..=255u8),
            rng.random_range(0..=255u8),
        ]);
        let Some(defect) = defects.next_if(|d| d.index == index) else {
            continue;
        };
        for p in &defect.points {
            let stamp = Rect::at(p.x - before, p.y - before).of_size(width, width);
            draw_filled_rect_mut(&mut canvas, stamp, color);
        }
    }
    Ok(canvas)
}

fn to_rgb(view: ImageView<'_, u8>) -> ShiftDiffResult<RgbImage> {
    let width = dim_u32(view.width())?;
    let height = dim_u32(view.height())?;
    Ok(RgbImage::from_fn(width, height, |x, y| {
        let v = view.get(x as usize, y as usize).copied().unwrap_or(0);
        Rgb([v, v, v])
    }))
}

/// Outlines `roi` with a band `width` pixels wide, centered on its border.
fn draw_thick_rect(canvas: &mut RgbImage, roi: Roi, width: u32, color: Rgb<u8>) {
    if roi.is_empty() {
        return;
    }
    let half = (width / 2) as i64;
    for i in 0..width.max(1) as i64 {
        let inset = i - half;
        let w = roi.width as i64 - 2 * inset;
        let h = roi.height as i64 - 2 * inset;
        if w <= 0 || h <= 0 {
            break;
        }
        let (Ok(x), Ok(y), Ok(w), Ok(h)) = (
            i32::try_from(roi.x as i64 + inset),
            i32::try_from(roi.y as i64 + inset),
            u32::try_from(w),
            u32::try_from(h),
        ) else {
            continue;
        };
        draw_hollow_rect_mut(canvas, Rect::at(x, y).of_size(w, h), color);
    }
}
