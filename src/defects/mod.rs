//! Contiguous discrepancy regions in a binary difference image.
//!
//! Contours are traced with border following over the full hierarchy, so
//! both outer borders and hole borders are reported. Only contours whose
//! enclosed polygon area is strictly greater than the minimum count as
//! defects.
//!
//! The binary image is traced inside a one-pixel background frame so that
//! regions touching the crop border close like any other region.

use crate::image::io::dim_u32;
use crate::image::ImageView;
use crate::region::Roi;
use crate::trace::stage_span;
use crate::util::ShiftDiffResult;
use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;

/// A traced contour that passed the area filter.
#[derive(Clone, Debug, PartialEq)]
pub struct Defect {
    /// Index of the contour among all traced contours.
    pub index: usize,
    /// Border pixels in tracing order.
    pub points: Vec<Point<i32>>,
    /// Polygon area enclosed by `points`.
    pub area: f64,
    /// Smallest rectangle containing every border pixel.
    pub bbox: Roi,
    /// `true` when the contour bounds a hole inside another region.
    pub is_hole: bool,
    /// Index of the enclosing contour, if any.
    pub parent: Option<usize>,
}

/// Every traced contour plus the ones kept as defects.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DefectSummary {
    /// Border points of all traced contours, in tracing order.
    pub contours: Vec<Vec<Point<i32>>>,
    /// Contours with `area > min_area`.
    pub defects: Vec<Defect>,
}

impl DefectSummary {
    /// Number of traced contours before filtering.
    pub fn contours_total(&self) -> usize {
        self.contours.len()
    }
}

/// Traces contours in `binary` (non-zero is foreground) and keeps those
/// enclosing more than `min_area` pixels.
pub fn find_defects(binary: ImageView<'_, u8>, min_area: f64) -> ShiftDiffResult<DefectSummary> {
    let _span = stage_span!("find_defects").entered();
    let framed = framed_binary(binary)?;
    let traced = find_contours::<i32>(&framed);

    let mut summary = DefectSummary::default();
    for (index, contour) in traced.into_iter().enumerate() {
        let points: Vec<Point<i32>> = contour
            .points
            .iter()
            .map(|p| Point::new(p.x - 1, p.y - 1))
            .collect();
        let area = polygon_area(&points);
        if area > min_area {
            summary.defects.push(Defect {
                index,
                bbox: bounding_box(&points),
                points: points.clone(),
                area,
                is_hole: contour.border_type == BorderType::Hole,
                parent: contour.parent,
            });
        }
        summary.contours.push(points);
    }
    Ok(summary)
}

/// Copies `binary` into the interior of a zero-filled `(w + 2) x (h + 2)` image.
fn framed_binary(binary: ImageView<'_, u8>) -> ShiftDiffResult<GrayImage> {
    let width = dim_u32(binary.width() + 2)?;
    let height = dim_u32(binary.height() + 2)?;
    let mut framed = GrayImage::new(width, height);
    for y in 0..binary.height() {
        let Some(row) = binary.row(y) else {
            continue;
        };
        for (x, &v) in row.iter().enumerate() {
            if v != 0 {
                framed.put_pixel(x as u32 + 1, y as u32 + 1, Luma([v]));
            }
        }
    }
    Ok(framed)
}

/// Unsigned area of the polygon through `points` (shoelace formula).
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0i64;
    for (i, p) in points.iter().enumerate() {
        let q = &points[(i + 1) % points.len()];
        twice_area += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
    }
    twice_area.abs() as f64 / 2.0
}

fn bounding_box(points: &[Point<i32>]) -> Roi {
    let Some(first) = points.first() else {
        return Roi::default();
    };
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Roi::new(
        min_x.max(0) as usize,
        min_y.max(0) as usize,
        (max_x - min_x + 1) as usize,
        (max_y - min_y + 1) as usize,
    )
}

#[cfg(test)]
mod tests {
    use super::{find_defects, polygon_area};
    use crate::region::Roi;
    use crate::ImageView;
    use imageproc::point::Point;

    fn blank(width: usize, height: usize) -> Vec<u8> {
        vec![0u8; width * height]
    }

    fn fill(img: &mut [u8], width: usize, roi: Roi) {
        for y in roi.y..roi.y + roi.height {
            for x in roi.x..roi.x + roi.width {
                img[y * width + x] = 255;
            }
        }
    }

    #[test]
    fn polygon_area_of_square_border() {
        let square = [
            Point::new(0, 0),
            Point::new(9, 0),
            Point::new(9, 9),
            Point::new(0, 9),
        ];
        assert_eq!(polygon_area(&square), 81.0);
        assert_eq!(polygon_area(&square[..2]), 0.0);
    }

    #[test]
    fn small_regions_are_filtered_out() {
        let mut img = blank(40, 30);
        fill(&mut img, 40, Roi::new(2, 2, 3, 3));
        fill(&mut img, 40, Roi::new(15, 10, 12, 11));
        let view = ImageView::from_slice(&img, 40, 30).unwrap();

        let summary = find_defects(view, 20.0).unwrap();
        assert_eq!(summary.contours_total(), 2);
        assert_eq!(summary.defects.len(), 1);
        let defect = &summary.defects[0];
        assert_eq!(defect.bbox, Roi::new(15, 10, 12, 11));
        assert_eq!(defect.area, 110.0);
        assert!(!defect.is_hole);
    }

    #[test]
    fn area_filter_is_strict() {
        let mut img = blank(20, 20);
        fill(&mut img, 20, Roi::new(5, 5, 5, 5));
        let view = ImageView::from_slice(&img, 20, 20).unwrap();
        assert!(find_defects(view, 16.0).unwrap().defects.is_empty());
        assert_eq!(find_defects(view, 15.9).unwrap().defects.len(), 1);
    }

    #[test]
    fn holes_are_reported() {
        let mut img = blank(30, 30);
        fill(&mut img, 30, Roi::new(2, 2, 20, 20));
        for y in 8..16 {
            for x in 8..16 {
                img[y * 30 + x] = 0;
            }
        }
        let view = ImageView::from_slice(&img, 30, 30).unwrap();
        let summary = find_defects(view, 10.0).unwrap();
        assert_eq!(summary.contours_total(), 2);
        assert!(summary.defects.iter().any(|d| d.is_hole && d.parent.is_some()));
    }

    #[test]
    fn full_foreground_is_one_region() {
        let img = vec![255u8; 20 * 20];
        let view = ImageView::from_slice(&img, 20, 20).unwrap();
        let summary = find_defects(view, 10.0).unwrap();
        assert_eq!(summary.contours_total(), 1);
        let defect = &summary.defects[0];
        assert!(!defect.is_hole);
        assert_eq!(defect.bbox, Roi::new(0, 0, 20, 20));
        assert_eq!(defect.area, 361.0);
    }

    #[test]
    fn full_width_band_is_one_region() {
        let mut img = blank(20, 20);
        fill(&mut img, 20, Roi::new(0, 6, 20, 4));
        let view = ImageView::from_slice(&img, 20, 20).unwrap();
        let summary = find_defects(view, 10.0).unwrap();
        assert_eq!(summary.contours_total(), 1);
        let defect = &summary.defects[0];
        assert!(!defect.is_hole);
        assert_eq!(defect.bbox, Roi::new(0, 6, 20, 4));
        assert_eq!(defect.area, 57.0);
    }

    #[test]
    fn region_on_three_borders_has_outer_border() {
        let mut img = blank(20, 20);
        fill(&mut img, 20, Roi::new(0, 0, 20, 10));
        let view = ImageView::from_slice(&img, 20, 20).unwrap();
        let summary = find_defects(view, 10.0).unwrap();
        assert_eq!(summary.contours_total(), 1);
        let defect = &summary.defects[0];
        assert!(!defect.is_hole);
        assert_eq!(defect.bbox, Roi::new(0, 0, 20, 10));
        assert_eq!(defect.area, 171.0);
    }

    #[test]
    fn full_foreground_with_hole_keeps_both_borders() {
        let mut img = vec![255u8; 20 * 20];
        for y in 8..12 {
            for x in 8..12 {
                img[y * 20 + x] = 0;
            }
        }
        let view = ImageView::from_slice(&img, 20, 20).unwrap();
        let summary = find_defects(view, 0.0).unwrap();
        assert_eq!(summary.contours_total(), 2);
        let outer = summary.defects.iter().find(|d| !d.is_hole).unwrap();
        assert_eq!(outer.bbox, Roi::new(0, 0, 20, 20));
        assert_eq!(outer.parent, None);
        let hole = summary.defects.iter().find(|d| d.is_hole).unwrap();
        assert_eq!(hole.parent, Some(outer.index));
    }
}
