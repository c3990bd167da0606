//! Serializable summary of an inspection and preview output.

use crate::config::RoiJson;
use serde::Serialize;
use shiftdiff::io::save_rgb_image;
use image::RgbImage;
use shiftdiff::{Inspection, Peak, Previews, ShiftDiffError, ShiftDiffResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const DERIVED_PREVIEWS: [&str; 2] = ["compare.png", "difference.png"];

#[derive(Debug, Serialize)]
pub struct PeakRecord {
    pub x: usize,
    pub y: usize,
    pub score: f32,
}

impl From<Peak> for PeakRecord {
    fn from(value: Peak) -> Self {
        Self {
            x: value.x,
            y: value.y,
            score: value.score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DefectRecord {
    pub index: usize,
    pub area: f64,
    pub bbox: RoiJson,
    pub is_hole: bool,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub best: PeakRecord,
    pub shift: [i64; 2],
    pub candidates: Vec<PeakRecord>,
    pub reference_roi: RoiJson,
    pub compare_roi: RoiJson,
    pub discrepancy_pixels: usize,
    pub contours_total: usize,
    pub defects: Vec<DefectRecord>,
}

impl From<&Inspection> for Report {
    fn from(value: &Inspection) -> Self {
        let alignment = &value.alignment;
        Self {
            best: alignment.best.into(),
            shift: [alignment.shift.dx, alignment.shift.dy],
            candidates: alignment.candidates.iter().copied().map(PeakRecord::from).collect(),
            reference_roi: value.reference_roi.into(),
            compare_roi: value.compare_roi.into(),
            discrepancy_pixels: value.discrepancy_pixels,
            contours_total: value.defects.contours_total(),
            defects: value
                .defects
                .defects
                .iter()
                .map(|d| DefectRecord {
                    index: d.index,
                    area: d.area,
                    bbox: d.bbox.into(),
                    is_hole: d.is_hole,
                })
                .collect(),
        }
    }
}

/// Prints the progress lines shown after every refresh.
pub fn print_summary(inspection: &Inspection, min_area: u32) {
    let alignment = &inspection.alignment;
    println!(
        "match at ({}, {}) score {:.4}; shift ({}, {})",
        alignment.best.x,
        alignment.best.y,
        alignment.best.score,
        alignment.shift.dx,
        alignment.shift.dy
    );
    for (rank, peak) in alignment.candidates.iter().enumerate().skip(1) {
        println!("  runner-up #{rank} at ({}, {}) score {:.4}", peak.x, peak.y, peak.score);
    }
    let roi = inspection.compare_roi;
    println!(
        "compare crop {}x{} at ({}, {})",
        roi.width, roi.height, roi.x, roi.y
    );
    println!("discrepancy pixels = {}", inspection.discrepancy_pixels);
    println!(
        "regions with area > {min_area} = {} (of {} contours)",
        inspection.defects.defects.len(),
        inspection.defects.contours_total()
    );
}

/// Writes the three previews as PNG files into `dir`.
pub fn write_previews(dir: &Path, previews: &Previews) -> ShiftDiffResult<()> {
    create_dir(dir)?;
    save_rgb_image(&previews.reference, dir.join("reference.png"))?;
    save_rgb_image(&previews.compare, dir.join(DERIVED_PREVIEWS[0]))?;
    save_rgb_image(&previews.difference, dir.join(DERIVED_PREVIEWS[1]))?;
    Ok(())
}

/// Writes only the reference preview after a failed refresh and deletes the
/// compare and difference previews left by an earlier run; returns the
/// deleted paths.
pub fn write_reference_only(dir: &Path, reference: &RgbImage) -> ShiftDiffResult<Vec<PathBuf>> {
    create_dir(dir)?;
    save_rgb_image(reference, dir.join("reference.png"))?;
    let mut removed = Vec::new();
    for name in DERIVED_PREVIEWS {
        let path = dir.join(name);
        match fs::remove_file(&path) {
            Ok(()) => removed.push(path),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(io_error(&path, err)),
        }
    }
    Ok(removed)
}

fn create_dir(dir: &Path) -> ShiftDiffResult<()> {
    fs::create_dir_all(dir).map_err(|err| io_error(dir, err))
}

fn io_error(path: &Path, err: std::io::Error) -> ShiftDiffError {
    ShiftDiffError::ImageIo {
        reason: format!("{}: {err}", path.display()),
    }
}
