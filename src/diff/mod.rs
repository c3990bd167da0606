//! Pixel differencing and binary cleanup of aligned crops.
//!
//! Thresholding absorbs exposure differences between the two captures;
//! the erode-then-dilate pass removes specks smaller than the structuring
//! element while keeping the extent of larger discrepancies.

use crate::image::io::{gray_image_from_view, owned_from_gray_image};
use crate::image::{ImageView, OwnedImage};
use crate::util::{ShiftDiffError, ShiftDiffResult};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, erode};

/// Value written for pixels that pass the threshold.
pub const FOREGROUND: u8 = 255;

/// Per-pixel absolute difference of two equally sized views.
pub fn abs_diff(a: ImageView<'_, u8>, b: ImageView<'_, u8>) -> ShiftDiffResult<OwnedImage> {
    if a.width() != b.width() || a.height() != b.height() {
        return Err(ShiftDiffError::SizeMismatch {
            left_width: a.width(),
            left_height: a.height(),
            right_width: b.width(),
            right_height: b.height(),
        });
    }

    let mut data = Vec::with_capacity(a.width() * a.height());
    for y in 0..a.height() {
        let (Some(row_a), Some(row_b)) = (a.row(y), b.row(y)) else {
            return Err(ShiftDiffError::InvalidDimensions {
                width: a.width(),
                height: a.height(),
            });
        };
        data.extend(row_a.iter().zip(row_b).map(|(&p, &q)| p.abs_diff(q)));
    }
    OwnedImage::new(data, a.width(), a.height())
}

/// Binary threshold: [`FOREGROUND`] where `p > threshold`, zero elsewhere.
pub fn threshold_binary(img: ImageView<'_, u8>, threshold: u8) -> ShiftDiffResult<OwnedImage> {
    let mut data = Vec::with_capacity(img.width() * img.height());
    for y in 0..img.height() {
        if let Some(row) = img.row(y) {
            data.extend(
                row.iter()
                    .map(|&p| if p > threshold { FOREGROUND } else { 0 }),
            );
        }
    }
    OwnedImage::new(data, img.width(), img.height())
}

/// Erodes then dilates a binary image with a `(2r+1) x (2r+1)` square
/// element centered on each pixel. `radius == 0` returns the input unchanged.
pub fn erode_dilate(img: ImageView<'_, u8>, radius: u8) -> ShiftDiffResult<OwnedImage> {
    if radius == 0 {
        return OwnedImage::from_view(img);
    }
    let gray = gray_image_from_view(img)?;
    let opened = dilate(&erode(&gray, Norm::LInf, radius), Norm::LInf, radius);
    owned_from_gray_image(&opened)
}

/// Counts pixels with a non-zero value.
pub fn count_nonzero(img: ImageView<'_, u8>) -> usize {
    (0..img.height())
        .filter_map(|y| img.row(y))
        .map(|row| row.iter().filter(|&&p| p != 0).count())
        .sum()
}
