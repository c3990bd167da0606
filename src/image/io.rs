//! Conversions to and from the `image` crate, plus file loading and saving.

use crate::image::{ImageView, OwnedImage};
use crate::util::{ShiftDiffError, ShiftDiffResult};
use image::{GrayImage, RgbImage};
use std::path::Path;

/// Creates a borrowed view from a grayscale image buffer.
pub fn view_from_gray_image(img: &GrayImage) -> ShiftDiffResult<ImageView<'_, u8>> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    ImageView::from_slice(img.as_raw(), width, height)
}

/// Creates an owned image from a grayscale image buffer.
pub fn owned_from_gray_image(img: &GrayImage) -> ShiftDiffResult<OwnedImage> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    OwnedImage::new(img.as_raw().clone(), width, height)
}

/// Creates an owned grayscale image from a dynamic image.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> ShiftDiffResult<OwnedImage> {
    let gray = img.to_luma8();
    owned_from_gray_image(&gray)
}

/// Copies a view into an `image::GrayImage`.
pub fn gray_image_from_view(view: ImageView<'_, u8>) -> ShiftDiffResult<GrayImage> {
    let owned = OwnedImage::from_view(view)?;
    let (width, height) = (dim_u32(owned.width())?, dim_u32(owned.height())?);
    GrayImage::from_raw(width, height, owned.into_vec()).ok_or(ShiftDiffError::InvalidDimensions {
        width: width as usize,
        height: height as usize,
    })
}

/// Loads an image from disk and converts it to an 8-bit grayscale owned image.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> ShiftDiffResult<OwnedImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| ShiftDiffError::ImageIo {
        reason: format!("{}: {err}", path.display()),
    })?;
    owned_from_dynamic_image(&img)
}

/// Writes an RGB image to disk; the format follows the file extension.
pub fn save_rgb_image<P: AsRef<Path>>(img: &RgbImage, path: P) -> ShiftDiffResult<()> {
    let path = path.as_ref();
    img.save(path).map_err(|err| ShiftDiffError::ImageIo {
        reason: format!("{}: {err}", path.display()),
    })
}

pub(crate) fn dim_u32(value: usize) -> ShiftDiffResult<u32> {
    u32::try_from(value).map_err(|_| ShiftDiffError::InvalidDimensions {
        width: value,
        height: value,
    })
}
