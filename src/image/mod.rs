//! Image views and owned grayscale buffers.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows. ROI slices are zero-copy
//! views into the same backing slice and retain the original stride; they are
//! how both the reference and the compared image get cropped.

use crate::region::Roi;
use crate::util::{ShiftDiffError, ShiftDiffResult};

pub mod io;

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> ShiftDiffResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> ShiftDiffResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(ShiftDiffError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }

    /// Returns a zero-copy view of `roi`.
    pub fn crop(&self, roi: Roi) -> ShiftDiffResult<ImageView<'a, T>> {
        self.roi(roi.x, roi.y, roi.width, roi.height)
    }

    /// Returns a zero-copy ROI view into the same backing buffer.
    pub fn roi(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> ShiftDiffResult<ImageView<'a, T>> {
        if width == 0 || height == 0 {
            return Err(ShiftDiffError::InvalidDimensions { width, height });
        }

        let out_of_bounds = ShiftDiffError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width: self.width,
            img_height: self.height,
        };
        let end_x = x.checked_add(width).ok_or_else(|| out_of_bounds.clone())?;
        let end_y = y.checked_add(height).ok_or_else(|| out_of_bounds.clone())?;
        if end_x > self.width || end_y > self.height {
            return Err(out_of_bounds);
        }

        let start = y
            .checked_mul(self.stride)
            .and_then(|v| v.checked_add(x))
            .ok_or(ShiftDiffError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })?;
        let data = self
            .data
            .get(start..)
            .ok_or(ShiftDiffError::BufferTooSmall {
                needed: start.saturating_add(1),
                got: self.data.len(),
            })?;

        ImageView::new(data, width, height, self.stride)
    }
}

/// Owned contiguous grayscale image buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Wraps a contiguous row-major buffer of exactly `width * height` pixels.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> ShiftDiffResult<Self> {
        let needed = required_len(width, height, width)?;
        if data.len() < needed {
            return Err(ShiftDiffError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(ShiftDiffError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates an image of the given size filled with `value`.
    pub fn filled(width: usize, height: usize, value: u8) -> ShiftDiffResult<Self> {
        let needed = required_len(width, height, width)?;
        Self::new(vec![value; needed], width, height)
    }

    /// Copies a (possibly strided) view into a new contiguous image.
    pub fn from_view(view: ImageView<'_, u8>) -> ShiftDiffResult<Self> {
        let width = view.width();
        let height = view.height();
        let mut data = Vec::with_capacity(required_len(width, height, width)?);
        for y in 0..height {
            let row = view.row(y).ok_or(ShiftDiffError::BufferTooSmall {
                needed: y * view.stride() + width,
                got: view.as_slice().len(),
            })?;
            data.extend_from_slice(row);
        }
        Self::new(data, width, height)
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the contiguous row-major pixel buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the image and returns its pixel buffer.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> ShiftDiffResult<usize> {
    if width == 0 || height == 0 {
        return Err(ShiftDiffError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(ShiftDiffError::InvalidStride { width, stride });
    }
    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(ShiftDiffError::InvalidDimensions { width, height })?;
    Ok(needed)
}

#[cfg(test)]
mod tests {
    use super::{ImageView, OwnedImage};
    use crate::region::Roi;

    #[test]
    fn from_view_compacts_strided_rows() {
        let data: Vec<u8> = (0u8..20).collect();
        let view = ImageView::new(&data, 3, 4, 5).unwrap();
        let owned = OwnedImage::from_view(view).unwrap();
        assert_eq!(owned.width(), 3);
        assert_eq!(owned.height(), 4);
        assert_eq!(owned.data(), &[0, 1, 2, 5, 6, 7, 10, 11, 12, 15, 16, 17]);
    }

    #[test]
    fn crop_uses_roi_placement() {
        let data: Vec<u8> = (0u8..25).collect();
        let view = ImageView::from_slice(&data, 5, 5).unwrap();
        let crop = view.crop(Roi::new(2, 1, 2, 3)).unwrap();
        assert_eq!(crop.row(0).unwrap(), &[7, 8]);
        assert_eq!(crop.row(2).unwrap(), &[17, 18]);
    }

    #[test]
    fn owned_image_rejects_oversized_buffer() {
        assert!(OwnedImage::new(vec![0u8; 5], 2, 2).is_err());
    }
}
