//! Template storage and planning utilities.

use crate::image::{ImageView, OwnedImage};
use crate::region::Roi;
use crate::util::ShiftDiffResult;

mod plan;

pub use plan::{CcorrPlan, ZnccPlan};

/// Owned template patch in contiguous grayscale format.
#[derive(Clone, Debug)]
pub struct Template {
    img: OwnedImage,
    origin: (usize, usize),
}

impl Template {
    /// Creates a template from a contiguous grayscale buffer placed at the origin.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> ShiftDiffResult<Self> {
        let img = OwnedImage::new(data, width, height)?;
        Ok(Self {
            img,
            origin: (0, 0),
        })
    }

    /// Cuts the template out of `source` at `roi`, remembering where it came from.
    pub fn cut(source: ImageView<'_, u8>, roi: Roi) -> ShiftDiffResult<Self> {
        let img = OwnedImage::from_view(source.crop(roi)?)?;
        Ok(Self {
            img,
            origin: roi.top_left(),
        })
    }

    /// Returns a borrowed view of the template data.
    pub fn view(&self) -> ImageView<'_, u8> {
        self.img.view()
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.img.width()
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.img.height()
    }

    /// Returns the top-left corner the template was cut from.
    pub fn origin(&self) -> (usize, usize) {
        self.origin
    }
}
