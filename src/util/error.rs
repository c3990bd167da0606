//! Error types for shiftdiff.

use thiserror::Error;

/// Result alias for shiftdiff operations.
pub type ShiftDiffResult<T> = std::result::Result<T, ShiftDiffError>;

/// Errors that can occur while aligning and diffing images.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ShiftDiffError {
    /// Width or height is zero or overflows the address space.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// The backing buffer cannot hold the requested image.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A region of interest does not fit inside its image.
    #[error(
        "roi {width}x{height} at ({x}, {y}) is outside image {img_width}x{img_height}"
    )]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// The template cannot be placed anywhere inside the searched image.
    #[error(
        "template {tpl_width}x{tpl_height} does not fit in image {img_width}x{img_height}"
    )]
    TemplateLargerThanImage {
        tpl_width: usize,
        tpl_height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// The template carries no signal for the selected metric.
    #[error("degenerate template: {reason}")]
    DegenerateTemplate { reason: &'static str },
    /// No placement produced a finite correlation score.
    #[error("no valid template placement found")]
    NoMatch,
    /// Moving the reference region by the detected shift leaves the image.
    #[error("region at ({x}, {y}) shifted by ({dx}, {dy}) falls outside the image")]
    ShiftedRoiOutOfImage { x: usize, y: usize, dx: i64, dy: i64 },
    /// Two images that must agree in size do not.
    #[error("size mismatch: {left_width}x{left_height} vs {right_width}x{right_height}")]
    SizeMismatch {
        left_width: usize,
        left_height: usize,
        right_width: usize,
        right_height: usize,
    },
    /// A parameter is out of its accepted range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
    /// Loading or saving an image failed.
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
}
