//! Placement rectangles and the shift between two captures.

use crate::util::{ShiftDiffError, ShiftDiffResult};

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Roi {
    /// Left column.
    pub x: usize,
    /// Top row.
    pub y: usize,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

impl Roi {
    /// Creates a rectangle from its top-left corner and size.
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the top-left corner.
    pub fn top_left(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    /// Returns the exclusive bottom-right corner.
    pub fn bottom_right(&self) -> (usize, usize) {
        (self.x + self.width, self.y + self.height)
    }

    /// Returns `true` if the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns `true` if the rectangle lies entirely within `width x height`.
    pub fn fits_in(&self, width: usize, height: usize) -> bool {
        !self.is_empty()
            && self.x.checked_add(self.width).is_some_and(|end| end <= width)
            && self.y.checked_add(self.height).is_some_and(|end| end <= height)
    }

    /// Moves the rectangle against `shift`, mapping a reference placement
    /// onto the compared image.
    pub fn translate(&self, shift: Shift) -> ShiftDiffResult<Roi> {
        let out_of_image = ShiftDiffError::ShiftedRoiOutOfImage {
            x: self.x,
            y: self.y,
            dx: shift.dx,
            dy: shift.dy,
        };
        let x = offset(self.x, -shift.dx).ok_or_else(|| out_of_image.clone())?;
        let y = offset(self.y, -shift.dy).ok_or(out_of_image)?;
        Ok(Roi::new(x, y, self.width, self.height))
    }
}

fn offset(base: usize, delta: i64) -> Option<usize> {
    let base = i64::try_from(base).ok()?;
    usize::try_from(base.checked_add(delta)?).ok()
}

/// Displacement of the reference content relative to the compared image.
///
/// Computed as `template_origin - match_location`, so a reference point
/// `p` is found at `p - shift` in the compared image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Shift {
    /// Horizontal component in pixels.
    pub dx: i64,
    /// Vertical component in pixels.
    pub dy: i64,
}

impl Shift {
    /// Derives the shift from where the template was cut and where it matched.
    pub fn between(template_origin: (usize, usize), match_location: (usize, usize)) -> Self {
        Self {
            dx: template_origin.0 as i64 - match_location.0 as i64,
            dy: template_origin.1 as i64 - match_location.1 as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Roi, Shift};
    use crate::util::ShiftDiffError;

    #[test]
    fn shift_is_origin_minus_match() {
        let shift = Shift::between((1085, 100), (1080, 112));
        assert_eq!(shift, Shift { dx: 5, dy: -12 });
    }

    #[test]
    fn translate_moves_against_shift() {
        let roi = Roi::new(20, 100, 1200, 900);
        let moved = roi.translate(Shift { dx: 5, dy: -12 }).unwrap();
        assert_eq!(moved, Roi::new(15, 112, 1200, 900));
    }

    #[test]
    fn translate_rejects_negative_origin() {
        let roi = Roi::new(3, 0, 10, 10);
        let err = roi.translate(Shift { dx: 4, dy: 0 }).unwrap_err();
        assert_eq!(
            err,
            ShiftDiffError::ShiftedRoiOutOfImage {
                x: 3,
                y: 0,
                dx: 4,
                dy: 0
            }
        );
    }

    #[test]
    fn fits_in_checks_both_axes() {
        assert!(Roi::new(0, 0, 4, 4).fits_in(4, 4));
        assert!(!Roi::new(1, 0, 4, 4).fits_in(4, 4));
        assert!(!Roi::new(0, 0, 0, 4).fits_in(4, 4));
    }
}
