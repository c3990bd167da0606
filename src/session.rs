//! Interactive state: slider edits trigger a full refresh.

use crate::inspect::{Inspection, Inspector, Previews};
use crate::params::{Params, Slider};
use crate::render::RenderStyle;
use crate::util::ShiftDiffResult;
use image::RgbImage;

/// Outcome of one refresh.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Reference preview; available even when the pass failed.
    pub reference_preview: RgbImage,
    /// Inspection with the two remaining previews, or why the pass failed.
    pub result: ShiftDiffResult<Findings>,
}

/// Successful part of a refresh.
#[derive(Clone, Debug)]
pub struct Findings {
    pub inspection: Inspection,
    pub compare_preview: RgbImage,
    pub difference_preview: RgbImage,
}

impl Frame {
    /// Bundles all three previews when the pass succeeded.
    pub fn previews(&self) -> Option<Previews> {
        let findings = self.result.as_ref().ok()?;
        Some(Previews {
            reference: self.reference_preview.clone(),
            compare: findings.compare_preview.clone(),
            difference: findings.difference_preview.clone(),
        })
    }
}

/// An inspector with the current slider values.
pub struct Session {
    inspector: Inspector,
    params: Params,
    style: RenderStyle,
}

impl Session {
    /// Starts a session; parameters are clamped to their slider ranges.
    pub fn new(inspector: Inspector, params: Params, style: RenderStyle) -> Self {
        Self {
            inspector,
            params: params.clamped(),
            style,
        }
    }

    /// Returns the current parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Returns the underlying inspector.
    pub fn inspector(&self) -> &Inspector {
        &self.inspector
    }

    /// Moves a slider and refreshes.
    pub fn set(&mut self, slider: Slider, value: u32) -> ShiftDiffResult<Frame> {
        self.params.set(slider, value);
        self.refresh()
    }

    /// Re-runs the inspection with the current parameters.
    ///
    /// Only a failure to draw the reference preview is returned as an error;
    /// pipeline failures (for instance a shifted region leaving the compared
    /// image) are carried in [`Frame::result`] so the selection can be fixed.
    pub fn refresh(&self) -> ShiftDiffResult<Frame> {
        let reference_preview = self.inspector.render_reference(&self.params, &self.style)?;
        let result = self.inspector.run(&self.params).and_then(|inspection| {
            let (compare_preview, difference_preview) =
                self.inspector.render_findings(&inspection, &self.style)?;
            Ok(Findings {
                inspection,
                compare_preview,
                difference_preview,
            })
        });
        Ok(Frame {
            reference_preview,
            result,
        })
    }
}
