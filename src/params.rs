//! Live-adjustable inspection parameters.
//!
//! Each parameter is a slider with a fixed maximum; assignments are clamped
//! into `[0, max]` the way a trackbar would.

use crate::region::Roi;
use std::fmt;
use std::str::FromStr;

/// Current value of every slider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Params {
    /// Region compared between both captures, placed in the reference.
    pub reference: Roi,
    /// Feature-rich patch used to find the shift; long along the axis that
    /// moves most.
    pub template: Roi,
    /// Minimum absolute pixel difference counted as a discrepancy.
    pub threshold: u8,
    /// Radius of the square erode/dilate element (`2r+1` wide).
    pub morph_radius: u8,
    /// Regions must enclose more than this many pixels to count as defects.
    pub min_area: u32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            reference: Roi::new(20, 100, 1200, 900),
            template: Roi::new(1085, 100, 100, 300),
            threshold: 50,
            morph_radius: 0,
            min_area: 300,
        }
    }
}

impl Params {
    /// Returns the value of one slider.
    pub fn get(&self, slider: Slider) -> u32 {
        match slider {
            Slider::RefX => saturate(self.reference.x),
            Slider::RefY => saturate(self.reference.y),
            Slider::RefWidth => saturate(self.reference.width),
            Slider::RefHeight => saturate(self.reference.height),
            Slider::TplX => saturate(self.template.x),
            Slider::TplY => saturate(self.template.y),
            Slider::TplWidth => saturate(self.template.width),
            Slider::TplHeight => saturate(self.template.height),
            Slider::Threshold => self.threshold as u32,
            Slider::MorphRadius => self.morph_radius as u32,
            Slider::MinArea => self.min_area,
        }
    }

    /// Sets one slider, clamping to its range; returns the stored value.
    pub fn set(&mut self, slider: Slider, value: u32) -> u32 {
        let value = value.min(slider.max());
        match slider {
            Slider::RefX => self.reference.x = value as usize,
            Slider::RefY => self.reference.y = value as usize,
            Slider::RefWidth => self.reference.width = value as usize,
            Slider::RefHeight => self.reference.height = value as usize,
            Slider::TplX => self.template.x = value as usize,
            Slider::TplY => self.template.y = value as usize,
            Slider::TplWidth => self.template.width = value as usize,
            Slider::TplHeight => self.template.height = value as usize,
            Slider::Threshold => self.threshold = value as u8,
            Slider::MorphRadius => self.morph_radius = value as u8,
            Slider::MinArea => self.min_area = value,
        }
        value
    }

    /// Returns a copy with every slider clamped into its range.
    pub fn clamped(&self) -> Self {
        let mut out = self.clone();
        for slider in Slider::ALL {
            out.set(slider, self.get(slider));
        }
        out
    }
}

fn saturate(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Identifies one adjustable parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slider {
    RefX,
    RefY,
    RefWidth,
    RefHeight,
    TplX,
    TplY,
    TplWidth,
    TplHeight,
    Threshold,
    MorphRadius,
    MinArea,
}

impl Slider {
    /// Every slider in display order.
    pub const ALL: [Slider; 11] = [
        Slider::RefX,
        Slider::RefY,
        Slider::RefWidth,
        Slider::RefHeight,
        Slider::TplX,
        Slider::TplY,
        Slider::TplWidth,
        Slider::TplHeight,
        Slider::Threshold,
        Slider::MorphRadius,
        Slider::MinArea,
    ];

    /// Name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Slider::RefX => "ref-x",
            Slider::RefY => "ref-y",
            Slider::RefWidth => "ref-width",
            Slider::RefHeight => "ref-height",
            Slider::TplX => "tpl-x",
            Slider::TplY => "tpl-y",
            Slider::TplWidth => "tpl-width",
            Slider::TplHeight => "tpl-height",
            Slider::Threshold => "threshold",
            Slider::MorphRadius => "morph-radius",
            Slider::MinArea => "min-area",
        }
    }

    /// Largest accepted value.
    pub fn max(self) -> u32 {
        match self {
            Slider::RefX | Slider::RefWidth | Slider::TplX | Slider::TplWidth => 1400,
            Slider::RefY | Slider::RefHeight | Slider::TplY | Slider::TplHeight => 1000,
            Slider::Threshold => 255,
            Slider::MorphRadius => 50,
            Slider::MinArea => 2000,
        }
    }
}

impl fmt::Display for Slider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a slider name is not recognized.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown slider `{0}`")]
pub struct UnknownSlider(pub String);

impl FromStr for Slider {
    type Err = UnknownSlider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Slider::ALL
            .into_iter()
            .find(|slider| slider.name() == normalized)
            .ok_or_else(|| UnknownSlider(s.to_string()))
    }
}
