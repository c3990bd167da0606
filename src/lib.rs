//! ShiftDiff aligns two captures of the same scene and highlights what changed.
//!
//! A template cut from the reference capture is located in the compared
//! capture with normalized cross-correlation; the resulting shift aligns a
//! region of both captures, whose thresholded and morphologically cleaned
//! difference is split into contiguous defect regions. [`Session`] re-runs
//! that pass whenever a parameter slider moves.

pub mod defects;
pub mod diff;
pub mod image;
pub mod inspect;
pub mod kernel;
pub mod params;
pub mod region;
pub mod render;
pub mod search;
pub mod session;
pub mod template;
mod candidate;
mod trace;
pub mod util;

pub use crate::image::io;
pub use crate::image::{ImageView, OwnedImage};
pub use candidate::nms::nms_2d;
pub use candidate::topk::{Peak, TopK};
pub use defects::{Defect, DefectSummary};
pub use inspect::{Inspection, Inspector, Previews};
pub use kernel::{Kernel, ResponseMap};
pub use params::{Params, Slider, UnknownSlider};
pub use region::{Roi, Shift};
pub use render::RenderStyle;
pub use search::{Alignment, Backend, MatchConfig, Metric, ShiftFinder};
pub use session::{Findings, Frame, Session};
pub use template::Template;
pub use util::{ShiftDiffError, ShiftDiffResult};
