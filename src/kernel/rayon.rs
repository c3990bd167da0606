//! Rayon-parallel scans (feature-gated).
//!
//! Rows of the response map are scored independently, so any scalar kernel
//! can be spread across threads without changing its results.

use crate::kernel::{response_dims, Kernel, ResponseMap};
use crate::util::ShiftDiffResult;
use crate::ImageView;
use rayon::prelude::*;

/// Row-parallel equivalent of [`Kernel::response_map`].
pub fn response_map_par<K: Kernel>(
    image: ImageView<'_, u8>,
    plan: &K::Plan,
    min_var_i: f64,
) -> ShiftDiffResult<ResponseMap> {
    let (tpl_width, tpl_height) = K::dims(plan);
    let (width, height) = response_dims(image, tpl_width, tpl_height)?;

    let rows: Vec<Vec<f32>> = (0..height)
        .into_par_iter()
        .map(|y| {
            (0..width)
                .map(|x| K::score_at(image, plan, x, y, min_var_i))
                .collect()
        })
        .collect();

    ResponseMap::new(rows.concat(), width, height)
}
