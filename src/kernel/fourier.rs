//! Frequency-domain kernels that score every placement at once.
//!
//! The correlation numerator `sum(T * I)` for all placements comes from one
//! circular cross-correlation computed with 2D FFTs of image size. Placements
//! that keep the template inside the image never wrap around, so no padding
//! beyond the image itself is needed. Window energies come from integral
//! images, which keeps the cost at `O(W * H * log(W * H))` regardless of the
//! template size.

use crate::kernel::integral::IntegralImage;
use crate::kernel::{response_dims, ResponseMap};
use crate::template::{CcorrPlan, ZnccPlan};
use crate::trace::stage_span;
use crate::util::ShiftDiffResult;
use crate::ImageView;
use rustfft::num_complex::Complex;
use rustfft::{FftDirection, FftPlanner};

/// Scores all placements with normalized cross-correlation.
pub fn ccorr_response(image: ImageView<'_, u8>, plan: &CcorrPlan) -> ShiftDiffResult<ResponseMap> {
    let _span = stage_span!("fourier_ccorr").entered();
    let (tpl_width, tpl_height) = (plan.width(), plan.height());
    let (width, height) = response_dims(image, tpl_width, tpl_height)?;
    let numerators = correlate(image, plan.values(), tpl_width, tpl_height, width, height);
    let integral = IntegralImage::from_view(image);

    let mut scores = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let (_, sum_i2) = integral.window(x, y, tpl_width, tpl_height);
            // Integer sums: anything below one means an all-black window.
            if sum_i2 < 0.5 {
                scores.push(0.0);
                continue;
            }
            let score = numerators[y * width + x] / (plan.energy() * sum_i2).sqrt();
            scores.push(finite_score(score));
        }
    }
    ResponseMap::new(scores, width, height)
}

/// Scores all placements with zero-mean normalized cross-correlation.
pub fn zncc_response(
    image: ImageView<'_, u8>,
    plan: &ZnccPlan,
    min_var_i: f64,
) -> ShiftDiffResult<ResponseMap> {
    let _span = stage_span!("fourier_zncc").entered();
    let (tpl_width, tpl_height) = (plan.width(), plan.height());
    let (width, height) = response_dims(image, tpl_width, tpl_height)?;
    let numerators = correlate(image, plan.zero_mean(), tpl_width, tpl_height, width, height);
    let integral = IntegralImage::from_view(image);
    let n = (tpl_width * tpl_height) as f64;

    let mut scores = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let (sum_i, sum_i2) = integral.window(x, y, tpl_width, tpl_height);
            let var_i = sum_i2 - (sum_i * sum_i) / n;
            if var_i <= min_var_i {
                scores.push(f32::NEG_INFINITY);
                continue;
            }
            let score = numerators[y * width + x] / (plan.var_t() * var_i).sqrt();
            scores.push(finite_score(score));
        }
    }
    ResponseMap::new(scores, width, height)
}

fn finite_score(score: f64) -> f32 {
    if score.is_finite() {
        score.clamp(-1.0, 1.0) as f32
    } else {
        f32::NEG_INFINITY
    }
}

/// Returns `sum(T * I)` for every valid placement, row-major.
fn correlate(
    image: ImageView<'_, u8>,
    template: &[f64],
    tpl_width: usize,
    tpl_height: usize,
    out_width: usize,
    out_height: usize,
) -> Vec<f64> {
    let width = image.width();
    let height = image.height();
    let len = width * height;

    let mut img_buf = vec![Complex::new(0.0f64, 0.0); len];
    for y in 0..height {
        if let Some(row) = image.row(y) {
            for (x, &value) in row.iter().enumerate() {
                img_buf[y * width + x] = Complex::new(value as f64, 0.0);
            }
        }
    }
    let mut tpl_buf = vec![Complex::new(0.0f64, 0.0); len];
    for ty in 0..tpl_height {
        for tx in 0..tpl_width {
            tpl_buf[ty * width + tx] = Complex::new(template[ty * tpl_width + tx], 0.0);
        }
    }

    let mut planner = FftPlanner::new();
    fft2(&mut planner, &mut img_buf, width, height, FftDirection::Forward);
    fft2(&mut planner, &mut tpl_buf, width, height, FftDirection::Forward);
    for (a, b) in img_buf.iter_mut().zip(tpl_buf.iter()) {
        *a *= b.conj();
    }
    fft2(&mut planner, &mut img_buf, width, height, FftDirection::Inverse);

    let scale = 1.0 / len as f64;
    let mut out = Vec::with_capacity(out_width * out_height);
    for y in 0..out_height {
        for x in 0..out_width {
            out.push(img_buf[y * width + x].re * scale);
        }
    }
    out
}

/// In-place unnormalized 2D FFT of a row-major `width x height` buffer.
fn fft2(
    planner: &mut FftPlanner<f64>,
    buf: &mut [Complex<f64>],
    width: usize,
    height: usize,
    direction: FftDirection,
) {
    planner.plan_fft(width, direction).process(buf);

    let mut columns = vec![Complex::new(0.0f64, 0.0); buf.len()];
    transpose(buf, &mut columns, width, height);
    planner.plan_fft(height, direction).process(&mut columns);
    transpose(&columns, buf, height, width);
}

fn transpose(src: &[Complex<f64>], dst: &mut [Complex<f64>], width: usize, height: usize) {
    for y in 0..height {
        for x in 0..width {
            dst[x * height + y] = src[y * width + x];
        }
    }
}
