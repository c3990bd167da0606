//! Summed-area tables of pixel values and squared pixel values.

use crate::ImageView;

/// Integral images used to get window sums in constant time.
pub(crate) struct IntegralImage {
    stride: usize,
    sum: Vec<f64>,
    sum_sq: Vec<f64>,
}

impl IntegralImage {
    pub(crate) fn from_view(image: ImageView<'_, u8>) -> Self {
        let width = image.width();
        let height = image.height();
        let stride = width + 1;
        let mut sum = vec![0.0f64; stride * (height + 1)];
        let mut sum_sq = vec![0.0f64; stride * (height + 1)];

        for y in 0..height {
            let row = image.row(y).unwrap_or(&[]);
            let mut row_sum = 0.0f64;
            let mut row_sum_sq = 0.0f64;
            for (x, &value) in row.iter().enumerate() {
                let v = value as f64;
                row_sum += v;
                row_sum_sq += v * v;
                let idx = (y + 1) * stride + x + 1;
                sum[idx] = sum[idx - stride] + row_sum;
                sum_sq[idx] = sum_sq[idx - stride] + row_sum_sq;
            }
        }

        Self {
            stride,
            sum,
            sum_sq,
        }
    }

    /// Returns `(sum(I), sum(I^2))` over the window at `(x, y)`.
    pub(crate) fn window(&self, x: usize, y: usize, width: usize, height: usize) -> (f64, f64) {
        let a = y * self.stride + x;
        let b = a + width;
        let c = (y + height) * self.stride + x;
        let d = c + width;
        (
            self.sum[d] - self.sum[b] - self.sum[c] + self.sum[a],
            self.sum_sq[d] - self.sum_sq[b] - self.sum_sq[c] + self.sum_sq[a],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::IntegralImage;
    use crate::ImageView;

    #[test]
    fn window_sums_match_direct_sums() {
        let data: Vec<u8> = (0u8..20).collect();
        let view = ImageView::from_slice(&data, 5, 4).unwrap();
        let integral = IntegralImage::from_view(view);

        let (sum, sum_sq) = integral.window(1, 1, 3, 2);
        let expected: Vec<f64> = [6, 7, 8, 11, 12, 13].iter().map(|&v| v as f64).collect();
        assert_eq!(sum, expected.iter().sum::<f64>());
        assert_eq!(sum_sq, expected.iter().map(|v| v * v).sum::<f64>());
    }
}
