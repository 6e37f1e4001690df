//! Simple Moving Average (SMA).
//!
//! # Algorithm
//!
//! ```text
//! w     = clamp(round(window_size), 2, n)
//! SMA_i = (y_{i-k+1} + … + y_i) / k,   k = min(i + 1, w)
//! ```
//!
//! The first `w - 1` values average the partial window available so far.
//! Beyond the last observation the curve continues along the weighted tail
//! slope of the averaged values.

use super::{Extrapolation, SmoothingFit, DEFAULT_WINDOW_SIZE};
use crate::numeric::weighted_average_slope;
use crate::Point;

/// Simple moving average forecaster.
#[derive(Debug, Clone, Copy)]
pub struct SimpleMovingAverage {
    window_size: f64,
}

impl Default for SimpleMovingAverage {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

impl SimpleMovingAverage {
    /// Creates an SMA with the requested window.
    ///
    /// Any value is accepted; the effective window is resolved against the
    /// series length at fit time (see [`effective_window`](Self::effective_window)).
    pub fn new(window_size: f64) -> Self {
        Self { window_size }
    }

    /// Returns the requested window size.
    pub fn window_size(&self) -> f64 {
        self.window_size
    }

    /// Window actually used for a series of length `n` (`n >= 2`).
    ///
    /// Rounded, then clamped to `[2, n]`. A NaN request uses the whole series.
    pub fn effective_window(&self, n: usize) -> usize {
        self.window_size.round().min(n as f64).max(2.0) as usize
    }

    /// Fits the moving average.
    ///
    /// Returns `None` if the series has fewer than 2 points.
    pub fn fit(&self, series: &[Point]) -> Option<SmoothingFit> {
        let n = series.len();
        if n < 2 {
            return None;
        }
        let w = self.effective_window(n);

        let mut sma = Vec::with_capacity(n);
        let mut sum = 0.0;
        for (i, &(_, y)) in series.iter().enumerate() {
            sum += y;
            if i >= w {
                sum -= series[i - w].1;
            }
            sma.push(sum / (i + 1).min(w) as f64);
        }

        let xs: Vec<f64> = series.iter().map(|&(x, _)| x).collect();
        let slope = weighted_average_slope(&xs, &sma);

        Some(SmoothingFit::from_fitted(
            series,
            sma,
            Extrapolation::Slope(slope),
            format!("SMA(window={w})"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn line(n: usize, slope: f64) -> Vec<Point> {
        (0..n).map(|i| (i as f64, slope * i as f64)).collect()
    }

    #[test]
    fn test_sma_constant_series() {
        let data: Vec<Point> = (0..20).map(|i| (i as f64, 5.0)).collect();
        let result = SimpleMovingAverage::new(5.0).fit(&data).unwrap();

        assert_eq!(result.r2, 0.0);
        for &(_, y) in &result.points {
            assert_abs_diff_eq!(y, 5.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_sma_partial_window_at_start() {
        let data = [(0.0, 2.0), (1.0, 4.0), (2.0, 6.0), (3.0, 8.0)];
        let result = SimpleMovingAverage::new(3.0).fit(&data).unwrap();
        let fitted: Vec<f64> = result.points.iter().map(|p| p.1).collect();

        assert_abs_diff_eq!(fitted[0], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fitted[1], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fitted[2], 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fitted[3], 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sma_window_clamped_to_two() {
        let data = line(10, 2.0);
        for window in [0.0, -3.0, 1.0, 1.4] {
            let result = SimpleMovingAverage::new(window).fit(&data).unwrap();
            assert_eq!(result.equation, "SMA(window=2)");
            let explicit = SimpleMovingAverage::new(2.0).fit(&data).unwrap();
            assert_eq!(result.points, explicit.points);
        }
    }

    #[test]
    fn test_sma_window_clamped_to_len() {
        let data = line(5, 1.0);
        let result = SimpleMovingAverage::new(100.0).fit(&data).unwrap();
        assert_eq!(result.equation, "SMA(window=5)");
    }

    #[test]
    fn test_sma_window_rounds() {
        let data = line(20, 1.0);
        assert_eq!(
            SimpleMovingAverage::new(4.6).fit(&data).unwrap().equation,
            "SMA(window=5)"
        );
        assert_eq!(SimpleMovingAverage::new(f64::NAN).effective_window(7), 7);
    }

    #[test]
    fn test_sma_extrapolates_linearly() {
        let data = line(20, 2.0);
        let result = SimpleMovingAverage::new(5.0).fit(&data).unwrap();

        let at_end = result.predict(19.0);
        let beyond = result.predict(29.0);
        assert!(beyond > at_end);
        // Steady state of a linear series: the average lags but keeps slope 2.
        assert_abs_diff_eq!(beyond - at_end, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sma_in_range_interpolates() {
        let data = line(20, 3.0);
        let result = SimpleMovingAverage::new(5.0).fit(&data).unwrap();
        let mid = result.predict(10.5);
        let lo = result.points[10].1;
        let hi = result.points[11].1;
        assert_abs_diff_eq!(mid, (lo + hi) / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sma_insufficient_data() {
        let sma = SimpleMovingAverage::default();
        assert!(sma.fit(&[]).is_none());
        assert!(sma.fit(&[(0.0, 1.0)]).is_none());
    }
}
