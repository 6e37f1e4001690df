//! Exponential Moving Average (EMA).
//!
//! Level-only smoothing. Unlike classical SES the forecast is not flat:
//! beyond the last observation the smoothed curve continues along its
//! weighted tail slope.
//!
//! # Algorithm
//!
//! ```text
//! S_0 = y_0
//! S_i = α y_i + (1 - α) S_{i-1}
//! ```
//!
//! where α ∈ [0, 1] is the smoothing constant. α = 1 reproduces the series,
//! α = 0 holds the first value.
//!
//! # Reference
//!
//! Brown, R.G. (1956). *Exponential Smoothing for Predicting Demand*.

use super::{valid_factor, Extrapolation, SmoothingFit, DEFAULT_ALPHA};
use crate::numeric::weighted_average_slope;
use crate::Point;

/// Exponential moving average forecaster.
#[derive(Debug, Clone, Copy)]
pub struct ExponentialMovingAverage {
    alpha: f64,
}

impl Default for ExponentialMovingAverage {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl ExponentialMovingAverage {
    /// Creates a new EMA.
    ///
    /// # Parameters
    /// - `alpha`: smoothing constant, must be in [0, 1]
    ///
    /// Returns `None` if alpha is out of range or non-finite.
    pub fn new(alpha: f64) -> Option<Self> {
        if !valid_factor(alpha) {
            return None;
        }
        Some(Self { alpha })
    }

    /// Returns the smoothing constant α.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Smooths the series.
    ///
    /// Returns `None` if the series has fewer than 2 points.
    pub fn fit(&self, series: &[Point]) -> Option<SmoothingFit> {
        if series.len() < 2 {
            return None;
        }

        let mut ema = Vec::with_capacity(series.len());
        let mut s = series[0].1;
        ema.push(s);
        for &(_, y) in &series[1..] {
            s = self.alpha * y + (1.0 - self.alpha) * s;
            ema.push(s);
        }

        let xs: Vec<f64> = series.iter().map(|&(x, _)| x).collect();
        let slope = weighted_average_slope(&xs, &ema);

        Some(SmoothingFit::from_fitted(
            series,
            ema,
            Extrapolation::Slope(slope),
            format!("EMA(α={})", self.alpha),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn noisy() -> Vec<Point> {
        [10.0, 12.0, 13.0, 11.0, 14.0, 15.0, 13.5, 16.0]
            .iter()
            .enumerate()
            .map(|(i, &y)| (i as f64 * 2.5, y))
            .collect()
    }

    #[test]
    fn test_ema_basic() {
        let result = ExponentialMovingAverage::new(0.3)
            .unwrap()
            .fit(&noisy())
            .unwrap();

        assert_eq!(result.points.len(), 8);
        // S0 = 10
        assert_abs_diff_eq!(result.points[0].1, 10.0, epsilon = 1e-10);
        // S1 = 0.3*12 + 0.7*10 = 10.6
        assert_abs_diff_eq!(result.points[1].1, 10.6, epsilon = 1e-10);
        assert_eq!(result.equation, "EMA(α=0.3)");
    }

    #[test]
    fn test_ema_alpha_one_reproduces_series() {
        let data = noisy();
        let result = ExponentialMovingAverage::new(1.0).unwrap().fit(&data).unwrap();
        for (&(_, y), &(_, f)) in data.iter().zip(&result.points) {
            assert_abs_diff_eq!(y, f, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(result.r2, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ema_alpha_zero_holds_first_value() {
        let data = noisy();
        let result = ExponentialMovingAverage::new(0.0).unwrap().fit(&data).unwrap();
        for &(_, f) in &result.points {
            assert_eq!(f, 10.0);
        }
        // Flat fitted curve → zero slope past the end.
        assert_eq!(result.predict(1000.0), 10.0);
    }

    #[test]
    fn test_ema_alpha_effect() {
        // Higher alpha → more responsive to recent data
        let data = [(0.0, 10.0), (1.0, 20.0), (2.0, 10.0)];
        let low = ExponentialMovingAverage::new(0.1).unwrap().fit(&data).unwrap();
        let high = ExponentialMovingAverage::new(0.9).unwrap().fit(&data).unwrap();
        assert!(high.points[1].1 > low.points[1].1);
    }

    #[test]
    fn test_ema_extrapolates_rising_series() {
        let data: Vec<Point> = (0..30).map(|i| (i as f64, 2.0 * i as f64)).collect();
        let result = ExponentialMovingAverage::default().fit(&data).unwrap();
        assert!(result.predict(40.0) > result.predict(29.0));
    }

    #[test]
    fn test_ema_insufficient_data() {
        let ema = ExponentialMovingAverage::default();
        assert!(ema.fit(&[]).is_none());
        assert!(ema.fit(&[(0.0, 42.0)]).is_none());
    }

    #[test]
    fn test_ema_invalid_alpha() {
        assert!(ExponentialMovingAverage::new(-0.1).is_none());
        assert!(ExponentialMovingAverage::new(1.5).is_none());
        assert!(ExponentialMovingAverage::new(f64::NAN).is_none());
    }
}
