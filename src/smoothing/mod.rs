//! Smoothing-based forecasters for irregularly spaced series.
//!
//! Each forecaster turns a raw `(x, y)` series into a fitted curve sampled at
//! the observed x values plus a rule for predicting beyond the last one.
//!
//! # Methods
//!
//! - [`SimpleMovingAverage`]: trailing-window mean
//! - [`ExponentialMovingAverage`]: level-only exponential smoothing
//!   (Brown, 1956)
//! - [`HoltLinear`]: double exponential smoothing with a trend per unit of
//!   x (Holt, 1957)
//!
//! Inside the observed range all three predict by interpolating the fitted
//! curve. Beyond it, the moving averages extend the curve along
//! [`weighted_average_slope`](crate::numeric::weighted_average_slope) and
//! Holt's method uses its own converged level and trend.
//!
//! # References
//!
//! - Brown, R.G. (1956). *Exponential Smoothing for Predicting Demand*.
//! - Holt, C.C. (1957). "Forecasting Seasonals and Trends by
//!   Exponentially Weighted Moving Averages", ONR Memo 52.

mod ema;
mod holt;
mod sma;

pub use ema::ExponentialMovingAverage;
pub use holt::{HoltLinear, HoltState};
pub use sma::SimpleMovingAverage;

use crate::numeric::{fit_stats, interpolate};
use crate::Point;

/// Default smoothing factor for EMA and Holt's level.
pub const DEFAULT_ALPHA: f64 = 0.3;
/// Default trend smoothing factor for Holt's method.
pub const DEFAULT_BETA: f64 = 0.1;
/// Default SMA window.
pub const DEFAULT_WINDOW_SIZE: f64 = 10.0;

/// How a smoothed curve continues past its last observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extrapolation {
    /// Straight line from the last fitted value with the given slope.
    Slope(f64),
    /// Holt forecast `level + trend · (x - last_x)`.
    LevelTrend { level: f64, trend: f64 },
}

/// A fitted curve over the observed x grid plus its extrapolation rule.
#[derive(Debug, Clone)]
pub struct SmoothedCurve {
    xs: Vec<f64>,
    fitted: Vec<f64>,
    extrapolation: Extrapolation,
}

impl SmoothedCurve {
    /// Returns the x grid.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Returns the fitted value at each grid point.
    pub fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    /// Returns the extrapolation rule.
    pub fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }

    /// Evaluates the curve at `x`.
    ///
    /// Interpolates at or before the last observation and applies the
    /// extrapolation rule after it.
    pub fn predict(&self, x: f64) -> f64 {
        let (Some(&last_x), Some(&last_fitted)) = (self.xs.last(), self.fitted.last()) else {
            return f64::NAN;
        };
        if x <= last_x {
            return interpolate(&self.xs, &self.fitted, x);
        }
        match self.extrapolation {
            Extrapolation::Slope(slope) => last_fitted + slope * (x - last_x),
            Extrapolation::LevelTrend { level, trend } => level + trend * (x - last_x),
        }
    }
}

/// Output of a smoothing forecaster.
#[derive(Debug, Clone)]
pub struct SmoothingFit {
    /// Model description, e.g. `SMA(window=5)`.
    pub equation: String,
    /// R² of the fitted curve against the raw values.
    pub r2: f64,
    /// RMSE of the fitted curve against the raw values.
    pub rmse: f64,
    /// `(x, fitted)` at every observed x.
    pub points: Vec<Point>,
    /// The curve used for prediction.
    pub curve: SmoothedCurve,
}

impl SmoothingFit {
    /// Predicts the value at `x`, inside or beyond the observed range.
    pub fn predict(&self, x: f64) -> f64 {
        self.curve.predict(x)
    }

    pub(crate) fn from_fitted(
        series: &[Point],
        fitted: Vec<f64>,
        extrapolation: Extrapolation,
        equation: String,
    ) -> Self {
        let xs: Vec<f64> = series.iter().map(|&(x, _)| x).collect();
        let ys: Vec<f64> = series.iter().map(|&(_, y)| y).collect();
        let stats = fit_stats(&ys, &fitted);
        let points = xs.iter().copied().zip(fitted.iter().copied()).collect();
        Self {
            equation,
            r2: stats.r2,
            rmse: stats.rmse,
            points,
            curve: SmoothedCurve {
                xs,
                fitted,
                extrapolation,
            },
        }
    }
}

/// Returns `true` for a smoothing factor in `[0, 1]`.
fn valid_factor(v: f64) -> bool {
    v.is_finite() && (0.0..=1.0).contains(&v)
}
