//! Holt's Linear (Double Exponential) Smoothing over irregular spacing.
//!
//! The trend is expressed per unit of x, so uneven gaps between
//! observations advance the level by `trend · Δx` rather than by one step.
//!
//! # Algorithm
//!
//! ```text
//! L_0 = y_0
//! T_0 = (y_1 - y_0) / Δx_1
//! L_i = α y_i + (1 - α)(L_{i-1} + T_{i-1} Δx_i)
//! T_i = β (L_i - L_{i-1}) / Δx_i + (1 - β) T_{i-1}
//! F(x) = L_n + T_n (x - x_n),   x > x_n
//! ```
//!
//! A zero Δx is treated as 1 in the divisions. The fitted value at each
//! observation is the updated level `L_i`.
//!
//! # Reference
//!
//! Holt, C.C. (1957). "Forecasting Seasonals and Trends by
//! Exponentially Weighted Moving Averages", ONR Memo 52.

use super::{valid_factor, Extrapolation, SmoothingFit, DEFAULT_ALPHA, DEFAULT_BETA};
use crate::Point;

/// Level and trend after consuming a prefix of the series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoltState {
    /// Smoothed level.
    pub level: f64,
    /// Smoothed trend per unit of x.
    pub trend: f64,
}

impl HoltState {
    /// Initial state from the first two observations.
    pub fn initial(first: Point, second: Point) -> Self {
        Self {
            level: first.1,
            trend: (second.1 - first.1) / nonzero(second.0 - first.0),
        }
    }

    /// Consumes one observation `y` that lies `dx` after the previous one.
    pub fn step(self, alpha: f64, beta: f64, y: f64, dx: f64) -> Self {
        let level = alpha * y + (1.0 - alpha) * (self.level + self.trend * dx);
        let trend = beta * ((level - self.level) / nonzero(dx)) + (1.0 - beta) * self.trend;
        Self { level, trend }
    }
}

fn nonzero(dx: f64) -> f64 {
    if dx == 0.0 {
        1.0
    } else {
        dx
    }
}

/// Holt's linear exponential smoothing.
#[derive(Debug, Clone, Copy)]
pub struct HoltLinear {
    alpha: f64,
    beta: f64,
}

impl Default for HoltLinear {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
        }
    }
}

impl HoltLinear {
    /// Creates a new Holt smoother.
    ///
    /// # Parameters
    /// - `alpha`: level smoothing constant ∈ [0, 1]
    /// - `beta`: trend smoothing constant ∈ [0, 1]
    ///
    /// Returns `None` if parameters are out of range.
    pub fn new(alpha: f64, beta: f64) -> Option<Self> {
        if !valid_factor(alpha) || !valid_factor(beta) {
            return None;
        }
        Some(Self { alpha, beta })
    }

    /// Returns α.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Returns β.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Runs the recurrence and returns the state after every observation.
    ///
    /// Returns `None` if the series has fewer than 2 points.
    pub fn states(&self, series: &[Point]) -> Option<Vec<HoltState>> {
        if series.len() < 2 {
            return None;
        }
        let init = HoltState::initial(series[0], series[1]);
        let states = std::iter::once(init)
            .chain(series.windows(2).scan(init, |state, pair| {
                *state = state.step(self.alpha, self.beta, pair[1].1, pair[1].0 - pair[0].0);
                Some(*state)
            }))
            .collect();
        Some(states)
    }

    /// Applies Holt's linear smoothing to the series.
    ///
    /// Requires at least 2 data points.
    /// Returns `None` if data has fewer than 2 points.
    pub fn fit(&self, series: &[Point]) -> Option<SmoothingFit> {
        let states = self.states(series)?;
        let last = *states.last()?;
        let fitted = states.iter().map(|s| s.level).collect();

        Some(SmoothingFit::from_fitted(
            series,
            fitted,
            Extrapolation::LevelTrend {
                level: last.level,
                trend: last.trend,
            },
            format!("Holt's(α={}, β={})", self.alpha, self.beta),
        ))
    }
}
