//! Sinusoidal curve fitting.
//!
//! Fits `y = A · sin(B · x + C) + D` without an iterative optimizer.
//!
//! # Algorithm
//!
//! 1. `D = mean(y)`, `A = (max(y) - min(y)) / 2`.
//! 2. **Frequency.** The dominant period is read off the autocorrelation of
//!    the centered series: the highest local peak beyond lag 2 wins and
//!    `B = 2π / (lag · Δx̄)`. Without a positive peak, zero crossings give
//!    the period (`2 · span / crossings`); without crossings, one cycle is
//!    assumed over the whole span.
//! 3. **Phase.** A 72-step grid over `[0, 2π)` followed by ±5 sub-steps of a
//!    tenth of the grid step, minimizing the squared error.
//! 4. **Amplitude and offset.** With B and C fixed the model is linear in A
//!    and D, so they are re-estimated by ordinary least squares.
//!
//! Fewer than four points, or a flat series, produce a degenerate fit with
//! R² = 0 rather than `None`.
//!
//! # Examples
//!
//! ```
//! use u_trend::sinusoidal::fit_sinusoidal;
//!
//! let data: Vec<(f64, f64)> = (0..200)
//!     .map(|i| {
//!         let x = i as f64 * 0.1;
//!         (x, 3.0 * (1.5 * x + 0.5).sin() + 7.0)
//!     })
//!     .collect();
//! let fit = fit_sinusoidal(&data);
//! assert!(fit.r2 > 0.9);
//! assert!(fit.equation.contains("sin"));
//! ```

use std::f64::consts::TAU;

use crate::regression::CurveModel;
use crate::Point;

/// Coarse phase grid resolution (5° steps).
const PHASE_STEPS: usize = 72;
/// Fine phase refinement reaches this many sub-steps either side.
const PHASE_REFINE_STEPS: i32 = 5;
/// Sub-steps per coarse phase step.
const PHASE_SUBDIVISION: f64 = 10.0;
/// Determinant below which the amplitude/offset system is singular.
const SINGULAR_DET: f64 = 1e-12;
/// Minimum series length for a real fit.
const MIN_POINTS: usize = 4;

/// Fitted sine wave parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SineParams {
    /// Amplitude (A).
    pub amplitude: f64,
    /// Angular frequency (B).
    pub frequency: f64,
    /// Phase (C).
    pub phase: f64,
    /// Vertical offset (D).
    pub offset: f64,
}

impl SineParams {
    /// Evaluates `A · sin(B · x + C) + D`.
    pub fn eval(&self, x: f64) -> f64 {
        self.amplitude * (self.frequency * x + self.phase).sin() + self.offset
    }
}

/// Shape of the fitted model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SineModel {
    /// Fewer than four points; predicts 0 everywhere.
    Insufficient,
    /// Zero amplitude; predicts the mean.
    Flat(f64),
    /// A proper sine wave.
    Wave(SineParams),
}

/// Result of a sinusoidal fit.
#[derive(Debug, Clone)]
pub struct SinusoidalFit {
    /// The fitted model.
    pub model: SineModel,
    /// Human-readable equation.
    pub equation: String,
    /// R² against the input series (0 for degenerate models).
    pub r2: f64,
    /// Fitted `(x, y)` at each input x. For the insufficient-data fallback
    /// this is the raw input.
    pub points: Vec<Point>,
}

impl SinusoidalFit {
    /// Predicts `(x, y)` at `x`.
    pub fn predict_pair(&self, x: f64) -> (f64, f64) {
        (x, self.value(x))
    }

    fn value(&self, x: f64) -> f64 {
        match self.model {
            SineModel::Insufficient => 0.0,
            SineModel::Flat(d) => d,
            SineModel::Wave(p) => p.eval(x),
        }
    }
}

impl CurveModel for SinusoidalFit {
    fn predict(&self, x: f64) -> f64 {
        self.value(x)
    }

    fn equation(&self) -> &str {
        &self.equation
    }
}

/// Fits a sine wave to the series.
///
/// Never fails: short or flat input yields a degenerate model with R² = 0.
pub fn fit_sinusoidal(series: &[Point]) -> SinusoidalFit {
    let n = series.len();
    if n < MIN_POINTS {
        return SinusoidalFit {
            model: SineModel::Insufficient,
            equation: "Insufficient data for sinusoidal fit".to_string(),
            r2: 0.0,
            points: series.to_vec(),
        };
    }

    let xs: Vec<f64> = series.iter().map(|&(x, _)| x).collect();
    let ys: Vec<f64> = series.iter().map(|&(_, y)| y).collect();

    let offset = ys.iter().sum::<f64>() / n as f64;
    let (y_min, y_max) = min_max(&ys);
    let amplitude = (y_max - y_min) / 2.0;

    if amplitude == 0.0 {
        tracing::debug!(offset, "flat series, no sinusoidal component");
        return SinusoidalFit {
            model: SineModel::Flat(offset),
            equation: format!("y = {offset:.4}"),
            r2: 0.0,
            points: xs.iter().map(|&x| (x, offset)).collect(),
        };
    }

    let frequency = estimate_frequency(&xs, &ys, offset);
    let phase = estimate_phase(&xs, &ys, amplitude, frequency, offset);
    let (amplitude, offset) =
        refine_amplitude_offset(&xs, &ys, frequency, phase).unwrap_or_else(|| {
            tracing::debug!("singular amplitude/offset system, keeping heuristic estimates");
            (amplitude, offset)
        });

    let params = SineParams {
        amplitude,
        frequency,
        phase,
        offset,
    };
    let r2 = r_squared(series, &params);

    SinusoidalFit {
        model: SineModel::Wave(params),
        equation: format!(
            "y = {amplitude:.4} * sin({frequency:.4} * x + {phase:.4}) + {offset:.4}"
        ),
        r2,
        points: xs.iter().map(|&x| (x, params.eval(x))).collect(),
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// Estimates the angular frequency B.
fn estimate_frequency(xs: &[f64], ys: &[f64], mean: f64) -> f64 {
    let n = ys.len();
    let centered: Vec<f64> = ys.iter().map(|y| y - mean).collect();
    let span = xs[n - 1] - xs[0];
    let dt = span / (n - 1) as f64;

    // Best local peak beyond lag 2: non-decreasing from the previous lag and
    // larger than every earlier candidate.
    let max_lag = n / 2;
    let mut best_lag = 1;
    let mut best_val = f64::NEG_INFINITY;
    let mut prev = autocorrelation(&centered, 0);
    for lag in 1..max_lag {
        let value = autocorrelation(&centered, lag);
        if lag > 2 && value > best_val && prev <= value {
            best_val = value;
            best_lag = lag;
        }
        prev = value;
    }

    if best_val > 0.0 && best_lag > 2 {
        return TAU / (best_lag as f64 * dt);
    }

    let crossings = centered.windows(2).filter(|w| w[0] * w[1] < 0.0).count();
    if crossings > 0 {
        tracing::debug!(crossings, "no autocorrelation peak, using zero crossings");
        let period = 2.0 * span / crossings as f64;
        return TAU / period;
    }

    tracing::debug!("no zero crossings, assuming a single cycle");
    TAU / span
}

fn autocorrelation(centered: &[f64], lag: usize) -> f64 {
    centered
        .iter()
        .zip(&centered[lag..])
        .map(|(a, b)| a * b)
        .sum()
}

fn sse(xs: &[f64], ys: &[f64], params: &SineParams) -> f64 {
    xs.iter()
        .zip(ys)
        .map(|(&x, &y)| (y - params.eval(x)).powi(2))
        .sum()
}

/// Estimates the phase C by coarse grid search and local refinement.
fn estimate_phase(xs: &[f64], ys: &[f64], amplitude: f64, frequency: f64, offset: f64) -> f64 {
    let error_at = |phase: f64| {
        let params = SineParams {
            amplitude,
            frequency,
            phase,
            offset,
        };
        sse(xs, ys, &params)
    };

    let coarse_step = TAU / PHASE_STEPS as f64;
    let mut best_phase = 0.0;
    let mut best_sse = f64::INFINITY;
    for i in 0..PHASE_STEPS {
        let phase = i as f64 * coarse_step;
        let err = error_at(phase);
        if err < best_sse {
            best_sse = err;
            best_phase = phase;
        }
    }

    let fine_step = coarse_step / PHASE_SUBDIVISION;
    let center = best_phase;
    for i in -PHASE_REFINE_STEPS..=PHASE_REFINE_STEPS {
        let phase = center + f64::from(i) * fine_step;
        let err = error_at(phase);
        if err < best_sse {
            best_sse = err;
            best_phase = phase;
        }
    }

    best_phase
}

/// Solves the 2×2 normal equations for (A, D) given B and C.
///
/// ```text
/// [Σs²  Σs] [A]   [Σs·y]
/// [Σs   n ] [D] = [Σy  ]       s = sin(Bx + C)
/// ```
///
/// Returns `None` when the determinant is below 1e-12 in magnitude.
fn refine_amplitude_offset(xs: &[f64], ys: &[f64], frequency: f64, phase: f64) -> Option<(f64, f64)> {
    let n = xs.len() as f64;
    let (mut sum_s, mut sum_y, mut sum_ss, mut sum_sy) = (0.0, 0.0, 0.0, 0.0);
    for (&x, &y) in xs.iter().zip(ys) {
        let s = (frequency * x + phase).sin();
        sum_s += s;
        sum_y += y;
        sum_ss += s * s;
        sum_sy += s * y;
    }

    let det = sum_ss * n - sum_s * sum_s;
    if det.abs() < SINGULAR_DET {
        return None;
    }
    let amplitude = (sum_sy * n - sum_s * sum_y) / det;
    let offset = (sum_ss * sum_y - sum_s * sum_sy) / det;
    Some((amplitude, offset))
}

fn r_squared(series: &[Point], params: &SineParams) -> f64 {
    let n = series.len() as f64;
    let mean = series.iter().map(|&(_, y)| y).sum::<f64>() / n;
    let (ss_tot, ss_res) = series.iter().fold((0.0, 0.0), |(tot, res), &(x, y)| {
        (tot + (y - mean).powi(2), res + (y - params.eval(x)).powi(2))
    });
    if ss_tot == 0.0 {
        0.0
    } else {
        1.0 - ss_res / ss_tot
    }
}
