//! Fit orchestration: family dispatch, domain transforms and the unified
//! [`FitResult`].
//!
//! # Pipeline
//!
//! - **Smoothing families** (SMA, EMA, Holt's) run on the raw series.
//! - **Curve families** run on a [`DomainTransform`]ed copy: timestamps are
//!   normalized to the first one, logarithmic/power get `x + 1`, and
//!   exponential/power get a positive y shift when needed. The returned
//!   predictor reverses all three adjustments.
//!
//! R² and RMSE of curve fits are recomputed from the composed predictor on
//! the original series, so they are comparable across families.
//!
//! Every failure (too few points, unknown family, invalid smoothing factor,
//! solver error) is reported as `None`.
//!
//! # Examples
//!
//! ```
//! use u_trend::config::{Family, FitConfig};
//! use u_trend::engine::fit_trend;
//!
//! // Epoch-scale timestamps, y = 2·(t - t0) + 1
//! let series: Vec<(f64, f64)> = (0..50)
//!     .map(|i| (1.7e9 + i as f64 * 60.0, 2.0 * i as f64 * 60.0 + 1.0))
//!     .collect();
//! let fit = fit_trend(&series, &FitConfig::new(Family::Linear)).unwrap();
//! assert!(fit.r2 > 0.999);
//! assert_eq!(fit.t0, 1.7e9);
//! let next = fit.predict(1.7e9 + 50.0 * 60.0);
//! assert!((next - 6001.0).abs() < 1e-6);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::config::{Family, FitConfig, ModelSpec};
use crate::error::Result;
use crate::numeric::prediction_stats;
use crate::regression::{
    CurveModel, LeastSquares, RegressionKind, RegressionOptions, RegressionSolver, DEFAULT_PRECISION,
};
use crate::sinusoidal::fit_sinusoidal;
use crate::smoothing::{ExponentialMovingAverage, HoltLinear, SimpleMovingAverage, SmoothingFit};
use crate::transform::DomainTransform;
use crate::Point;

/// Minimum series length for any fit.
pub const MIN_POINTS: usize = 2;

/// Shared original-scale prediction function.
pub type Predictor = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Unified result of every family.
#[derive(Clone)]
pub struct FitResult {
    /// Family that produced the fit.
    pub family: Family,
    /// Human-readable model description.
    pub equation: String,
    /// R² against the original series.
    pub r2: f64,
    /// RMSE against the original series.
    pub rmse: f64,
    /// Reference time subtracted before fitting (0 for smoothing families).
    pub t0: f64,
    /// `(x, fitted)` at every observed x, on the original scale.
    pub points: Vec<Point>,
    predictor: Predictor,
}

impl FitResult {
    /// Predicts the original-scale value at `x`.
    ///
    /// Defined for every x; may be non-finite outside a family's natural
    /// domain.
    pub fn predict(&self, x: f64) -> f64 {
        (self.predictor)(x)
    }

    /// Returns a cloneable handle to the prediction function.
    pub fn predictor(&self) -> Predictor {
        Arc::clone(&self.predictor)
    }
}

impl fmt::Debug for FitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FitResult")
            .field("family", &self.family)
            .field("equation", &self.equation)
            .field("r2", &self.r2)
            .field("rmse", &self.rmse)
            .field("t0", &self.t0)
            .field("points", &self.points.len())
            .finish_non_exhaustive()
    }
}

/// Dispatches fit requests to the smoothing forecasters, the sinusoidal
/// fitter, or a [`RegressionSolver`].
#[derive(Debug, Clone)]
pub struct TrendEngine<S = LeastSquares> {
    solver: S,
    precision: u32,
}

impl TrendEngine<LeastSquares> {
    /// Engine backed by the built-in least-squares solver.
    pub fn new() -> Self {
        Self::with_solver(LeastSquares)
    }
}

impl Default for TrendEngine<LeastSquares> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RegressionSolver> TrendEngine<S> {
    /// Engine backed by a custom solver.
    pub fn with_solver(solver: S) -> Self {
        Self {
            solver,
            precision: DEFAULT_PRECISION,
        }
    }

    /// Sets the coefficient precision passed to the solver.
    pub fn precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Fits the family named in `config`.
    pub fn fit(&self, series: &[Point], config: &FitConfig) -> Option<FitResult> {
        self.fit_model(series, &config.model())
    }

    /// Fits a family given by its wire name, with default options.
    ///
    /// Returns `None` for an unknown name.
    pub fn fit_named(&self, series: &[Point], name: &str) -> Option<FitResult> {
        let family = name
            .parse::<Family>()
            .map_err(|err| tracing::debug!(%err, "rejecting fit request"))
            .ok()?;
        self.fit(series, &FitConfig::new(family))
    }

    /// Fits a resolved [`ModelSpec`].
    pub fn fit_model(&self, series: &[Point], spec: &ModelSpec) -> Option<FitResult> {
        let family = spec.family();
        if series.len() < MIN_POINTS {
            tracing::debug!(%family, n = series.len(), "not enough points to fit");
            return None;
        }

        match *spec {
            ModelSpec::Sma { window_size } => {
                smoothing_result(family, SimpleMovingAverage::new(window_size).fit(series))
            }
            ModelSpec::Ema { alpha } => {
                let fit = ExponentialMovingAverage::new(alpha).and_then(|ema| ema.fit(series));
                smoothing_result(family, fit)
            }
            ModelSpec::Holts { alpha, beta } => {
                let fit = HoltLinear::new(alpha, beta).and_then(|holt| holt.fit(series));
                smoothing_result(family, fit)
            }
            ModelSpec::Sinusoidal => self.curve_result(family, series, |points| {
                let model: Box<dyn CurveModel> = Box::new(fit_sinusoidal(points));
                Ok(model)
            }),
            ModelSpec::Polynomial { order } => {
                self.regression_result(family, RegressionKind::Polynomial, order, series)
            }
            ModelSpec::Linear | ModelSpec::Exponential | ModelSpec::Logarithmic | ModelSpec::Power => {
                let kind = family.regression_kind()?;
                self.regression_result(family, kind, 0, series)
            }
        }
    }

    fn regression_result(
        &self,
        family: Family,
        kind: RegressionKind,
        order: usize,
        series: &[Point],
    ) -> Option<FitResult> {
        let options = RegressionOptions {
            order,
            precision: self.precision,
        };
        self.curve_result(family, series, |points| {
            self.solver.fit(kind, points, &options)
        })
    }

    fn curve_result<F>(&self, family: Family, series: &[Point], fit: F) -> Option<FitResult>
    where
        F: FnOnce(&[Point]) -> Result<Box<dyn CurveModel>>,
    {
        let transform = DomainTransform::for_family(family, series);
        tracing::debug!(
            %family,
            n = series.len(),
            t0 = transform.t0,
            x_offset = transform.x_offset,
            y_shift = transform.y_shift,
            "fitting curve"
        );

        let model: Arc<dyn CurveModel> = match fit(&transform.apply(series)) {
            Ok(model) => Arc::from(model),
            Err(err) => {
                tracing::warn!(%family, %err, "curve fit unavailable");
                return None;
            }
        };

        let equation = model.equation().to_string();
        let predictor: Predictor = Arc::new(transform.restore(move |x| model.predict(x)));
        let stats = prediction_stats(series, |x| predictor(x));
        let points = series.iter().map(|&(x, _)| (x, predictor(x))).collect();

        Some(FitResult {
            family,
            equation,
            r2: stats.r2,
            rmse: stats.rmse,
            t0: transform.t0,
            points,
            predictor,
        })
    }
}

fn smoothing_result(family: Family, fit: Option<SmoothingFit>) -> Option<FitResult> {
    let Some(fit) = fit else {
        tracing::debug!(%family, "smoothing forecaster declined the series");
        return None;
    };
    let curve = fit.curve;
    Some(FitResult {
        family,
        equation: fit.equation,
        r2: fit.r2,
        rmse: fit.rmse,
        t0: 0.0,
        points: fit.points,
        predictor: Arc::new(move |x| curve.predict(x)),
    })
}

/// Fits `series` with the default engine.
pub fn fit_trend(series: &[Point], config: &FitConfig) -> Option<FitResult> {
    TrendEngine::new().fit(series, config)
}

/// Fits the family named `name` with default options and the default engine.
pub fn fit_trend_named(series: &[Point], name: &str) -> Option<FitResult> {
    TrendEngine::new().fit_named(series, name)
}
