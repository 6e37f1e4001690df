//! # u-trend
//!
//! Trend fitting and short-horizon forecasting for irregularly spaced
//! `(timestamp, value)` series.
//!
//! Every model family is exposed through one contract: an equation string,
//! goodness-of-fit statistics against the original data, and a prediction
//! function that is defined inside and beyond the observed range.
//!
//! ## Modules
//!
//! - [`engine`]: Fit orchestration, domain transforms, unified [`FitResult`]
//! - [`config`]: Families ([`Family`]) and fit options ([`FitConfig`])
//! - [`regression`]: Linear, polynomial, exponential, logarithmic and power
//!   least squares behind a pluggable solver
//! - [`sinusoidal`]: Sine fitting by autocorrelation and phase search
//! - [`smoothing`]: SMA, EMA and Holt's linear forecasters
//! - [`numeric`]: Interpolation, tail slope, R²/RMSE
//! - [`sampler`]: Evenly spaced prediction samples for rendering
//! - [`transform`]: Invertible x/y shifts used around curve fits
//!
//! ## Design Philosophy
//!
//! - **No errors across the boundary**: an unavailable fit is `None`; a
//!   degenerate one carries R² = 0
//! - **Pure**: no fitter mutates its input or holds shared state
//! - **Comparable metrics**: statistics are always computed on the
//!   untransformed series
//!
//! ## Example
//!
//! ```
//! use u_trend::{fit_trend, Family, FitConfig};
//! use u_trend::sampler::generate_prediction_points;
//!
//! let series: Vec<(f64, f64)> = (0..30).map(|i| (i as f64, 3.0 * i as f64 + 5.0)).collect();
//! let fit = fit_trend(&series, &FitConfig::new(Family::Holts)).unwrap();
//! assert_eq!(fit.points.len(), series.len());
//!
//! let forecast = generate_prediction_points(|x| fit.predict(x), 0.0, 29.0, 10.0, 40);
//! assert_eq!(forecast.len(), 40);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod numeric;
pub mod regression;
pub mod sampler;
pub mod sinusoidal;
pub mod smoothing;
pub mod transform;

/// An `(x, y)` observation.
pub type Point = (f64, f64);

pub use config::{Family, FitConfig, ModelSpec};
pub use engine::{fit_trend, fit_trend_named, FitResult, Predictor, TrendEngine};
pub use error::FitError;
