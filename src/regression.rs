//! Least-squares curve families behind a pluggable solver seam.
//!
//! The orchestrator treats curve regression as an external capability: it
//! hands a [`RegressionSolver`] domain-shifted points and receives a boxed
//! [`CurveModel`]. [`LeastSquares`] is the built-in solver.
//!
//! # Families
//!
//! | Kind          | Model               | Fit                                  |
//! |---------------|---------------------|--------------------------------------|
//! | `Linear`      | y = m·x + c         | OLS closed form                      |
//! | `Polynomial`  | y = Σ cₖ·xᵏ         | normal equations, LU solve           |
//! | `Exponential` | y = a·e^(b·x)       | y-weighted least squares on ln y     |
//! | `Logarithmic` | y = a + b·ln x      | OLS on ln x                          |
//! | `Power`       | y = a·x^b           | OLS on (ln x, ln y)                  |
//!
//! Fitted coefficients are rounded to [`RegressionOptions::precision`]
//! decimal places; the rounded values drive both prediction and the
//! equation string.
//!
//! # Examples
//!
//! ```
//! use u_trend::regression::{
//!     CurveModel, LeastSquares, RegressionKind, RegressionOptions, RegressionSolver,
//! };
//!
//! let points: Vec<(f64, f64)> = (0..10).map(|i| (i as f64, 2.0 * i as f64 + 1.0)).collect();
//! let model = LeastSquares
//!     .fit(RegressionKind::Linear, &points, &RegressionOptions::default())
//!     .unwrap();
//! assert_eq!(model.equation(), "y = 2x + 1");
//! assert!((model.predict(20.0) - 41.0).abs() < 1e-9);
//! ```
//!
//! # References
//!
//! Draper & Smith (1998). "Applied Regression Analysis", 3rd edition.

use nalgebra::{DMatrix, DVector};

use crate::error::{FitError, Result};
use crate::Point;

/// Default number of decimal places kept in fitted coefficients.
pub const DEFAULT_PRECISION: u32 = 10;
/// Default polynomial degree.
pub const DEFAULT_ORDER: usize = 2;

/// A fitted model that can be evaluated anywhere on the real line.
pub trait CurveModel: Send + Sync {
    /// Evaluates the model at `x`. May be non-finite outside the family's
    /// natural domain.
    fn predict(&self, x: f64) -> f64;

    /// Human-readable equation.
    fn equation(&self) -> &str;
}

/// Regression families handled by a [`RegressionSolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegressionKind {
    Linear,
    Polynomial,
    Exponential,
    Logarithmic,
    Power,
}

impl RegressionKind {
    /// Lower-case family name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Polynomial => "polynomial",
            Self::Exponential => "exponential",
            Self::Logarithmic => "logarithmic",
            Self::Power => "power",
        }
    }
}

/// Solver options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegressionOptions {
    /// Polynomial degree (ignored by the other families).
    pub order: usize,
    /// Decimal places kept in each coefficient.
    pub precision: u32,
}

impl Default for RegressionOptions {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
            precision: DEFAULT_PRECISION,
        }
    }
}

/// Fits a regression family to a set of points.
pub trait RegressionSolver: Send + Sync {
    /// Fits `kind` to `points`.
    ///
    /// # Errors
    ///
    /// Any [`FitError`]; the caller decides how to surface it.
    fn fit(
        &self,
        kind: RegressionKind,
        points: &[Point],
        options: &RegressionOptions,
    ) -> Result<Box<dyn CurveModel>>;
}

/// Closed-form least-squares solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeastSquares;

impl RegressionSolver for LeastSquares {
    fn fit(
        &self,
        kind: RegressionKind,
        points: &[Point],
        options: &RegressionOptions,
    ) -> Result<Box<dyn CurveModel>> {
        let p = options.precision;
        let model = match kind {
            RegressionKind::Linear => linear(points, p)?,
            RegressionKind::Polynomial => polynomial(points, options.order, p)?,
            RegressionKind::Exponential => exponential(points, p)?,
            RegressionKind::Logarithmic => logarithmic(points, p)?,
            RegressionKind::Power => power(points, p)?,
        };
        Ok(Box::new(model))
    }
}

/// Fitted coefficients of a regression family.
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    /// y = slope · x + intercept
    Linear { slope: f64, intercept: f64 },
    /// y = Σ coefficients[k] · xᵏ (ascending powers)
    Polynomial { coefficients: Vec<f64> },
    /// y = a · e^(b·x)
    Exponential { a: f64, b: f64 },
    /// y = a + b · ln x
    Logarithmic { a: f64, b: f64 },
    /// y = a · x^b
    Power { a: f64, b: f64 },
}

impl Curve {
    /// Evaluates the curve at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Self::Linear { slope, intercept } => slope * x + intercept,
            // Horner, highest power first.
            Self::Polynomial { coefficients } => {
                coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
            }
            Self::Exponential { a, b } => a * (b * x).exp(),
            Self::Logarithmic { a, b } => a + b * x.ln(),
            Self::Power { a, b } => a * x.powf(*b),
        }
    }

    fn equation(&self) -> String {
        match self {
            Self::Linear { slope, intercept } => format!("y = {slope}x + {intercept}"),
            Self::Polynomial { coefficients } => {
                let terms: Vec<String> = coefficients
                    .iter()
                    .enumerate()
                    .rev()
                    .map(|(k, c)| match k {
                        0 => format!("{c}"),
                        1 => format!("{c}x"),
                        _ => format!("{c}x^{k}"),
                    })
                    .collect();
                format!("y = {}", terms.join(" + "))
            }
            Self::Exponential { a, b } => format!("y = {a}e^({b}x)"),
            Self::Logarithmic { a, b } => format!("y = {a} + {b} ln(x)"),
            Self::Power { a, b } => format!("y = {a}x^{b}"),
        }
    }

    fn coefficients(&self) -> Vec<f64> {
        match self {
            Self::Linear { slope, intercept } => vec![*slope, *intercept],
            Self::Polynomial { coefficients } => coefficients.clone(),
            Self::Exponential { a, b } | Self::Logarithmic { a, b } | Self::Power { a, b } => {
                vec![*a, *b]
            }
        }
    }
}

/// A fitted regression curve with its rendered equation.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionModel {
    /// Fitted coefficients.
    pub curve: Curve,
    equation: String,
}

impl RegressionModel {
    fn new(curve: Curve, family: &'static str) -> Result<Self> {
        if curve.coefficients().iter().any(|c| !c.is_finite()) {
            return Err(FitError::NonFinite { family });
        }
        let equation = curve.equation();
        Ok(Self { curve, equation })
    }
}

impl CurveModel for RegressionModel {
    fn predict(&self, x: f64) -> f64 {
        self.curve.eval(x)
    }

    fn equation(&self) -> &str {
        &self.equation
    }
}

/// Rounds `value` to `precision` decimal places.
fn round(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

fn require_points(points: &[Point], required: usize) -> Result<()> {
    if points.len() < required {
        return Err(FitError::InsufficientData {
            required,
            actual: points.len(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Families
// ---------------------------------------------------------------------------

/// Fits `y = m·x + c` by ordinary least squares.
///
/// When every x is identical the slope is 0 and the intercept is the mean.
pub fn linear(points: &[Point], precision: u32) -> Result<RegressionModel> {
    require_points(points, 2)?;
    let n = points.len() as f64;
    let (sx, sy, sxx, sxy) = points.iter().fold((0.0, 0.0, 0.0, 0.0), |s, &(x, y)| {
        (s.0 + x, s.1 + y, s.2 + x * x, s.3 + x * y)
    });

    let run = n * sxx - sx * sx;
    let rise = n * sxy - sx * sy;
    let slope = if run == 0.0 {
        0.0
    } else {
        round(rise / run, precision)
    };
    let intercept = round(sy / n - slope * sx / n, precision);

    RegressionModel::new(Curve::Linear { slope, intercept }, "linear")
}

/// Fits a polynomial of degree `order` via the normal equations.
///
/// ```text
/// Σⱼ (Σ xᵢ^(k+j)) cⱼ = Σ xᵢ^k yᵢ,   k = 0..=order
/// ```
///
/// Needs at least `order + 1` points; fewer leave the system
/// underdetermined.
pub fn polynomial(points: &[Point], order: usize, precision: u32) -> Result<RegressionModel> {
    require_points(points, 2)?;
    require_points(points, order.saturating_add(1))?;
    let m = order + 1;

    let mut power_sums = vec![0.0; 2 * order + 1];
    let mut moments = vec![0.0; m];
    for &(x, y) in points {
        let mut xk = 1.0;
        for (k, sum) in power_sums.iter_mut().enumerate() {
            *sum += xk;
            if k < m {
                moments[k] += xk * y;
            }
            xk *= x;
        }
    }

    let lhs = DMatrix::from_fn(m, m, |i, j| power_sums[i + j]);
    let rhs = DVector::from_vec(moments);
    let solution = lhs.lu().solve(&rhs).ok_or(FitError::SingularSystem {
        family: "polynomial",
    })?;

    let coefficients = solution.iter().map(|&c| round(c, precision)).collect();
    RegressionModel::new(Curve::Polynomial { coefficients }, "polynomial")
}

/// Fits `y = a·e^(b·x)`, weighting the log-linear fit by y.
///
/// Requires every y to be positive.
pub fn exponential(points: &[Point], precision: u32) -> Result<RegressionModel> {
    require_points(points, 2)?;
    if points.iter().any(|&(_, y)| y <= 0.0) {
        return Err(FitError::DomainViolation {
            family: "exponential",
            reason: "y > 0",
        });
    }

    // Σy, Σx²y, Σy·ln y, Σxy·ln y, Σxy
    let mut s = [0.0; 5];
    for &(x, y) in points {
        let ln_y = y.ln();
        s[0] += y;
        s[1] += x * x * y;
        s[2] += y * ln_y;
        s[3] += x * y * ln_y;
        s[4] += x * y;
    }

    let den = s[0] * s[1] - s[4] * s[4];
    if den == 0.0 {
        return Err(FitError::SingularSystem {
            family: "exponential",
        });
    }
    let a = round(((s[1] * s[2] - s[4] * s[3]) / den).exp(), precision);
    let b = round((s[0] * s[3] - s[4] * s[2]) / den, precision);

    RegressionModel::new(Curve::Exponential { a, b }, "exponential")
}

/// Fits `y = a + b·ln x`.
///
/// Requires every x to be positive.
pub fn logarithmic(points: &[Point], precision: u32) -> Result<RegressionModel> {
    require_points(points, 2)?;
    if points.iter().any(|&(x, _)| x <= 0.0) {
        return Err(FitError::DomainViolation {
            family: "logarithmic",
            reason: "x > 0",
        });
    }

    let n = points.len() as f64;
    let (sl, sly, sy, sll) = points.iter().fold((0.0, 0.0, 0.0, 0.0), |s, &(x, y)| {
        let l = x.ln();
        (s.0 + l, s.1 + y * l, s.2 + y, s.3 + l * l)
    });

    let den = n * sll - sl * sl;
    if den == 0.0 {
        return Err(FitError::SingularSystem {
            family: "logarithmic",
        });
    }
    let b = round((n * sly - sy * sl) / den, precision);
    let a = round((sy - b * sl) / n, precision);

    RegressionModel::new(Curve::Logarithmic { a, b }, "logarithmic")
}

/// Fits `y = a·x^b` by least squares on `(ln x, ln y)`.
///
/// Requires every x and y to be positive.
pub fn power(points: &[Point], precision: u32) -> Result<RegressionModel> {
    require_points(points, 2)?;
    if points.iter().any(|&(x, y)| x <= 0.0 || y <= 0.0) {
        return Err(FitError::DomainViolation {
            family: "power",
            reason: "x > 0 and y > 0",
        });
    }

    let n = points.len() as f64;
    let (sl, sll_y, sly, sll) = points.iter().fold((0.0, 0.0, 0.0, 0.0), |s, &(x, y)| {
        let lx = x.ln();
        let ly = y.ln();
        (s.0 + lx, s.1 + lx * ly, s.2 + ly, s.3 + lx * lx)
    });

    let den = n * sll - sl * sl;
    if den == 0.0 {
        return Err(FitError::SingularSystem { family: "power" });
    }
    let b = round((n * sll_y - sl * sly) / den, precision);
    let a = round(((sly - b * sl) / n).exp(), precision);

    RegressionModel::new(Curve::Power { a, b }, "power")
}
