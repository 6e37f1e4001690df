//! Domain-validity transforms applied around curve fits.
//!
//! Curve families are fitted on shifted data and predicted on the original
//! scale. The shifts are:
//!
//! ```text
//! x' = x - t0 + x_offset     t0 = first timestamp
//!                            x_offset = 1 for logarithmic and power, else 0
//! y' = y + y_shift           y_shift = |min y| + 1 for exponential and power
//!                            when min y <= 0, else 0
//! ```
//!
//! A fitted model `m` is read back on the original scale as
//! `m(forward_x(x)) - y_shift`.

use crate::config::Family;
use crate::Point;

/// The invertible shift pair used by a single curve fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainTransform {
    /// Reference time subtracted from every x.
    pub t0: f64,
    /// Added to normalized x so the domain starts at 1.
    pub x_offset: f64,
    /// Added to every y so the range is positive.
    pub y_shift: f64,
}

impl DomainTransform {
    /// Identity transform.
    pub const IDENTITY: DomainTransform = DomainTransform {
        t0: 0.0,
        x_offset: 0.0,
        y_shift: 0.0,
    };

    /// Transform required to fit `family` to `series`.
    ///
    /// Smoothing families get the identity. `series` must be non-empty for
    /// curve families.
    pub fn for_family(family: Family, series: &[Point]) -> Self {
        if family.is_smoothing() || series.is_empty() {
            return Self::IDENTITY;
        }

        let x_offset = match family {
            Family::Logarithmic | Family::Power => 1.0,
            _ => 0.0,
        };

        let y_shift = match family {
            Family::Exponential | Family::Power => {
                let min_y = series.iter().map(|&(_, y)| y).fold(f64::INFINITY, f64::min);
                if min_y <= 0.0 {
                    min_y.abs() + 1.0
                } else {
                    0.0
                }
            }
            _ => 0.0,
        };

        Self {
            t0: series[0].0,
            x_offset,
            y_shift,
        }
    }

    /// Maps an external x into the fitting domain.
    pub fn forward_x(&self, x: f64) -> f64 {
        x - self.t0 + self.x_offset
    }

    /// Maps an observed y into the fitting range.
    pub fn forward_y(&self, y: f64) -> f64 {
        y + self.y_shift
    }

    /// Maps a model output back to the original scale.
    pub fn inverse_y(&self, y: f64) -> f64 {
        y - self.y_shift
    }

    /// Applies the forward transform to a whole series.
    pub fn apply(&self, series: &[Point]) -> Vec<Point> {
        series
            .iter()
            .map(|&(x, y)| (self.forward_x(x), self.forward_y(y)))
            .collect()
    }

    /// Wraps a fitting-domain model as an original-scale predictor.
    pub fn restore<F>(self, model: F) -> impl Fn(f64) -> f64
    where
        F: Fn(f64) -> f64,
    {
        move |x| self.inverse_y(model(self.forward_x(x)))
    }
}
