//! Trend families and fit configuration.
//!
//! [`FitConfig`] mirrors the loose options bag consumers send
//! (`{ "type": "ema", "alpha": 0.5 }`). [`FitConfig::model`] resolves it into
//! a [`ModelSpec`], a closed sum type with one variant per family that
//! carries only the parameters that family uses, with defaults applied.
//!
//! # Examples
//!
//! ```
//! use u_trend::config::{Family, FitConfig, ModelSpec};
//!
//! let cfg = FitConfig::new(Family::Holts).with_alpha(0.5);
//! assert_eq!(cfg.model(), ModelSpec::Holts { alpha: 0.5, beta: 0.1 });
//! assert_eq!("sma".parse::<Family>().unwrap(), Family::Sma);
//! assert_eq!(Family::Sma.label(), "Simple Moving Avg");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FitError;
use crate::regression::{RegressionKind, DEFAULT_ORDER};
use crate::smoothing::{DEFAULT_ALPHA, DEFAULT_BETA, DEFAULT_WINDOW_SIZE};

/// Supported model families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    #[default]
    Linear,
    Polynomial,
    Exponential,
    Logarithmic,
    Power,
    Sinusoidal,
    Sma,
    Ema,
    Holts,
}

impl Family {
    /// Every family.
    pub const ALL: [Family; 9] = [
        Family::Linear,
        Family::Polynomial,
        Family::Exponential,
        Family::Logarithmic,
        Family::Power,
        Family::Sinusoidal,
        Family::Sma,
        Family::Ema,
        Family::Holts,
    ];

    /// Curve families (fitted on normalized timestamps).
    pub const CURVES: [Family; 6] = [
        Family::Linear,
        Family::Polynomial,
        Family::Exponential,
        Family::Logarithmic,
        Family::Power,
        Family::Sinusoidal,
    ];

    /// Smoothing families (fitted on raw timestamps).
    pub const SMOOTHING: [Family; 3] = [Family::Sma, Family::Ema, Family::Holts];

    /// Wire name, e.g. `"holts"`.
    pub fn name(self) -> &'static str {
        match self {
            Family::Linear => "linear",
            Family::Polynomial => "polynomial",
            Family::Exponential => "exponential",
            Family::Logarithmic => "logarithmic",
            Family::Power => "power",
            Family::Sinusoidal => "sinusoidal",
            Family::Sma => "sma",
            Family::Ema => "ema",
            Family::Holts => "holts",
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Family::Linear => "Linear",
            Family::Polynomial => "Polynomial",
            Family::Exponential => "Exponential",
            Family::Logarithmic => "Logarithmic",
            Family::Power => "Power",
            Family::Sinusoidal => "Sinusoidal",
            Family::Sma => "Simple Moving Avg",
            Family::Ema => "Exponential Moving Avg",
            Family::Holts => "Holt's Linear",
        }
    }

    /// Returns `true` for SMA, EMA and Holt's.
    pub fn is_smoothing(self) -> bool {
        matches!(self, Family::Sma | Family::Ema | Family::Holts)
    }

    /// The regression family handled by a solver, if any.
    pub fn regression_kind(self) -> Option<RegressionKind> {
        match self {
            Family::Linear => Some(RegressionKind::Linear),
            Family::Polynomial => Some(RegressionKind::Polynomial),
            Family::Exponential => Some(RegressionKind::Exponential),
            Family::Logarithmic => Some(RegressionKind::Logarithmic),
            Family::Power => Some(RegressionKind::Power),
            Family::Sinusoidal | Family::Sma | Family::Ema | Family::Holts => None,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Family {
    type Err = FitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Family::ALL
            .into_iter()
            .find(|family| family.name() == s)
            .ok_or_else(|| FitError::UnknownFamily(s.to_string()))
    }
}

/// Options bag for a fit request.
///
/// Field names follow the wire format: `type`, `order`, `alpha`, `beta`,
/// `windowSize`. A missing `type` means linear.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitConfig {
    /// Model family.
    #[serde(rename = "type", default)]
    pub family: Family,
    /// Polynomial degree (default 2; 0 also means 2).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<usize>,
    /// Level smoothing factor for EMA and Holt's (default 0.3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    /// Trend smoothing factor for Holt's (default 0.1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,
    /// SMA window (default 10, clamped to `[2, n]` at fit time).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_size: Option<f64>,
}

impl FitConfig {
    /// Configuration for `family` with every option at its default.
    pub fn new(family: Family) -> Self {
        Self {
            family,
            ..Self::default()
        }
    }

    pub fn with_order(mut self, order: usize) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = Some(beta);
        self
    }

    pub fn with_window_size(mut self, window_size: f64) -> Self {
        self.window_size = Some(window_size);
        self
    }

    /// Resolves the bag into a typed [`ModelSpec`].
    pub fn model(&self) -> ModelSpec {
        let alpha = self.alpha.unwrap_or(DEFAULT_ALPHA);
        match self.family {
            Family::Linear => ModelSpec::Linear,
            Family::Polynomial => ModelSpec::Polynomial {
                order: self.order.filter(|&o| o > 0).unwrap_or(DEFAULT_ORDER),
            },
            Family::Exponential => ModelSpec::Exponential,
            Family::Logarithmic => ModelSpec::Logarithmic,
            Family::Power => ModelSpec::Power,
            Family::Sinusoidal => ModelSpec::Sinusoidal,
            Family::Sma => ModelSpec::Sma {
                window_size: self.window_size.unwrap_or(DEFAULT_WINDOW_SIZE),
            },
            Family::Ema => ModelSpec::Ema { alpha },
            Family::Holts => ModelSpec::Holts {
                alpha,
                beta: self.beta.unwrap_or(DEFAULT_BETA),
            },
        }
    }
}

impl From<Family> for FitConfig {
    fn from(family: Family) -> Self {
        Self::new(family)
    }
}

/// A fully resolved model request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelSpec {
    Linear,
    Polynomial { order: usize },
    Exponential,
    Logarithmic,
    Power,
    Sinusoidal,
    Sma { window_size: f64 },
    Ema { alpha: f64 },
    Holts { alpha: f64, beta: f64 },
}

impl ModelSpec {
    /// The family this spec belongs to.
    pub fn family(&self) -> Family {
        match self {
            ModelSpec::Linear => Family::Linear,
            ModelSpec::Polynomial { .. } => Family::Polynomial,
            ModelSpec::Exponential => Family::Exponential,
            ModelSpec::Logarithmic => Family::Logarithmic,
            ModelSpec::Power => Family::Power,
            ModelSpec::Sinusoidal => Family::Sinusoidal,
            ModelSpec::Sma { .. } => Family::Sma,
            ModelSpec::Ema { .. } => Family::Ema,
            ModelSpec::Holts { .. } => Family::Holts,
        }
    }
}

impl From<Family> for ModelSpec {
    fn from(family: Family) -> Self {
        FitConfig::new(family).model()
    }
}
