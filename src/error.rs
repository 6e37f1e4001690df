//! Error types for the fitting pipeline.
//!
//! Errors never cross the public API: [`crate::engine::TrendEngine`] turns
//! every [`FitError`] into `None`. They exist so that a
//! [`RegressionSolver`](crate::regression::RegressionSolver) can say *why*
//! a fit was refused, which the engine records through `tracing`.

use thiserror::Error;

/// Reasons a single fit attempt can fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    /// Not enough observations for the requested family.
    #[error("insufficient data: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// The requested family name is not one of the supported families.
    #[error("unknown trend family '{0}'")]
    UnknownFamily(String),

    /// The input violates a precondition of the family (e.g. `x <= 0` for a
    /// logarithmic fit).
    #[error("{family} fit requires {reason}")]
    DomainViolation {
        family: &'static str,
        reason: &'static str,
    },

    /// The normal equations have no unique solution.
    #[error("{family} fit is singular")]
    SingularSystem { family: &'static str },

    /// The solver produced NaN or infinite coefficients.
    #[error("{family} fit produced non-finite coefficients")]
    NonFinite { family: &'static str },
}

/// Convenience alias used by the solver seam.
pub type Result<T> = std::result::Result<T, FitError>;
