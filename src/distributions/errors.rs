//! distributions::errors: failures raised by transformed distributions.
//!
//! Bijector failures are wrapped as-is; base-distribution parameter errors
//! from `statrs` are flattened to a message since `NormalError` carries no
//! payload worth matching on.

use crate::{bijectors::errors::BijectorError, linalg::errors::LinOpError};
use statrs::distribution::NormalError;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type DistributionResult<T> = Result<T, DistributionError>;

/// DistributionError: failures from transformed distributions.
///
/// Variants
/// --------
/// - `Bijector(BijectorError)`
///   The bijector rejected the sample (shape, singular scale, ...).
/// - `InvalidBase { reason }`
///   The base distribution parameters are invalid (e.g. `scale <= 0`).
#[derive(Debug, Clone, PartialEq)]
pub enum DistributionError {
    // ---- Bijector ----
    Bijector(BijectorError),

    // ---- Base distribution ----
    InvalidBase { reason: String },
}

impl std::error::Error for DistributionError {}

impl From<BijectorError> for DistributionError {
    fn from(err: BijectorError) -> Self {
        DistributionError::Bijector(err)
    }
}

impl From<LinOpError> for DistributionError {
    fn from(err: LinOpError) -> Self {
        DistributionError::Bijector(BijectorError::LinOp(err))
    }
}

impl From<NormalError> for DistributionError {
    fn from(err: NormalError) -> Self {
        DistributionError::InvalidBase { reason: err.to_string() }
    }
}

impl std::fmt::Display for DistributionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistributionError::Bijector(err) => write!(f, "Distribution Error: {err}"),
            DistributionError::InvalidBase { reason } => {
                write!(f, "Distribution Error: invalid base distribution: {reason}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<DistributionError> for PyErr {
    fn from(err: DistributionError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
