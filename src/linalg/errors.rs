//! linalg::errors: error surface for linear-operator construction and use.
//!
//! Purpose
//! -------
//! Collect every failure a linear operator can raise (malformed storage,
//! non-conformant inputs, batch shapes that do not broadcast, singular
//! matrices) into one enum, [`LinOpError`], with a shared result alias
//! [`LinOpResult`].
//!
//! Conventions
//! -----------
//! - Shape payloads are carried as owned `Vec<usize>` so messages can
//!   report the offending shapes verbatim.
//! - Singularity is reported with the flat batch index and the diagonal
//!   position of the offending entry, which is enough to locate it in the
//!   caller's storage.
//! - Higher layers (the bijectors) wrap this type rather than re-declaring
//!   its variants.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Crate-wide result alias for linear-operator routines.
pub type LinOpResult<T> = Result<T, LinOpError>;

/// Error conditions raised by linear operators.
#[derive(Debug, Clone, PartialEq)]
pub enum LinOpError {
    // ---- Input shape ----
    /// Inputs must have at least one axis (the vector axis).
    EmptyInput,

    /// The trailing axis of an input does not match the operator size.
    DimensionMismatch {
        expected: usize,
        found: usize,
    },

    /// Batch shapes cannot be broadcast together.
    IncompatibleBatchShapes {
        left: Vec<usize>,
        right: Vec<usize>,
    },

    // ---- Operator storage ----
    /// Matrix storage must be square in its two trailing axes.
    NotSquare {
        shape: Vec<usize>,
    },

    /// Diagonal or multiplier storage has the wrong rank.
    InvalidStorageRank {
        operator: &'static str,
        min_rank: usize,
        found: usize,
    },

    /// The operator has no fixed size, so it cannot be materialized.
    UnknownSize {
        operator: &'static str,
    },

    /// An operator was declared with zero rows.
    ZeroSize {
        operator: &'static str,
    },

    /// Storage entries must be finite.
    NonFinite {
        operator: &'static str,
        value: f64,
    },

    // ---- Non-singularity ----
    /// A diagonal entry is zero, so the operator is not invertible.
    Singular {
        operator: &'static str,
        batch_index: usize,
        position: usize,
    },

    // ---- Anyhow catchall ----
    /// Backend failures (currently `ndarray` reshapes) carried with their
    /// context chain.
    Anyhow(String),
}

impl std::error::Error for LinOpError {}

impl From<anyhow::Error> for LinOpError {
    fn from(err: anyhow::Error) -> Self {
        LinOpError::Anyhow(format!("{err:#}"))
    }
}

impl From<ndarray::ShapeError> for LinOpError {
    fn from(err: ndarray::ShapeError) -> Self {
        anyhow::Error::new(err).context("reshape failed").into()
    }
}

impl std::fmt::Display for LinOpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input shape ----
            LinOpError::EmptyInput => {
                write!(f, "LinOp Error: input must have at least one axis")
            }
            LinOpError::DimensionMismatch { expected, found } => write!(
                f,
                "LinOp Error: trailing axis has size {found}, operator expects {expected}"
            ),
            LinOpError::IncompatibleBatchShapes { left, right } => write!(
                f,
                "LinOp Error: batch shapes {left:?} and {right:?} cannot be broadcast"
            ),

            // ---- Operator storage ----
            LinOpError::NotSquare { shape } => {
                write!(f, "LinOp Error: matrix storage {shape:?} is not square")
            }
            LinOpError::InvalidStorageRank { operator, min_rank, found } => write!(
                f,
                "LinOp Error: {operator} storage needs rank >= {min_rank}, got rank {found}"
            ),
            LinOpError::UnknownSize { operator } => {
                write!(f, "LinOp Error: {operator} has no fixed number of rows")
            }
            LinOpError::ZeroSize { operator } => {
                write!(f, "LinOp Error: {operator} must have at least one row")
            }
            LinOpError::NonFinite { operator, value } => {
                write!(f, "LinOp Error: {operator} storage holds non-finite value {value}")
            }

            // ---- Non-singularity ----
            LinOpError::Singular { operator, batch_index, position } => write!(
                f,
                "LinOp Error: {operator} is singular (zero diagonal at position {position} of batch member {batch_index})"
            ),

            // ---- Anyhow catchall ----
            LinOpError::Anyhow(msg) => write!(f, "LinOp Error: {msg}"),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<LinOpError> for PyErr {
    fn from(err: LinOpError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
