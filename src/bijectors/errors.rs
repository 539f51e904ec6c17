//! bijectors::errors: error surface for bijector construction and evaluation.
//!
//! Purpose
//! -------
//! Provide [`BijectorError`] and [`BijectorResult`] for every bijector in
//! this crate. Linear-operator failures are wrapped verbatim so callers can
//! still match on the underlying [`LinOpError`].
//!
//! Key behaviors
//! -------------
//! - `From<LinOpError>` lets bijector code use `?` on operator calls.
//! - `Display` messages are prefixed with "Bijector Error:" and embed the
//!   offending shapes or values.
//! - With the `python-bindings` feature, `From<BijectorError> for PyErr`
//!   raises `ValueError` carrying the `Display` text.
//!
//! Testing notes
//! -------------
//! - Unit tests check payload embedding and the operator-error wrapping.

use crate::linalg::errors::LinOpError;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for bijector operations.
pub type BijectorResult<T> = Result<T, BijectorError>;

/// BijectorError: failures raised by bijectors.
///
/// Variants
/// --------
/// - `LinOp(LinOpError)`
///   The scale operator rejected an input or its own storage.
/// - `InvalidEventNdims { event_ndims, min_event_ndims, rank }`
///   `event_ndims` is outside `min_event_ndims ..= rank`.
/// - `IncompatibleShift { shift, target }`
///   The shift cannot be broadcast against the operator size or output.
/// - `NonFiniteShift { index, value }`
///   Argument validation found a NaN or infinite shift entry.
/// - `EventShapeMismatch { expected, found }`
///   A single-event routine received a batched result.
/// - `NonFiniteJacobian { row, col, value }`
///   A finite-difference Jacobian produced a non-finite entry.
#[derive(Debug, Clone, PartialEq)]
pub enum BijectorError {
    // ---- Operator ----
    LinOp(LinOpError),

    // ---- Shapes ----
    InvalidEventNdims {
        event_ndims: usize,
        min_event_ndims: usize,
        rank: usize,
    },
    IncompatibleShift {
        shift: Vec<usize>,
        target: Vec<usize>,
    },
    EventShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    // ---- Argument validation ----
    NonFiniteShift {
        index: usize,
        value: f64,
    },

    // ---- Numerical checks ----
    NonFiniteJacobian {
        row: usize,
        col: usize,
        value: f64,
    },
}

impl std::error::Error for BijectorError {}

impl From<LinOpError> for BijectorError {
    fn from(err: LinOpError) -> Self {
        BijectorError::LinOp(err)
    }
}

impl std::fmt::Display for BijectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Operator ----
            BijectorError::LinOp(err) => write!(f, "Bijector Error: {err}"),

            // ---- Shapes ----
            BijectorError::InvalidEventNdims { event_ndims, min_event_ndims, rank } => write!(
                f,
                "Bijector Error: event_ndims = {event_ndims} must satisfy {min_event_ndims} <= event_ndims <= {rank} (input rank)"
            ),
            BijectorError::IncompatibleShift { shift, target } => write!(
                f,
                "Bijector Error: shift of shape {shift:?} cannot be broadcast against {target:?}"
            ),
            BijectorError::EventShapeMismatch { expected, found } => write!(
                f,
                "Bijector Error: expected a single event of shape {expected:?}, got {found:?}"
            ),

            // ---- Argument validation ----
            BijectorError::NonFiniteShift { index, value } => {
                write!(f, "Bijector Error: shift entry {index} is not finite ({value})")
            }

            // ---- Numerical checks ----
            BijectorError::NonFiniteJacobian { row, col, value } => write!(
                f,
                "Bijector Error: finite-difference Jacobian entry ({row}, {col}) is not finite ({value})"
            ),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<BijectorError> for PyErr {
    fn from(err: BijectorError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Wrapping of `LinOpError` via `From` and its message.
    // - Payload embedding for shape and validation variants.
    //
    // They intentionally DO NOT cover:
    // - The `PyErr` conversion, which needs the Python C API.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Operator errors must be wrapped, not flattened.
    //
    // Given
    // -----
    // - `LinOpError::EmptyInput` converted with `?`-style `From`.
    //
    // Expect
    // ------
    // - `BijectorError::LinOp(EmptyInput)` whose message keeps the inner text.
    fn linop_errors_are_wrapped() {
        // Arrange
        let inner = LinOpError::EmptyInput;

        // Act
        let err: BijectorError = inner.clone().into();

        // Assert
        assert_eq!(err, BijectorError::LinOp(inner.clone()));
        assert!(err.to_string().contains(&inner.to_string()));
    }

    #[test]
    // Purpose
    // -------
    // `InvalidEventNdims` reports the requested value and the valid range.
    //
    // Given
    // -----
    // - event_ndims = 3, min = 1, rank = 2.
    //
    // Expect
    // ------
    // - The message contains all three numbers.
    fn invalid_event_ndims_reports_range() {
        let err = BijectorError::InvalidEventNdims { event_ndims: 3, min_event_ndims: 1, rank: 2 };
        let msg = err.to_string();
        assert!(msg.contains("event_ndims = 3"), "unexpected message: {msg}");
        assert!(msg.contains("1 <= event_ndims <= 2"), "unexpected message: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Shift errors carry both shapes.
    //
    // Given
    // -----
    // - Shift `[4]` against target `[3]`.
    //
    // Expect
    // ------
    // - Both shapes appear in the message.
    fn incompatible_shift_reports_shapes() {
        let err = BijectorError::IncompatibleShift { shift: vec![4], target: vec![3] };
        let msg = err.to_string();
        assert!(msg.contains("[4]") && msg.contains("[3]"), "unexpected message: {msg}");
    }
}
