//! Finite-difference check of a bijector's log-det-Jacobian.
//!
//! Bijectors report their Jacobian analytically. For a single event `x` of
//! shape `[n]` this module rebuilds `∂f/∂x` with central differences
//! (`finitediff`) and returns `log|det J|`, which must agree with
//! `forward_log_det_jacobian(x, 1)` up to discretization error.
//!
//! The difference closure has to return a plain `Array1<f64>`, so any error
//! raised by `forward` is captured in a `RefCell` slot and the closure
//! returns NaNs; the captured error is surfaced after differencing.
use std::cell::RefCell;

use crate::bijectors::{
    errors::{BijectorError, BijectorResult},
    traits::Bijector,
};
use finitediff::FiniteDiff;
use nalgebra::DMatrix;
use ndarray::{Array1, ArrayView1};

/// `log|det ∂f/∂x|` at a single event `x`, by central differences.
///
/// # Errors
/// - Any error raised by `bijector.forward` at or near `x`.
/// - [`BijectorError::EventShapeMismatch`] when `forward` does not map an
///   `[n]` event to an `[n]` event (e.g. a batched shift widened it).
/// - [`BijectorError::NonFiniteJacobian`] when a difference quotient is
///   NaN or infinite.
pub fn numerical_log_det_jacobian<B: Bijector + ?Sized>(
    bijector: &B, x: ArrayView1<'_, f64>,
) -> BijectorResult<f64> {
    let n = x.len();
    let closure_err: RefCell<Option<BijectorError>> = RefCell::new(None);
    let forward = |point: &Array1<f64>| -> Array1<f64> {
        let mapped = bijector.forward(point.view().into_dyn()).and_then(|y| {
            if y.ndim() != 1 || y.len() != n {
                return Err(BijectorError::EventShapeMismatch {
                    expected: vec![n],
                    found: y.shape().to_vec(),
                });
            }
            Ok(y.iter().copied().collect::<Array1<f64>>())
        });
        match mapped {
            Ok(y) => y,
            Err(e) => {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                Array1::from_elem(n, f64::NAN)
            }
        }
    };

    let jacobian = x.to_owned().central_jacobian(&forward);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    if let Some(((row, col), &value)) = jacobian.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(BijectorError::NonFiniteJacobian { row, col, value });
    }
    if jacobian.dim() != (n, n) {
        return Err(BijectorError::EventShapeMismatch {
            expected: vec![n, n],
            found: jacobian.shape().to_vec(),
        });
    }

    let dense = DMatrix::from_row_iterator(n, n, jacobian.iter().copied());
    Ok(dense.determinant().abs().ln())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bijectors::{affine::AffineLinearOperator, options::AffineOptions},
        linalg::{diag::Diag, lower_triangular::LowerTriangular},
    };
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Agreement between the analytic and finite-difference Jacobians for
    //   diagonal and lower-triangular affine maps (with and without adjoint).
    // - Error capture when `forward` fails inside the difference closure.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The analytic fldj of a lower-triangular affine map matches central
    // differences.
    //
    // Given
    // -----
    // - L = [[3, 0, 0], [2, -1, 0], [3, 2, 1]], shift = [-1, 0, 1],
    //   x = [0.5, -1.0, 2.0], both with and without adjoint.
    //
    // Expect
    // ------
    // - `numerical_log_det_jacobian(x) ≈ fldj(x, 1) = ln 3` within 1e-6.
    fn tril_matches_analytic_jacobian() {
        for adjoint in [false, true] {
            // Arrange
            let tril = array![[3.0, 0.0, 0.0], [2.0, -1.0, 0.0], [3.0, 2.0, 1.0]].into_dyn();
            let scale = LowerTriangular::new(tril).unwrap();
            let opts = AffineOptions::new(true, adjoint, None, false);
            let affine =
                AffineLinearOperator::new(Some(array![-1.0, 0.0, 1.0].into_dyn()), scale, opts)
                    .unwrap();
            let x = array![0.5, -1.0, 2.0];

            // Act
            let numerical = numerical_log_det_jacobian(&affine, x.view()).unwrap();
            let analytic = affine.forward_log_det_jacobian(x.view().into_dyn(), 1).unwrap();

            // Assert
            assert_relative_eq!(numerical, analytic.sum(), epsilon = 1e-6);
            assert_relative_eq!(numerical, 3.0_f64.ln(), epsilon = 1e-6);
        }
    }

    #[test]
    // Purpose
    // -------
    // Diagonal scales with negative entries use the absolute determinant.
    //
    // Given
    // -----
    // - diag = [2, -0.5, 4], x = [1, 1, 1].
    //
    // Expect
    // ------
    // - ln|2 · -0.5 · 4| = ln 4.
    fn diag_uses_absolute_determinant() {
        let scale = Diag::new(array![2.0, -0.5, 4.0].into_dyn()).unwrap();
        let affine = AffineLinearOperator::new(None, scale, AffineOptions::default()).unwrap();
        let numerical = numerical_log_det_jacobian(&affine, array![1.0, 1.0, 1.0].view()).unwrap();
        assert_relative_eq!(numerical, 4.0_f64.ln(), epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Errors raised by `forward` inside the difference closure are surfaced.
    //
    // Given
    // -----
    // - A 3-dim diagonal map evaluated at a length-2 point.
    //
    // Expect
    // ------
    // - `LinOp(DimensionMismatch)` instead of a NaN-filled Jacobian.
    fn forward_errors_are_captured() {
        let scale = Diag::new(array![1.0, 2.0, 3.0].into_dyn()).unwrap();
        let affine = AffineLinearOperator::new(None, scale, AffineOptions::default()).unwrap();
        let err = numerical_log_det_jacobian(&affine, array![1.0, 2.0].view()).unwrap_err();
        assert!(matches!(err, BijectorError::LinOp(_)), "unexpected error: {err}");
    }

    #[test]
    // Purpose
    // -------
    // A forward map that widens the event is rejected.
    //
    // Given
    // -----
    // - Identity scale with a `[2, 2]` batched shift and x of shape `[2]`.
    //
    // Expect
    // ------
    // - `EventShapeMismatch`.
    fn batched_output_is_rejected() {
        let shift = array![[0.0, 1.0], [2.0, 3.0]].into_dyn();
        let affine = AffineLinearOperator::identity(Some(shift), AffineOptions::default()).unwrap();
        let err = numerical_log_det_jacobian(&affine, array![1.0, 2.0].view()).unwrap_err();
        assert!(matches!(err, BijectorError::EventShapeMismatch { .. }), "unexpected error: {err}");
    }
}
