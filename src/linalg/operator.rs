//! linalg::operator: the `LinearOperator` abstraction.
//!
//! Purpose
//! -------
//! Describe a (batch of) square real matrices without committing to a
//! storage format. Each operator supports matrix–vector products, linear
//! solves, and the log-absolute-determinant, which is all an affine
//! bijector needs.
//!
//! Key behaviors
//! -------------
//! - [`LinearOperator::matvec`] and [`LinearOperator::solvevec`] take inputs
//!   of shape `[X..., n]` and broadcast `X` against the operator's batch
//!   shape `B`, returning `[broadcast(X, B)..., n]`.
//! - [`LinearOperator::log_abs_determinant`] returns one value per batch
//!   member, shaped like `B`.
//! - `adjoint = true` applies the adjoint (the transpose, as all operators
//!   here are real).
//!
//! Invariants & assumptions
//! ------------------------
//! - Operators are immutable after construction and are `Send + Sync`.
//! - Solves against an operator with an exactly zero diagonal entry return
//!   [`LinOpError::Singular`]; `log_abs_determinant` reports `-inf` for the
//!   same operator instead of failing.
//! - [`LinearOperator::assert_non_singular`] is the explicit validation
//!   hook used when callers opt into argument validation.
use crate::linalg::{
    broadcast::broadcast_shapes,
    errors::{LinOpError, LinOpResult},
};
use ndarray::{ArrayD, ArrayViewD};

/// A batch of square linear maps `ℝⁿ → ℝⁿ`.
pub trait LinearOperator: std::fmt::Debug + Send + Sync {
    /// Short name used in error messages and diagnostics.
    fn name(&self) -> &'static str;

    /// Leading batch axes of the operator storage.
    fn batch_shape(&self) -> &[usize];

    /// Number of rows `n`, or `None` when the operator conforms to any size.
    fn num_rows(&self) -> Option<usize>;

    /// Compute `A·x` (or `Aᵀ·x` when `adjoint`) for every batch member.
    fn matvec(&self, x: ArrayViewD<'_, f64>, adjoint: bool) -> LinOpResult<ArrayD<f64>>;

    /// Solve `A·x = rhs` (or `Aᵀ·x = rhs` when `adjoint`) for every batch member.
    fn solvevec(&self, rhs: ArrayViewD<'_, f64>, adjoint: bool) -> LinOpResult<ArrayD<f64>>;

    /// `log|det A|` per batch member, shaped like [`LinearOperator::batch_shape`].
    fn log_abs_determinant(&self) -> ArrayD<f64>;

    /// Fail unless every batch member is finite and invertible.
    fn assert_non_singular(&self) -> LinOpResult<()>;

    /// Materialize the operator as `[B..., n, n]` dense storage.
    fn to_dense(&self) -> LinOpResult<ArrayD<f64>>;
}

/// Validate a vector input against `num_rows` and return the broadcast
/// batch shape of the output together with the vector length.
///
/// # Errors
/// - [`LinOpError::EmptyInput`] for rank-0 inputs.
/// - [`LinOpError::DimensionMismatch`] when the trailing axis differs from
///   `num_rows`.
/// - [`LinOpError::IncompatibleBatchShapes`] when the input batch does not
///   broadcast against `op_batch`.
pub(crate) fn conform_input(
    x: &ArrayViewD<'_, f64>, num_rows: Option<usize>, op_batch: &[usize],
) -> LinOpResult<(Vec<usize>, usize)> {
    let shape = x.shape();
    let Some((&n, x_batch)) = shape.split_last() else {
        return Err(LinOpError::EmptyInput);
    };
    if let Some(expected) = num_rows {
        if expected != n {
            return Err(LinOpError::DimensionMismatch { expected, found: n });
        }
    }
    let out_batch = broadcast_shapes(x_batch, op_batch)?;
    Ok((out_batch, n))
}
