//! The `Bijector` trait.
//!
//! A bijector is an invertible map `y = f(x)` with a tractable Jacobian,
//! used to push densities through a change of variables:
//! `log p_Y(y) = log p_X(f⁻¹(y)) + ildj(y)`.
//!
//! Shapes follow the usual batch/event split. The trailing `event_ndims`
//! axes of an input form one event; Jacobian terms are summed over the
//! event axes beyond [`Bijector::forward_min_event_ndims`].
use crate::bijectors::{errors::BijectorResult, jacobian::validate_event_ndims};
use ndarray::{ArrayD, ArrayViewD};

/// An invertible, differentiable map with log-determinant Jacobians.
pub trait Bijector {
    fn name(&self) -> &str;

    /// Smallest event rank the bijector acts on (1 for vector maps).
    fn forward_min_event_ndims(&self) -> usize;

    /// `true` when the Jacobian does not depend on the input values.
    fn is_constant_jacobian(&self) -> bool {
        false
    }

    fn forward(&self, x: ArrayViewD<'_, f64>) -> BijectorResult<ArrayD<f64>>;

    fn inverse(&self, y: ArrayViewD<'_, f64>) -> BijectorResult<ArrayD<f64>>;

    /// `log|det ∂f⁻¹/∂y|`, summed over the event axes beyond the minimum.
    fn inverse_log_det_jacobian(
        &self, y: ArrayViewD<'_, f64>, event_ndims: usize,
    ) -> BijectorResult<ArrayD<f64>>;

    /// `log|det ∂f/∂x|`, defined as `-ildj(forward(x))`.
    ///
    /// `event_ndims` is checked against the rank of `x`; a batched bijector
    /// may return a `forward(x)` of higher rank.
    fn forward_log_det_jacobian(
        &self, x: ArrayViewD<'_, f64>, event_ndims: usize,
    ) -> BijectorResult<ArrayD<f64>> {
        validate_event_ndims(x.ndim(), event_ndims, self.forward_min_event_ndims())?;
        let y = self.forward(x)?;
        Ok(-self.inverse_log_det_jacobian(y.view(), event_ndims)?)
    }
}
