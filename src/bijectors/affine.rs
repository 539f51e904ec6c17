//! bijectors::affine: `y = scale·x + shift` with a linear-operator scale.
//!
//! Purpose
//! -------
//! Implement the affine bijector whose scale is any [`LinearOperator`]
//! (identity, scaled identity, diagonal, lower-triangular). This is the
//! reparameterization behind location–scale families: pushing a standard
//! normal through it with a lower-triangular scale gives a multivariate
//! normal with Cholesky factor `L`.
//!
//! Key behaviors
//! -------------
//! - `forward(x) = scale·x + shift` and `inverse(y) = scale⁻¹(y − shift)`,
//!   with `scaleᵀ` in both when the `adjoint` option is set.
//! - `inverse_log_det_jacobian(y, k) = −log|det scale|`, tiled and summed
//!   over the `k − 1` event axes beyond the vector axis.
//! - `forward_log_det_jacobian(x, k) = −inverse_log_det_jacobian(forward(x), k)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The scale must be non-singular for `inverse` and the Jacobian to be
//!   meaningful. With `validate_args` this is checked at construction;
//!   otherwise a singular diagonal yields `−inf` log-determinants and solves
//!   fail with [`LinOpError::Singular`](crate::linalg::errors::LinOpError::Singular).
//! - The shift's trailing axis must be 1 or the operator size; any leading
//!   axes broadcast against the output batch.
//! - Shape errors are always reported as [`BijectorError`] values.
//!
//! Conventions
//! -----------
//! - Inputs carry the event (vector) axis last: `[X..., n]`.
//! - Operator batches align with input batches from the right, so a batch
//!   of two operators applied to an input of shape `[2, 2, n]` pairs
//!   operator `j` with `x[i, j]`.
//! - The Jacobian is constant; its shape is the operator batch shape (after
//!   reduction), not the input batch shape.
//!
//! Downstream usage
//! ----------------
//! - Build with [`AffineLinearOperator::new`] (any scale) or
//!   [`AffineLinearOperator::identity`] (shift only), then call the
//!   [`Bijector`] methods.
//! - [`TransformedNormal`](crate::distributions::TransformedNormal) uses
//!   the inverse and its Jacobian to evaluate densities.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the identity, diagonal and lower-triangular
//!   scenarios, the adjoint option, argument validation and shape errors.
//! - `tests/integration_affine_bijector.rs` repeats the canonical scenarios
//!   through the public surface only.
use crate::{
    bijectors::{
        errors::{BijectorError, BijectorResult},
        jacobian::{reduce_jacobian_over_event, validate_event_ndims},
        options::AffineOptions,
        traits::Bijector,
    },
    linalg::{
        broadcast::broadcast_shapes,
        errors::LinOpError,
        identity::Identity,
        operator::LinearOperator,
    },
};
use ndarray::{ArrayD, ArrayViewD, IxDyn};

/// Vector axis only: the affine map acts on rank-1 events.
const MIN_EVENT_NDIMS: usize = 1;

/// AffineLinearOperator: the bijector `y = scale·x + shift`.
///
/// Fields
/// ------
/// - `shift`: `Option<ArrayD<f64>>`
///   Additive offset, broadcast against the output; `None` means zero.
/// - `scale`: `O`
///   Linear operator applied before the shift.
/// - `opts`: [`AffineOptions`]
///   Name, adjoint flag, validation and verbosity settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineLinearOperator<O: LinearOperator = Identity> {
    shift: Option<ArrayD<f64>>,
    scale: O,
    opts: AffineOptions,
}

impl AffineLinearOperator<Identity> {
    /// Shift-only bijector (`scale = I`).
    ///
    /// The identity is sized from the shift when one is given, so inputs of
    /// the wrong length are still rejected.
    pub fn identity(shift: Option<ArrayD<f64>>, opts: AffineOptions) -> BijectorResult<Self> {
        let num_rows = shift.as_ref().and_then(|s| s.shape().last().copied()).filter(|&n| n > 1);
        AffineLinearOperator::new(shift, Identity::new(num_rows), opts)
    }
}

impl<O: LinearOperator> AffineLinearOperator<O> {
    /// Build the bijector from an optional shift and a scale operator.
    ///
    /// # Errors
    /// - [`BijectorError::IncompatibleShift`] when the shift's trailing axis
    ///   is neither 1 nor the operator size.
    /// - With `opts.validate_args`:
    ///   - [`BijectorError::LinOp`] wrapping `Singular` / `NonFinite` from
    ///     [`LinearOperator::assert_non_singular`],
    ///   - [`BijectorError::NonFiniteShift`] for NaN or infinite shifts.
    ///
    /// # Examples
    /// ```rust
    /// # use ndarray::array;
    /// # use rust_bijectors::bijectors::{AffineLinearOperator, AffineOptions, Bijector};
    /// # use rust_bijectors::linalg::Diag;
    /// let scale = Diag::new(array![2.0, 4.0].into_dyn()).unwrap();
    /// let shift = array![1.0, -1.0].into_dyn();
    /// let affine = AffineLinearOperator::new(Some(shift), scale, AffineOptions::validated()).unwrap();
    ///
    /// let y = affine.forward(array![1.0, 1.0].into_dyn().view()).unwrap();
    /// assert_eq!(y, array![3.0, 3.0].into_dyn());
    /// ```
    pub fn new(shift: Option<ArrayD<f64>>, scale: O, opts: AffineOptions) -> BijectorResult<Self> {
        if let (Some(s), Some(n)) = (shift.as_ref(), scale.num_rows()) {
            if let Some(&last) = s.shape().last() {
                if last != n && last != 1 {
                    return Err(BijectorError::IncompatibleShift {
                        shift: s.shape().to_vec(),
                        target: vec![n],
                    });
                }
            }
        }
        if opts.validate_args {
            scale.assert_non_singular()?;
            if let Some(s) = shift.as_ref() {
                if let Some((index, &value)) = s.iter().enumerate().find(|(_, v)| !v.is_finite()) {
                    return Err(BijectorError::NonFiniteShift { index, value });
                }
            }
        }
        let bijector = AffineLinearOperator { shift, scale, opts };
        #[cfg(feature = "obs_slog")]
        if bijector.opts.verbose {
            bijector.log_construction();
        }
        Ok(bijector)
    }

    pub fn shift(&self) -> Option<&ArrayD<f64>> {
        self.shift.as_ref()
    }

    pub fn scale(&self) -> &O {
        &self.scale
    }

    pub fn options(&self) -> &AffineOptions {
        &self.opts
    }

    pub fn adjoint(&self) -> bool {
        self.opts.adjoint
    }

    /// Add `sign · shift` to `values`, growing `values` if the shift has
    /// extra leading batch axes.
    fn apply_shift(&self, values: ArrayD<f64>, sign: f64) -> BijectorResult<ArrayD<f64>> {
        let Some(shift) = self.shift.as_ref() else {
            return Ok(values);
        };
        let values_shape = values.shape().to_vec();
        let incompatible = || BijectorError::IncompatibleShift {
            shift: shift.shape().to_vec(),
            target: values_shape.clone(),
        };
        let target = broadcast_shapes(&values_shape, shift.shape()).map_err(|_| incompatible())?;
        let mut out = if target == values_shape {
            values
        } else {
            values.broadcast(IxDyn(&target)).ok_or_else(incompatible)?.to_owned()
        };
        out.zip_mut_with(shift, |v, &s| *v += sign * s);
        Ok(out)
    }

    #[cfg(feature = "obs_slog")]
    fn log_construction(&self) {
        let logger = crate::observe::terminal_logger();
        slog::info!(logger, "affine bijector constructed";
            "name" => self.opts.name.as_str(),
            "scale" => self.scale.name(),
            "num_rows" => format!("{:?}", self.scale.num_rows()),
            "batch_shape" => format!("{:?}", self.scale.batch_shape()),
            "shift_shape" => format!("{:?}", self.shift.as_ref().map(|s| s.shape().to_vec())),
            "adjoint" => self.opts.adjoint,
            "validated" => self.opts.validate_args
        );
    }
}

impl<O: LinearOperator> Bijector for AffineLinearOperator<O> {
    fn name(&self) -> &str {
        &self.opts.name
    }

    fn forward_min_event_ndims(&self) -> usize {
        MIN_EVENT_NDIMS
    }

    fn is_constant_jacobian(&self) -> bool {
        true
    }

    fn forward(&self, x: ArrayViewD<'_, f64>) -> BijectorResult<ArrayD<f64>> {
        let scaled = self.scale.matvec(x, self.opts.adjoint)?;
        self.apply_shift(scaled, 1.0)
    }

    fn inverse(&self, y: ArrayViewD<'_, f64>) -> BijectorResult<ArrayD<f64>> {
        let centered = self.apply_shift(y.to_owned(), -1.0)?;
        Ok(self.scale.solvevec(centered.view(), self.opts.adjoint)?)
    }

    fn inverse_log_det_jacobian(
        &self, y: ArrayViewD<'_, f64>, event_ndims: usize,
    ) -> BijectorResult<ArrayD<f64>> {
        validate_event_ndims(y.ndim(), event_ndims, MIN_EVENT_NDIMS)?;
        if let (Some(expected), Some(&found)) = (self.scale.num_rows(), y.shape().last()) {
            if expected != found {
                return Err(LinOpError::DimensionMismatch { expected, found }.into());
            }
        }
        let ildj = -self.scale.log_abs_determinant();
        reduce_jacobian_over_event(ildj, y.shape(), MIN_EVENT_NDIMS, event_ndims)
    }
}
