//! rust_bijectors: affine bijectors over batched linear operators, with
//! Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the affine bijector to Python via the `_rust_bijectors`
//! extension module. When the `python-bindings` feature is enabled, this
//! module defines the Python-facing `AffineLinearOperator` class.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`linalg`, `bijectors`,
//!   `distributions`) as the public crate surface.
//! - Define the `#[pyclass]` wrapper and the `#[pymodule]` initializer for
//!   the `_rust_bijectors` Python extension.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs only
//!   FFI glue, input conversion and error mapping.
//! - The Python class wraps `AffineLinearOperator<ScaleOperator>`, so every
//!   scale kind shares one type and one set of invariants.
//!
//! Conventions
//! -----------
//! - Arrays are float64 with the event (vector) axis last; operator batch
//!   axes align with input batch axes from the right.
//! - Errors from core Rust code are propagated as rich error types and
//!   converted to `ValueError` at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on the inner modules directly:
//!
//!     use rust_bijectors::bijectors::prelude::*;
//!     use rust_bijectors::linalg::prelude::*;
//!
//! - The Python packaging layer imports `_rust_bijectors` and may wrap the
//!   class in a thin pure-Python facade.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules and by the
//!   integration tests under `tests/`.
//! - The PyO3 glue is exercised from Python; it has no Rust-side tests.

pub mod bijectors;
pub mod distributions;
pub mod linalg;
#[cfg(feature = "obs_slog")]
pub mod observe;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::PyArrayDyn;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    bijectors::{AffineLinearOperator, AffineOptions, Bijector},
    linalg::{LinearOperator, ScaleOperator},
    utils::{arrayd_into_py, build_scale_operator, extract_f64_arrayd},
};

/// AffineLinearOperator: Python-facing wrapper for the affine bijector.
///
/// Purpose
/// -------
/// Expose `y = scale·x + shift` to Python callers while preserving the
/// Rust-side validation and error handling.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `AffineLinearOperator(shift=None, scale=None, scale_kind="diag",
/// num_rows=None, adjoint=False, validate_args=False, name=None,
/// verbose=False)`:
/// - `shift`: array-like `[B..., n]` or `None`.
/// - `scale`: array-like interpreted according to `scale_kind`
///   (`"diag"`, `"tril"`, `"scaled_identity"`, `"identity"`); `None`
///   means the identity.
/// - `num_rows`: operator size; required for `"scaled_identity"` and
///   inferred from `shift` for an identity scale.
/// - `adjoint`: use `scaleᵀ` in both directions.
/// - `validate_args`: reject singular scales and non-finite shifts.
/// - `name`: bijector name; defaults to `"affine_linear_operator"`.
/// - `verbose`: emit a construction record when built with `obs_slog`.
///
/// Fields
/// ------
/// - `inner`: `AffineLinearOperator<ScaleOperator>`
///
/// Notes
/// -----
/// - Native Rust callers should use [`AffineLinearOperator`] directly.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "AffineLinearOperator", module = "rust_bijectors")]
pub struct PyAffineLinearOperator {
    inner: AffineLinearOperator<ScaleOperator>,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyAffineLinearOperator {
    #[new]
    #[pyo3(
        signature = (
            shift = None,
            scale = None,
            scale_kind = "diag",
            num_rows = None,
            adjoint = false,
            validate_args = false,
            name = None,
            verbose = false,
        ),
        text_signature = "(shift=None, scale=None, scale_kind='diag', num_rows=None, \
                          adjoint=False, validate_args=False, name=None, verbose=False)"
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn new<'py>(
        py: Python<'py>, shift: Option<&Bound<'py, PyAny>>, scale: Option<&Bound<'py, PyAny>>,
        scale_kind: &str, num_rows: Option<usize>, adjoint: bool, validate_args: bool,
        name: Option<&str>, verbose: bool,
    ) -> PyResult<Self> {
        let shift = shift.map(|s| extract_f64_arrayd(py, s)).transpose()?;
        let scale = scale.map(|s| extract_f64_arrayd(py, s)).transpose()?;

        // An identity scale takes its size from the shift.
        let num_rows = match (num_rows, &scale, &shift) {
            (None, None, Some(s)) => s.shape().last().copied().filter(|&n| n > 1),
            (n, _, _) => n,
        };
        let op = build_scale_operator(scale, scale_kind, num_rows)?;
        let opts = AffineOptions::new(validate_args, adjoint, name, verbose);
        let inner = AffineLinearOperator::new(shift, op, opts)?;
        Ok(PyAffineLinearOperator { inner })
    }

    #[pyo3(text_signature = "(self, x, /)")]
    pub fn forward<'py>(
        &self, py: Python<'py>, x: &Bound<'py, PyAny>,
    ) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
        let x = extract_f64_arrayd(py, x)?;
        let y = self.inner.forward(x.view())?;
        arrayd_into_py(py, y)
    }

    #[pyo3(text_signature = "(self, y, /)")]
    pub fn inverse<'py>(
        &self, py: Python<'py>, y: &Bound<'py, PyAny>,
    ) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
        let y = extract_f64_arrayd(py, y)?;
        let x = self.inner.inverse(y.view())?;
        arrayd_into_py(py, x)
    }

    #[pyo3(signature = (x, event_ndims = 1), text_signature = "(self, x, /, event_ndims=1)")]
    pub fn forward_log_det_jacobian<'py>(
        &self, py: Python<'py>, x: &Bound<'py, PyAny>, event_ndims: usize,
    ) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
        let x = extract_f64_arrayd(py, x)?;
        let fldj = self.inner.forward_log_det_jacobian(x.view(), event_ndims)?;
        arrayd_into_py(py, fldj)
    }

    #[pyo3(signature = (y, event_ndims = 1), text_signature = "(self, y, /, event_ndims=1)")]
    pub fn inverse_log_det_jacobian<'py>(
        &self, py: Python<'py>, y: &Bound<'py, PyAny>, event_ndims: usize,
    ) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
        let y = extract_f64_arrayd(py, y)?;
        let ildj = self.inner.inverse_log_det_jacobian(y.view(), event_ndims)?;
        arrayd_into_py(py, ildj)
    }

    #[getter]
    pub fn name(&self) -> String {
        self.inner.name().to_string()
    }

    #[getter]
    pub fn scale_kind(&self) -> &'static str {
        self.inner.scale().name()
    }

    #[getter]
    pub fn adjoint(&self) -> bool {
        self.inner.adjoint()
    }

    #[getter]
    pub fn validate_args(&self) -> bool {
        self.inner.options().validate_args
    }

    #[getter]
    pub fn forward_min_event_ndims(&self) -> usize {
        self.inner.forward_min_event_ndims()
    }

    #[getter]
    pub fn is_constant_jacobian(&self) -> bool {
        self.inner.is_constant_jacobian()
    }

    fn __repr__(&self) -> String {
        format!(
            "AffineLinearOperator(name='{}', scale_kind='{}', num_rows={:?}, adjoint={})",
            self.inner.name(),
            self.inner.scale().name(),
            self.inner.scale().num_rows(),
            self.inner.adjoint(),
        )
    }
}

/// Python module initializer for `_rust_bijectors`.
///
/// Invoked by Python when importing the compiled extension; registers the
/// `AffineLinearOperator` class.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_bijectors<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<PyAffineLinearOperator>()?;
    m.add("DEFAULT_AFFINE_NAME", bijectors::DEFAULT_AFFINE_NAME)?;
    Ok(())
}
