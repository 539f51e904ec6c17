//! Python conversion helpers for the `_rust_bijectors` extension.
//!
//! Arrays cross the FFI boundary as flat `f64` buffers plus a shape, so the
//! helpers do not depend on which `ndarray` version `numpy` links against.
#[cfg(feature = "python-bindings")]
use ndarray::{ArrayD, IxDyn};

#[cfg(feature = "python-bindings")]
use numpy::{PyArray1, PyArrayDyn, PyArrayMethods, PyReadonlyArrayDyn, PyUntypedArrayMethods};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::linalg::{
    Diag, Identity, LinOpError, LinearOperator, LowerTriangular, ScaleOperator, ScaledIdentity,
};

/// Copy a Python array-like into an owned `ArrayD<f64>`.
///
/// Accepts float64 ndarrays of any rank directly; anything else (nested
/// lists, integer arrays, Python floats) goes through `numpy.asarray(.., "float64")`.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_arrayd<'py>(py: Python<'py>, raw: &Bound<'py, PyAny>) -> PyResult<ArrayD<f64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArrayDyn<f64>>() {
        return readonly_to_arrayd(&arr);
    }
    let converted = py.import("numpy")?.call_method1("asarray", (raw, "float64")).map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err("expected a numpy.ndarray or nested sequence of float64")
    })?;
    let arr = converted.extract::<PyReadonlyArrayDyn<f64>>()?;
    readonly_to_arrayd(&arr)
}

#[cfg(feature = "python-bindings")]
fn readonly_to_arrayd(arr: &PyReadonlyArrayDyn<'_, f64>) -> PyResult<ArrayD<f64>> {
    let shape = arr.shape().to_vec();
    let data: Vec<f64> = arr.as_array().iter().copied().collect();
    ArrayD::from_shape_vec(IxDyn(&shape), data)
        .map_err(|e| PyErr::from(LinOpError::from(e)))
}

/// Hand an owned `ArrayD<f64>` back to Python as a float64 ndarray.
#[cfg(feature = "python-bindings")]
pub fn arrayd_into_py<'py>(py: Python<'py>, arr: ArrayD<f64>) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
    let shape = arr.shape().to_vec();
    let data: Vec<f64> = arr.iter().copied().collect();
    PyArray1::from_vec(py, data).reshape(shape)
}

/// Build the scale operator named by `scale_kind`.
///
/// - No `scale` (and any kind other than `"scaled_identity"`) gives the
///   identity, sized by `num_rows` when known.
/// - `"diag"`: `scale` is the diagonal, shape `[B..., n]`.
/// - `"tril"`: `scale` holds `[B..., n, n]` matrices; the strict upper
///   triangle is ignored.
/// - `"scaled_identity"`: `scale` is the multiplier, shape `[B...]`;
///   `num_rows` is required.
/// - `"identity"`: `scale` must be omitted.
#[cfg(feature = "python-bindings")]
pub fn build_scale_operator(
    scale: Option<ArrayD<f64>>, scale_kind: &str, num_rows: Option<usize>,
) -> PyResult<ScaleOperator> {
    let op: ScaleOperator = match (scale_kind, scale) {
        ("scaled_identity", Some(m)) => {
            let n = num_rows.ok_or_else(|| {
                PyValueError::new_err("num_rows is required for scale_kind='scaled_identity'")
            })?;
            ScaledIdentity::new(m, n)?.into()
        }
        ("scaled_identity", None) => {
            return Err(PyValueError::new_err(
                "scale (the multiplier) is required for scale_kind='scaled_identity'",
            ));
        }
        ("identity", Some(_)) => {
            return Err(PyValueError::new_err("scale must be None for scale_kind='identity'"));
        }
        ("identity" | "diag" | "tril", None) => Identity::new(num_rows).into(),
        ("diag", Some(d)) => Diag::new(d)?.into(),
        ("tril", Some(l)) => LowerTriangular::new(l)?.into(),
        (other, _) => {
            return Err(PyValueError::new_err(format!(
                "unknown scale_kind '{other}'; expected 'identity', 'scaled_identity', 'diag' or 'tril'"
            )));
        }
    };
    if let (Some(expected), Some(found)) = (num_rows, op.num_rows()) {
        if expected != found {
            return Err(LinOpError::DimensionMismatch { expected, found }.into());
        }
    }
    Ok(op)
}
