//! Identity and scaled-identity operators.
//!
//! [`Identity`] is what an affine bijector uses when no scale is given; it
//! may be dimension-free (`num_rows = None`) and then conforms to any
//! input. [`ScaledIdentity`] is `m·I` with one multiplier per batch member.
use crate::linalg::{
    broadcast::{flatten_rows, split_batch, unflatten_rows},
    errors::{LinOpError, LinOpResult},
    operator::{LinearOperator, conform_input},
};
use ndarray::{Array2, ArrayD, ArrayViewD, IxDyn};

/// The identity operator `I`.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    num_rows: Option<usize>,
}

impl Identity {
    /// Identity of size `num_rows`, or a size-agnostic identity for `None`.
    pub fn new(num_rows: Option<usize>) -> Self {
        Identity { num_rows }
    }
}

impl Default for Identity {
    fn default() -> Self {
        Identity::new(None)
    }
}

impl LinearOperator for Identity {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn batch_shape(&self) -> &[usize] {
        &[]
    }

    fn num_rows(&self) -> Option<usize> {
        self.num_rows
    }

    fn matvec(&self, x: ArrayViewD<'_, f64>, _adjoint: bool) -> LinOpResult<ArrayD<f64>> {
        conform_input(&x, self.num_rows, &[])?;
        Ok(x.to_owned())
    }

    fn solvevec(&self, rhs: ArrayViewD<'_, f64>, _adjoint: bool) -> LinOpResult<ArrayD<f64>> {
        conform_input(&rhs, self.num_rows, &[])?;
        Ok(rhs.to_owned())
    }

    fn log_abs_determinant(&self) -> ArrayD<f64> {
        ArrayD::zeros(IxDyn(&[]))
    }

    fn assert_non_singular(&self) -> LinOpResult<()> {
        Ok(())
    }

    fn to_dense(&self) -> LinOpResult<ArrayD<f64>> {
        let n = self.num_rows.ok_or(LinOpError::UnknownSize { operator: self.name() })?;
        Ok(Array2::<f64>::eye(n).into_dyn())
    }
}

/// The scaled identity `m·I`, batched over the shape of `multiplier`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledIdentity {
    multiplier: ArrayD<f64>,
    num_rows: usize,
}

impl ScaledIdentity {
    /// Build `m·I` of size `num_rows`; the batch shape is `multiplier.shape()`.
    ///
    /// # Errors
    /// - [`LinOpError::ZeroSize`] when `num_rows == 0`.
    pub fn new(multiplier: ArrayD<f64>, num_rows: usize) -> LinOpResult<Self> {
        if num_rows == 0 {
            return Err(LinOpError::ZeroSize { operator: "scaled_identity" });
        }
        Ok(ScaledIdentity { multiplier, num_rows })
    }

    pub fn multiplier(&self) -> &ArrayD<f64> {
        &self.multiplier
    }

    fn scale_rows(
        &self, x: ArrayViewD<'_, f64>, op: impl Fn(f64, f64) -> f64,
    ) -> LinOpResult<ArrayD<f64>> {
        let (out_batch, n) = conform_input(&x, Some(self.num_rows), self.batch_shape())?;
        let mut xs = flatten_rows(x, &out_batch, &[n])?;
        let ms = flatten_rows(self.multiplier.view(), &out_batch, &[])?;
        for (mut row, m) in xs.rows_mut().into_iter().zip(ms.column(0).iter()) {
            row.mapv_inplace(|v| op(v, *m));
        }
        unflatten_rows(xs, &out_batch, &[n])
    }
}

impl LinearOperator for ScaledIdentity {
    fn name(&self) -> &'static str {
        "scaled_identity"
    }

    fn batch_shape(&self) -> &[usize] {
        self.multiplier.shape()
    }

    fn num_rows(&self) -> Option<usize> {
        Some(self.num_rows)
    }

    fn matvec(&self, x: ArrayViewD<'_, f64>, _adjoint: bool) -> LinOpResult<ArrayD<f64>> {
        self.scale_rows(x, |v, m| v * m)
    }

    fn solvevec(&self, rhs: ArrayViewD<'_, f64>, _adjoint: bool) -> LinOpResult<ArrayD<f64>> {
        if let Some(batch_index) = self.multiplier.iter().position(|&m| m == 0.0) {
            return Err(LinOpError::Singular { operator: self.name(), batch_index, position: 0 });
        }
        self.scale_rows(rhs, |v, m| v / m)
    }

    fn log_abs_determinant(&self) -> ArrayD<f64> {
        let n = self.num_rows as f64;
        self.multiplier.mapv(|m| n * m.abs().ln())
    }

    fn assert_non_singular(&self) -> LinOpResult<()> {
        for (batch_index, &m) in self.multiplier.iter().enumerate() {
            if !m.is_finite() {
                return Err(LinOpError::NonFinite { operator: self.name(), value: m });
            }
            if m == 0.0 {
                return Err(LinOpError::Singular { operator: self.name(), batch_index, position: 0 });
            }
        }
        Ok(())
    }

    fn to_dense(&self) -> LinOpResult<ArrayD<f64>> {
        let n = self.num_rows;
        let (batch, _) = split_batch(self.multiplier.shape(), 0);
        let ms = flatten_rows(self.multiplier.view(), batch, &[])?;
        let mut dense = Array2::<f64>::zeros((ms.nrows(), n * n));
        for (mut row, m) in dense.rows_mut().into_iter().zip(ms.column(0).iter()) {
            for i in 0..n {
                row[i * n + i] = *m;
            }
        }
        unflatten_rows(dense, batch, &[n, n])
    }
}
