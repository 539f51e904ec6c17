//! Lower-triangular operator `L`.
//!
//! Purpose
//! -------
//! Represent a batch of lower-triangular matrices stored densely as
//! `[B..., n, n]`. Only the lower triangle (diagonal included) is read;
//! anything above the diagonal is ignored, so callers may pass a full
//! matrix and get its lower part.
//!
//! Key behaviors
//! -------------
//! - Products and solves run per batch member on `nalgebra::DMatrix`
//!   copies of the lower triangle, using forward substitution for `L·x = b`
//!   and back substitution on `Lᵀ` for the adjoint solve.
//! - `log|det L| = Σ ln|Lᵢᵢ|`, read straight off the diagonal.
//!
//! Conventions
//! -----------
//! - Rows of the flattened storage are row-major `n×n` blocks; they are
//!   copied into `DMatrix` with `from_row_iterator`, which handles the
//!   column-major layout on the `nalgebra` side.
use crate::linalg::{
    broadcast::{flatten_rows, unflatten_rows},
    errors::{LinOpError, LinOpResult},
    operator::{LinearOperator, conform_input},
};
use nalgebra::{DMatrix, DVector};
use ndarray::{Array2, ArrayD, ArrayView1, ArrayViewD};

/// Batched lower-triangular linear operator.
#[derive(Debug, Clone, PartialEq)]
pub struct LowerTriangular {
    tril: ArrayD<f64>,
    batch_shape: Vec<usize>,
    num_rows: usize,
}

impl LowerTriangular {
    /// Wrap `[B..., n, n]` storage.
    ///
    /// # Errors
    /// - [`LinOpError::InvalidStorageRank`] for storage of rank below 2.
    /// - [`LinOpError::NotSquare`] when the trailing axes differ.
    pub fn new(tril: ArrayD<f64>) -> LinOpResult<Self> {
        let shape = tril.shape();
        let rank = shape.len();
        if rank < 2 {
            return Err(LinOpError::InvalidStorageRank {
                operator: "lower_triangular",
                min_rank: 2,
                found: rank,
            });
        }
        if shape[rank - 1] != shape[rank - 2] {
            return Err(LinOpError::NotSquare { shape: shape.to_vec() });
        }
        let num_rows = shape[rank - 1];
        let batch_shape = shape[..rank - 2].to_vec();
        Ok(LowerTriangular { tril, batch_shape, num_rows })
    }

    fn matrix_rows(&self, batch: &[usize]) -> LinOpResult<Array2<f64>> {
        flatten_rows(self.tril.view(), batch, &[self.num_rows, self.num_rows])
    }

    fn map_rows(
        &self, x: ArrayViewD<'_, f64>,
        kernel: impl Fn(&DMatrix<f64>, &DVector<f64>) -> Option<DVector<f64>>,
    ) -> LinOpResult<ArrayD<f64>> {
        let (out_batch, n) = conform_input(&x, Some(self.num_rows), &self.batch_shape)?;
        let mut xs = flatten_rows(x, &out_batch, &[n])?;
        let ls = self.matrix_rows(&out_batch)?;
        for (batch_index, (mut x_row, l_row)) in xs.rows_mut().into_iter().zip(ls.rows()).enumerate()
        {
            let l = lower_block(l_row, n);
            let v = DVector::from_iterator(n, x_row.iter().copied());
            let out = kernel(&l, &v).ok_or_else(|| singular_at(&l, batch_index))?;
            x_row.iter_mut().zip(out.iter()).for_each(|(dst, src)| *dst = *src);
        }
        unflatten_rows(xs, &out_batch, &[n])
    }
}

impl LinearOperator for LowerTriangular {
    fn name(&self) -> &'static str {
        "lower_triangular"
    }

    fn batch_shape(&self) -> &[usize] {
        &self.batch_shape
    }

    fn num_rows(&self) -> Option<usize> {
        Some(self.num_rows)
    }

    fn matvec(&self, x: ArrayViewD<'_, f64>, adjoint: bool) -> LinOpResult<ArrayD<f64>> {
        if adjoint {
            self.map_rows(x, |l, v| Some(l.tr_mul(v)))
        } else {
            self.map_rows(x, |l, v| Some(l * v))
        }
    }

    fn solvevec(&self, rhs: ArrayViewD<'_, f64>, adjoint: bool) -> LinOpResult<ArrayD<f64>> {
        if adjoint {
            self.map_rows(rhs, |l, v| l.tr_solve_lower_triangular(v))
        } else {
            self.map_rows(rhs, |l, v| l.solve_lower_triangular(v))
        }
    }

    fn log_abs_determinant(&self) -> ArrayD<f64> {
        let n = self.num_rows;
        let rank = self.tril.ndim();
        // Diagonal of every batch member, shaped like the batch.
        let mut logdet = ArrayD::<f64>::zeros(self.tril.shape()[..rank - 2].to_vec());
        for i in 0..n {
            let entries = self.tril.index_axis(ndarray::Axis(rank - 1), i);
            let diag_i = entries.index_axis(ndarray::Axis(rank - 2), i);
            logdet.zip_mut_with(&diag_i, |acc, &d| *acc += d.abs().ln());
        }
        logdet
    }

    fn assert_non_singular(&self) -> LinOpResult<()> {
        let n = self.num_rows;
        let ls = self.matrix_rows(&self.batch_shape)?;
        for (batch_index, row) in ls.rows().into_iter().enumerate() {
            for i in 0..n {
                for j in 0..=i {
                    let v = row[i * n + j];
                    if !v.is_finite() {
                        return Err(LinOpError::NonFinite { operator: self.name(), value: v });
                    }
                }
                if row[i * n + i] == 0.0 {
                    return Err(LinOpError::Singular {
                        operator: self.name(),
                        batch_index,
                        position: i,
                    });
                }
            }
        }
        Ok(())
    }

    fn to_dense(&self) -> LinOpResult<ArrayD<f64>> {
        let n = self.num_rows;
        let mut ls = self.matrix_rows(&self.batch_shape)?;
        for mut row in ls.rows_mut() {
            for i in 0..n {
                for j in (i + 1)..n {
                    row[i * n + j] = 0.0;
                }
            }
        }
        unflatten_rows(ls, &self.batch_shape, &[n, n])
    }
}

// ---- Helper Methods ----

/// Copy one row-major `n×n` block into a `DMatrix`, keeping the lower triangle.
fn lower_block(row: ArrayView1<'_, f64>, n: usize) -> DMatrix<f64> {
    DMatrix::from_row_iterator(n, n, row.iter().copied()).lower_triangle()
}

fn singular_at(l: &DMatrix<f64>, batch_index: usize) -> LinOpError {
    let position = (0..l.nrows()).find(|&i| l[(i, i)] == 0.0).unwrap_or(0);
    LinOpError::Singular { operator: "lower_triangular", batch_index, position }
}
