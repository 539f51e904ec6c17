//! Diagonal operator `diag(d)`.
//!
//! Storage is `[B..., n]`: the trailing axis is the diagonal and any leading
//! axes form the batch. Products and solves are elementwise, the adjoint is
//! the operator itself, and `log|det| = Σ ln|dᵢ|` along the trailing axis.
use crate::linalg::{
    broadcast::{flatten_rows, split_batch, unflatten_rows},
    errors::{LinOpError, LinOpResult},
    operator::{LinearOperator, conform_input},
};
use ndarray::{Array2, ArrayD, ArrayViewD, Axis, Zip};

/// Diagonal linear operator.
#[derive(Debug, Clone, PartialEq)]
pub struct Diag {
    diag: ArrayD<f64>,
    batch_shape: Vec<usize>,
    num_rows: usize,
}

impl Diag {
    /// Wrap `[B..., n]` diagonal storage.
    ///
    /// # Errors
    /// - [`LinOpError::InvalidStorageRank`] for rank-0 storage.
    pub fn new(diag: ArrayD<f64>) -> LinOpResult<Self> {
        let Some((&num_rows, batch)) = diag.shape().split_last() else {
            return Err(LinOpError::InvalidStorageRank { operator: "diag", min_rank: 1, found: 0 });
        };
        let batch_shape = batch.to_vec();
        Ok(Diag { diag, batch_shape, num_rows })
    }

    pub fn diag_part(&self) -> &ArrayD<f64> {
        &self.diag
    }

    fn diag_rows(&self) -> LinOpResult<Array2<f64>> {
        flatten_rows(self.diag.view(), &self.batch_shape, &[self.num_rows])
    }

    fn elementwise(
        &self, x: ArrayViewD<'_, f64>, op: impl Fn(f64, f64) -> f64,
    ) -> LinOpResult<ArrayD<f64>> {
        let (out_batch, n) = conform_input(&x, Some(self.num_rows), &self.batch_shape)?;
        let mut xs = flatten_rows(x, &out_batch, &[n])?;
        let ds = flatten_rows(self.diag.view(), &out_batch, &[n])?;
        Zip::from(&mut xs).and(&ds).for_each(|v, &d| *v = op(*v, d));
        unflatten_rows(xs, &out_batch, &[n])
    }
}

impl LinearOperator for Diag {
    fn name(&self) -> &'static str {
        "diag"
    }

    fn batch_shape(&self) -> &[usize] {
        &self.batch_shape
    }

    fn num_rows(&self) -> Option<usize> {
        Some(self.num_rows)
    }

    fn matvec(&self, x: ArrayViewD<'_, f64>, _adjoint: bool) -> LinOpResult<ArrayD<f64>> {
        self.elementwise(x, |v, d| v * d)
    }

    fn solvevec(&self, rhs: ArrayViewD<'_, f64>, _adjoint: bool) -> LinOpResult<ArrayD<f64>> {
        let ds = self.diag_rows()?;
        if let Some(((batch_index, position), _)) = ds.indexed_iter().find(|(_, &d)| d == 0.0) {
            return Err(LinOpError::Singular { operator: self.name(), batch_index, position });
        }
        self.elementwise(rhs, |v, d| v / d)
    }

    fn log_abs_determinant(&self) -> ArrayD<f64> {
        let last = self.diag.ndim() - 1;
        self.diag.mapv(|d| d.abs().ln()).sum_axis(Axis(last))
    }

    fn assert_non_singular(&self) -> LinOpResult<()> {
        let ds = self.diag_rows()?;
        for ((batch_index, position), &d) in ds.indexed_iter() {
            if !d.is_finite() {
                return Err(LinOpError::NonFinite { operator: self.name(), value: d });
            }
            if d == 0.0 {
                return Err(LinOpError::Singular { operator: self.name(), batch_index, position });
            }
        }
        Ok(())
    }

    fn to_dense(&self) -> LinOpResult<ArrayD<f64>> {
        let n = self.num_rows;
        let ds = self.diag_rows()?;
        let mut dense = Array2::<f64>::zeros((ds.nrows(), n * n));
        for (mut row, d) in dense.rows_mut().into_iter().zip(ds.rows()) {
            for i in 0..n {
                row[i * n + i] = d[i];
            }
        }
        let (batch, _) = split_batch(self.diag.shape(), 1);
        unflatten_rows(dense, batch, &[n, n])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{arr0, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Elementwise products and solves for batched diagonals.
    // - Broadcasting of a single diagonal over a batch of inputs.
    // - `Σ ln|dᵢ|` log-determinants and singularity reporting.
    //
    // They intentionally DO NOT cover:
    // - Affine composition with a shift; see `bijectors::affine`.
    // -------------------------------------------------------------------------

    fn batched() -> Diag {
        Diag::new(array![[1.0, 2.0, 3.0], [2.0, 5.0, 6.0]].into_dyn()).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify row-wise elementwise products for a batch of two diagonals.
    //
    // Given
    // -----
    // - diag = [[1, 2, 3], [2, 5, 6]], x = [[1, 0, -1], [2, 3, 4]].
    //
    // Expect
    // ------
    // - `matvec` = diag * x and `solvevec` recovers x.
    fn matvec_and_solvevec_are_elementwise() {
        // Arrange
        let op = batched();
        let x = array![[1.0, 0.0, -1.0], [2.0, 3.0, 4.0]].into_dyn();

        // Act
        let y = op.matvec(x.view(), false).unwrap();
        let back = op.solvevec(y.view(), false).unwrap();

        // Assert
        assert_eq!(y, array![[1.0, 0.0, -3.0], [4.0, 15.0, 24.0]].into_dyn());
        for (a, b) in back.iter().zip(x.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // A single (unbatched) diagonal must broadcast across input rows.
    //
    // Given
    // -----
    // - diag = [2, 4] and a `[3, 2]` input.
    //
    // Expect
    // ------
    // - Output `[3, 2]` with every row scaled by [2, 4].
    fn unbatched_diag_broadcasts_over_inputs() {
        let op = Diag::new(array![2.0, 4.0].into_dyn()).unwrap();
        let x = array![[1.0, 1.0], [0.5, 0.25], [-1.0, 2.0]].into_dyn();
        let y = op.matvec(x.view(), false).unwrap();
        assert_eq!(y, array![[2.0, 4.0], [1.0, 1.0], [-2.0, 8.0]].into_dyn());
    }

    #[test]
    // Purpose
    // -------
    // Check the per-member log-determinant.
    //
    // Given
    // -----
    // - diag = [[1, 2, 3], [2, 5, 6]] and an unbatched [-2, 0.5].
    //
    // Expect
    // ------
    // - `[ln 6, ln 60]` and a scalar `ln 1 = 0`.
    fn log_abs_determinant_sums_log_diagonal() {
        let logdet = batched().log_abs_determinant();
        assert_eq!(logdet.shape(), &[2]);
        assert_relative_eq!(logdet[[0]], 6.0_f64.ln(), epsilon = 1e-12);
        assert_relative_eq!(logdet[[1]], 60.0_f64.ln(), epsilon = 1e-12);

        let single = Diag::new(array![-2.0, 0.5].into_dyn()).unwrap();
        assert_relative_eq!(single.log_abs_determinant().sum(), 0.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Ensure zero and non-finite diagonal entries are rejected.
    //
    // Given
    // -----
    // - A diagonal with a zero in batch member 1, position 2, and one with NaN.
    //
    // Expect
    // ------
    // - `Singular` with that location; `NonFinite` for the NaN case.
    fn assert_non_singular_locates_bad_entries() {
        let zero = Diag::new(array![[1.0, 2.0, 3.0], [2.0, 5.0, 0.0]].into_dyn()).unwrap();
        assert_eq!(
            zero.assert_non_singular().unwrap_err(),
            LinOpError::Singular { operator: "diag", batch_index: 1, position: 2 }
        );
        let rhs = array![1.0, 1.0, 1.0].into_dyn();
        assert!(matches!(zero.solvevec(rhs.view(), false), Err(LinOpError::Singular { .. })));

        let nan = Diag::new(array![1.0, f64::NAN].into_dyn()).unwrap();
        assert!(matches!(nan.assert_non_singular(), Err(LinOpError::NonFinite { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Reject rank-0 storage and materialize a dense diagonal.
    //
    // Given
    // -----
    // - A scalar array; then diag = [1, 2].
    //
    // Expect
    // ------
    // - `InvalidStorageRank`; dense form `[[1, 0], [0, 2]]`.
    fn construction_and_dense_form() {
        assert!(matches!(
            Diag::new(arr0(1.0).into_dyn()),
            Err(LinOpError::InvalidStorageRank { operator: "diag", .. })
        ));
        let op = Diag::new(array![1.0, 2.0].into_dyn()).unwrap();
        assert_eq!(op.to_dense().unwrap(), array![[1.0, 0.0], [0.0, 2.0]].into_dyn());
    }
}
